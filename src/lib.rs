//! Encoder for the AFC streamed audio container: stereo PCM16 input in,
//! big-endian PCM16 or 4-bit ADPCM frames out.

pub mod adpcm;
pub mod container;
pub mod error;
pub mod format;
#[cfg(feature = "cli")]
pub mod logging;
pub mod settings;
pub mod source;
pub mod wav;

pub use adpcm::{
    Adpcm4Transform, ChannelEncoding, CoefficientSelection, FrameEncoder, FrameTransform,
    QuantizerState,
};
pub use container::{
    write_afc_file, write_container, ContainerHeader, EncodePlan, EncodeReport, EncodedStream,
    StreamWriter,
};
pub use error::{AfcError, Result};
pub use format::EncodeFormat;
pub use settings::EncodeSettings;
pub use source::{AudioSource, LoopRegion};
