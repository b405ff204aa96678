mod coefficients;
mod frame_encoder;
mod transform;

pub use coefficients::{coefficient_pair, COEFFICIENTS};
pub use frame_encoder::{ChannelEncoding, FrameEncoder};
pub use transform::{
    selection_for_frame, Adpcm4Frame, Adpcm4Transform, CoefficientSelection, EncodedFrame,
    FrameTransform, PcmBlock, QuantizerState, BYTES_PER_FRAME, SAMPLES_PER_FRAME,
};
