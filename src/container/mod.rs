mod header;
mod plan;
mod writer;

pub use header::{padding_to_boundary, ContainerHeader, ALIGNMENT, HEADER_SIZE};
pub use plan::EncodePlan;
pub use writer::{
    interleave_frames, write_afc_file, write_container, write_pcm16_payload, EncodeReport,
    EncodedStream, StreamWriter,
};
