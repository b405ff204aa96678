use thiserror::Error;

/// Errors raised by the input and output glue around the encoder.
///
/// Encoding itself never fails: short channels read as silence and a
/// misaligned loop start is corrected rather than rejected.
#[derive(Debug, Error)]
pub enum AfcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV decode error: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported WAV format: bits_per_sample={bits} sample_format={format:?}")]
    UnsupportedSampleFormat {
        bits: u16,
        format: hound::SampleFormat,
    },

    #[error("unsupported channel count {0}, expected mono or stereo")]
    UnsupportedChannels(u16),

    #[error("sample rate {0} Hz does not fit the 16-bit header field")]
    SampleRateOutOfRange(u32),

    #[error("sample count {0} does not fit the 32-bit header field")]
    SampleCountOutOfRange(usize),

    #[error("invalid AFC header: {0}")]
    InvalidHeader(String),

    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, AfcError>;
