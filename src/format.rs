use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AfcError;

/// Output sample encoding of an AFC stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeFormat {
    Pcm16,
    Adpcm4,
}

impl EncodeFormat {
    /// Value stored in the header's format field.
    pub fn code(self) -> i16 {
        match self {
            EncodeFormat::Pcm16 => 2,
            EncodeFormat::Adpcm4 => 4,
        }
    }

    pub fn layout(self) -> FrameLayout {
        match self {
            EncodeFormat::Pcm16 => FrameLayout {
                bytes_per_frame: 2,
                samples_per_frame: 1,
            },
            EncodeFormat::Adpcm4 => FrameLayout {
                bytes_per_frame: 9,
                samples_per_frame: 16,
            },
        }
    }

    /// Payload size for `sample_count` samples on both channels, or `None`
    /// when it does not fit the header's 32-bit size field.
    pub fn checked_data_size(self, sample_count: u32) -> Option<u32> {
        let layout = self.layout();
        layout
            .frame_count(sample_count)
            .checked_mul(layout.bytes_per_frame * 2)
    }

    /// Payload size for `sample_count` samples on both channels.
    ///
    /// Saturates at `u32::MAX` past [`EncodeFormat::max_sample_count`]; the
    /// file writers reject such sources before encoding.
    pub fn data_size(self, sample_count: u32) -> u32 {
        self.checked_data_size(sample_count).unwrap_or(u32::MAX)
    }

    /// Longest stream whose payload size still fits the header.
    pub fn max_sample_count(self) -> u32 {
        let layout = self.layout();
        let frames = u32::MAX / (layout.bytes_per_frame * 2);
        frames.saturating_mul(layout.samples_per_frame)
    }
}

impl Default for EncodeFormat {
    fn default() -> Self {
        EncodeFormat::Adpcm4
    }
}

impl fmt::Display for EncodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeFormat::Pcm16 => write!(f, "pcm16"),
            EncodeFormat::Adpcm4 => write!(f, "adpcm4"),
        }
    }
}

impl FromStr for EncodeFormat {
    type Err = AfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pcm16" | "pcm" => Ok(EncodeFormat::Pcm16),
            "adpcm4" | "adpcm" => Ok(EncodeFormat::Adpcm4),
            other => Err(AfcError::InvalidArgument(format!(
                "unknown format '{}', expected pcm16 or adpcm4",
                other
            ))),
        }
    }
}

/// Per-channel frame geometry of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub bytes_per_frame: u32,
    pub samples_per_frame: u32,
}

impl FrameLayout {
    /// Frames needed to hold `sample_count` samples, rounding the last one up.
    pub fn frame_count(&self, sample_count: u32) -> u32 {
        sample_count.div_ceil(self.samples_per_frame)
    }
}
