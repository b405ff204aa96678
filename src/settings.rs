use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::EncodeFormat;
use crate::source::{AudioSource, LoopRegion};

/// Encode options, typically loaded from a JSON file next to the input.
///
/// ```json
/// { "format": "adpcm4", "loop": { "start": 4410, "end": 88200 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    pub format: EncodeFormat,
    #[serde(rename = "loop")]
    pub loop_points: Option<LoopSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopSettings {
    pub start: u32,
    /// Defaults to the end of the input.
    #[serde(default)]
    pub end: Option<u32>,
}

impl EncodeSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Applies format and loop settings to `source`.
    pub fn apply(&self, source: AudioSource) -> AudioSource {
        let sample_count = source.sample_count();
        let region = self
            .loop_points
            .map(|l| LoopRegion::new(l.start, l.end.unwrap_or(sample_count)));
        source.with_format(self.format).with_loop_region(region)
    }
}
