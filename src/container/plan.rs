use tracing::warn;

use super::header::ContainerHeader;
use crate::error::{AfcError, Result};
use crate::format::{EncodeFormat, FrameLayout};
use crate::source::{AudioSource, LoopAlignment};

/// Everything the header and the payload encoder must agree on, derived
/// once from an [`AudioSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodePlan {
    pub format: EncodeFormat,
    pub layout: FrameLayout,
    pub sample_rate: u16,
    /// Sample count after clamping to the loop end.
    pub sample_count: u32,
    /// Loop start after frame alignment, `None` when not looping.
    pub loop_start: Option<u32>,
    /// Records whether the loop start had to be moved.
    pub loop_alignment: Option<LoopAlignment>,
    pub data_size: u32,
}

impl EncodePlan {
    pub fn for_source(source: &AudioSource) -> Self {
        let format = source.format();
        let layout = format.layout();
        let mut sample_count = source.sample_count();
        let mut loop_start = None;
        let mut loop_alignment = None;

        if let Some(region) = source.loop_region() {
            let alignment = match format {
                EncodeFormat::Adpcm4 => region.align_start(layout.samples_per_frame),
                EncodeFormat::Pcm16 => LoopAlignment::Aligned(region.start),
            };

            if let LoopAlignment::Corrected {
                requested,
                corrected,
            } = alignment
            {
                warn!(
                    requested,
                    corrected,
                    "loop start {} is not divisible by {}, corrected to {}",
                    requested,
                    layout.samples_per_frame,
                    corrected
                );
            }

            // Nothing past the loop end is ever played back.
            if sample_count > region.end {
                sample_count = region.end;
            }

            if region.end <= alignment.start() {
                warn!(
                    loop_start = alignment.start(),
                    loop_end = region.end,
                    "loop end does not follow loop start"
                );
            }

            loop_start = Some(alignment.start());
            loop_alignment = Some(alignment);
        }

        Self {
            format,
            layout,
            sample_rate: source.sample_rate(),
            sample_count,
            loop_start,
            loop_alignment,
            data_size: format.data_size(sample_count),
        }
    }

    /// Fails when the payload would not fit the header's size field.
    pub fn ensure_fits_header(&self) -> Result<()> {
        match self.format.checked_data_size(self.sample_count) {
            Some(_) => Ok(()),
            None => Err(AfcError::SampleCountOutOfRange(self.sample_count as usize)),
        }
    }

    pub fn header(&self) -> ContainerHeader {
        ContainerHeader {
            data_size: self.data_size,
            sample_count: self.sample_count,
            sample_rate: self.sample_rate,
            format: self.format,
            loop_start: self.loop_start,
        }
    }
}
