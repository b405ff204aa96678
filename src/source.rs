use crate::format::EncodeFormat;

/// Loop bounds in samples, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopRegion {
    pub start: u32,
    pub end: u32,
}

/// Outcome of snapping a loop start to a frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAlignment {
    Aligned(u32),
    Corrected { requested: u32, corrected: u32 },
}

impl LoopAlignment {
    pub fn start(&self) -> u32 {
        match *self {
            LoopAlignment::Aligned(start) => start,
            LoopAlignment::Corrected { corrected, .. } => corrected,
        }
    }

    pub fn was_corrected(&self) -> bool {
        matches!(self, LoopAlignment::Corrected { .. })
    }
}

impl LoopRegion {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Rounds the loop start up to the next multiple of `samples_per_frame`.
    pub fn align_start(&self, samples_per_frame: u32) -> LoopAlignment {
        let remainder = self.start % samples_per_frame.max(1);
        if remainder == 0 {
            LoopAlignment::Aligned(self.start)
        } else {
            LoopAlignment::Corrected {
                requested: self.start,
                corrected: self.start.saturating_add(samples_per_frame - remainder),
            }
        }
    }
}

/// Left or right channel of a stereo source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

/// Stereo PCM16 input together with the options that shape its encoding.
///
/// Channel arrays may be shorter than `sample_count`; missing samples read
/// as silence.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    left: Vec<i16>,
    right: Vec<i16>,
    sample_rate: u16,
    sample_count: u32,
    loop_region: Option<LoopRegion>,
    format: EncodeFormat,
}

impl AudioSource {
    /// The sample count defaults to the longer of the two channels.
    pub fn new(left: Vec<i16>, right: Vec<i16>, sample_rate: u16) -> Self {
        let longest = left.len().max(right.len());
        let sample_count = u32::try_from(longest).unwrap_or(u32::MAX);
        Self {
            left,
            right,
            sample_rate,
            sample_count,
            loop_region: None,
            format: EncodeFormat::default(),
        }
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_loop(mut self, start: u32, end: u32) -> Self {
        self.loop_region = Some(LoopRegion::new(start, end));
        self
    }

    pub fn with_loop_region(mut self, region: Option<LoopRegion>) -> Self {
        self.loop_region = region;
        self
    }

    pub fn with_format(mut self, format: EncodeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn channel(&self, channel: Channel) -> &[i16] {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }

    pub fn sample_rate(&self) -> u16 {
        self.sample_rate
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn loop_region(&self) -> Option<LoopRegion> {
        self.loop_region
    }

    pub fn is_looping(&self) -> bool {
        self.loop_region.is_some()
    }

    pub fn format(&self) -> EncodeFormat {
        self.format
    }
}

/// Reads `samples[index]`, treating anything past the end as silence.
#[inline]
pub fn sample_or_silence(samples: &[i16], index: usize) -> i16 {
    samples.get(index).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_loop_start_is_kept() {
        let region = LoopRegion::new(32, 100);
        assert_eq!(region.align_start(16), LoopAlignment::Aligned(32));
        assert_eq!(LoopRegion::new(0, 100).align_start(16).start(), 0);
    }

    #[test]
    fn misaligned_loop_start_rounds_up_to_next_frame() {
        for start in [1u32, 5, 15, 17, 1000, 44_101] {
            let alignment = LoopRegion::new(start, start + 64).align_start(16);
            assert!(alignment.was_corrected());
            assert_eq!(alignment.start(), start + (16 - start % 16));
            assert_eq!(alignment.start() % 16, 0);
        }
    }

    #[test]
    fn single_sample_frames_never_need_correction() {
        let alignment = LoopRegion::new(7, 20).align_start(1);
        assert_eq!(alignment, LoopAlignment::Aligned(7));
    }

    #[test]
    fn sample_count_defaults_to_longest_channel() {
        let source = AudioSource::new(vec![1; 10], vec![2; 25], 32_000);
        assert_eq!(source.sample_count(), 25);
        assert_eq!(source.format(), EncodeFormat::Adpcm4);
        assert!(!source.is_looping());
    }

    #[test]
    fn out_of_range_reads_are_silent() {
        let samples = [5i16, -3];
        assert_eq!(sample_or_silence(&samples, 1), -3);
        assert_eq!(sample_or_silence(&samples, 2), 0);
        assert_eq!(sample_or_silence(&[], 0), 0);
    }
}
