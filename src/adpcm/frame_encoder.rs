use super::transform::{
    selection_for_frame, Adpcm4Transform, FrameTransform, PcmBlock, QuantizerState,
    BYTES_PER_FRAME, SAMPLES_PER_FRAME,
};
use crate::source::sample_or_silence;

/// The ADPCM4 frames of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEncoding {
    pub bytes: Vec<u8>,
    /// Accumulated `|reconstructed - original|` over the whole channel.
    /// Diagnostic only.
    pub total_error: u64,
    pub final_state: QuantizerState,
}

impl ChannelEncoding {
    pub fn frame_count(&self) -> usize {
        self.bytes.len() / BYTES_PER_FRAME
    }

    pub fn frame(&self, index: usize) -> &[u8] {
        let start = index * BYTES_PER_FRAME;
        &self.bytes[start..start + BYTES_PER_FRAME]
    }
}

/// Splits a channel into 16-sample blocks and runs each through a
/// [`FrameTransform`], threading the quantizer state from frame to frame.
pub struct FrameEncoder<T: FrameTransform = Adpcm4Transform> {
    transform: T,
}

impl FrameEncoder<Adpcm4Transform> {
    pub fn new() -> Self {
        Self::with_transform(Adpcm4Transform::new())
    }
}

impl Default for FrameEncoder<Adpcm4Transform> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FrameTransform> FrameEncoder<T> {
    pub fn with_transform(transform: T) -> Self {
        Self { transform }
    }

    pub fn into_transform(self) -> T {
        self.transform
    }

    /// Encodes `sample_count` samples of `samples` starting from a fresh
    /// (0, 0) quantizer state.
    ///
    /// Reads past `sample_count` or past the end of `samples` yield silence,
    /// so the last partial frame is still emitted at full size. When
    /// `loop_start` is set, the frame starting exactly there is encoded with
    /// the zero coefficient pair.
    pub fn encode_channel(
        &mut self,
        samples: &[i16],
        sample_count: u32,
        loop_start: Option<u32>,
    ) -> ChannelEncoding {
        let frame_count = (sample_count as usize).div_ceil(SAMPLES_PER_FRAME);
        let mut bytes = Vec::with_capacity(frame_count * BYTES_PER_FRAME);
        let mut state = QuantizerState::default();
        let mut total_error = 0u64;

        for frame_index in 0..frame_count {
            let frame_offset = frame_index * SAMPLES_PER_FRAME;
            let block = Self::gather_block(samples, sample_count as usize, frame_offset);
            let selection = selection_for_frame(frame_offset as u32, loop_start);

            let frame = self.transform.encode_frame(&block, state, selection);
            bytes.extend_from_slice(&frame.bytes);
            total_error += frame.error;
            state = frame.state;
        }

        ChannelEncoding {
            bytes,
            total_error,
            final_state: state,
        }
    }

    fn gather_block(samples: &[i16], sample_count: usize, offset: usize) -> PcmBlock {
        let mut block = [0i16; SAMPLES_PER_FRAME];
        let end = sample_count.min(offset + SAMPLES_PER_FRAME);
        for (slot, index) in block.iter_mut().zip(offset..end) {
            *slot = sample_or_silence(samples, index);
        }
        block
    }
}
