use super::coefficients::coefficient_pair;

pub const SAMPLES_PER_FRAME: usize = 16;
pub const BYTES_PER_FRAME: usize = 9;

const COEFFICIENT_COUNT: u8 = 16;
const MAX_SCALE_EXPONENT: u8 = 15;
const FIXED_POINT_SHIFT: u32 = 11;

pub type PcmBlock = [i16; SAMPLES_PER_FRAME];
pub type Adpcm4Frame = [u8; BYTES_PER_FRAME];

/// The last two reconstructed samples of one channel. This is the only
/// state carried from one frame to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantizerState {
    pub last: i32,
    pub penultimate: i32,
}

impl QuantizerState {
    #[inline]
    fn push(&mut self, sample: i32) {
        self.penultimate = self.last;
        self.last = sample;
    }
}

/// How the frame transform chooses its predictor coefficient pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientSelection {
    /// Search every coefficient pair for the best fit.
    Free,
    /// Use exactly this coefficient pair.
    Forced(u8),
}

impl CoefficientSelection {
    /// The frame a looping decoder jumps back to must not depend on history
    /// from the end of the stream, so it is pinned to the all-zero pair.
    pub const LOOP_SEAM: CoefficientSelection = CoefficientSelection::Forced(0);

    fn candidates(self) -> std::ops::Range<u8> {
        match self {
            CoefficientSelection::Free => 0..COEFFICIENT_COUNT,
            CoefficientSelection::Forced(index) => {
                let index = index & 0x0F;
                index..index + 1
            }
        }
    }
}

/// Selection for the frame starting at `frame_offset` (in samples).
pub fn selection_for_frame(frame_offset: u32, loop_start: Option<u32>) -> CoefficientSelection {
    match loop_start {
        Some(start) if start == frame_offset => CoefficientSelection::LOOP_SEAM,
        _ => CoefficientSelection::Free,
    }
}

/// One encoded frame plus the quantizer state to hand to the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedFrame {
    pub bytes: Adpcm4Frame,
    /// Sum of `|reconstructed - original|` over the frame.
    pub error: u64,
    pub state: QuantizerState,
}

/// Encodes a block of 16 PCM16 samples into one 9-byte ADPCM4 frame.
pub trait FrameTransform {
    fn encode_frame(
        &mut self,
        block: &PcmBlock,
        state: QuantizerState,
        selection: CoefficientSelection,
    ) -> EncodedFrame;
}

/// Exhaustive search over coefficient pairs and scale exponents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adpcm4Transform;

#[derive(Clone, Copy)]
struct Trial {
    coefficient_index: u8,
    scale_exponent: u8,
    nibbles: [i8; SAMPLES_PER_FRAME],
    error: u64,
    state: QuantizerState,
}

impl Adpcm4Transform {
    pub fn new() -> Self {
        Self
    }

    /// Reconstructs a sample exactly as a hardware decoder would.
    #[inline]
    fn reconstruct(nibble: i32, scale: i32, prediction: i32) -> i32 {
        let value = (((nibble * scale) << FIXED_POINT_SHIFT) + prediction) >> FIXED_POINT_SHIFT;
        value.clamp(i16::MIN as i32, i16::MAX as i32)
    }

    #[inline]
    fn quantize(target: i32, prediction: i32, scale: i32) -> i32 {
        let step = scale << FIXED_POINT_SHIFT;
        let diff = (target << FIXED_POINT_SHIFT) - prediction;
        (diff + step / 2).div_euclid(step).clamp(-8, 7)
    }

    /// Runs one candidate over the block. Stops early once the error reaches
    /// `limit`, in which case the returned trial is incomplete.
    fn simulate(
        block: &PcmBlock,
        state: QuantizerState,
        coefficient_index: u8,
        scale_exponent: u8,
        limit: u64,
    ) -> Trial {
        let (c1, c2) = coefficient_pair(coefficient_index);
        let scale = 1i32 << scale_exponent;
        let mut trial = Trial {
            coefficient_index,
            scale_exponent,
            nibbles: [0; SAMPLES_PER_FRAME],
            error: 0,
            state,
        };

        for (slot, &sample) in trial.nibbles.iter_mut().zip(block.iter()) {
            let target = sample as i32;
            let prediction = c1 * trial.state.last + c2 * trial.state.penultimate;
            let nibble = Self::quantize(target, prediction, scale);
            let decoded = Self::reconstruct(nibble, scale, prediction);

            trial.error += (decoded - target).unsigned_abs() as u64;
            *slot = nibble as i8;
            trial.state.push(decoded);
            if trial.error >= limit {
                break;
            }
        }

        trial
    }

    fn pack(trial: &Trial) -> Adpcm4Frame {
        let mut bytes = [0u8; BYTES_PER_FRAME];
        bytes[0] = (trial.scale_exponent << 4) | (trial.coefficient_index & 0x0F);
        for (byte, pair) in bytes[1..].iter_mut().zip(trial.nibbles.chunks_exact(2)) {
            *byte = ((pair[0] as u8 & 0x0F) << 4) | (pair[1] as u8 & 0x0F);
        }
        bytes
    }
}

impl FrameTransform for Adpcm4Transform {
    fn encode_frame(
        &mut self,
        block: &PcmBlock,
        state: QuantizerState,
        selection: CoefficientSelection,
    ) -> EncodedFrame {
        let mut candidates = selection.candidates().flat_map(|coefficient_index| {
            (0..=MAX_SCALE_EXPONENT).map(move |scale_exponent| (coefficient_index, scale_exponent))
        });

        let (index, exponent) = candidates.next().unwrap_or((0, 0));
        let mut best = Self::simulate(block, state, index, exponent, u64::MAX);

        for (index, exponent) in candidates {
            if best.error == 0 {
                break;
            }
            let trial = Self::simulate(block, state, index, exponent, best.error);
            if trial.error < best.error {
                best = trial;
            }
        }

        EncodedFrame {
            bytes: Self::pack(&best),
            error: best.error,
            state: best.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decoder model used to check what the encoder claims to reconstruct.
    fn decode_frame(frame: &Adpcm4Frame, mut state: QuantizerState) -> (PcmBlock, QuantizerState) {
        let scale = 1i32 << (frame[0] >> 4);
        let (c1, c2) = coefficient_pair(frame[0] & 0x0F);
        let mut out = [0i16; SAMPLES_PER_FRAME];
        for (i, slot) in out.iter_mut().enumerate() {
            let byte = frame[1 + i / 2];
            let raw = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
            let nibble = ((raw as i8) << 4 >> 4) as i32;
            let prediction = c1 * state.last + c2 * state.penultimate;
            let sample = Adpcm4Transform::reconstruct(nibble, scale, prediction);
            *slot = sample as i16;
            state.push(sample);
        }
        (out, state)
    }

    fn sine_block(amplitude: f32, phase: f32) -> PcmBlock {
        let mut block = [0i16; SAMPLES_PER_FRAME];
        for (i, s) in block.iter_mut().enumerate() {
            let t = phase + i as f32 / SAMPLES_PER_FRAME as f32;
            *s = (amplitude * (2.0 * std::f32::consts::PI * t).sin()) as i16;
        }
        block
    }

    #[test]
    fn silence_encodes_to_zero_frame() {
        let mut transform = Adpcm4Transform::new();
        let frame = transform.encode_frame(
            &[0; SAMPLES_PER_FRAME],
            QuantizerState::default(),
            CoefficientSelection::Free,
        );
        assert_eq!(frame.bytes, [0u8; BYTES_PER_FRAME]);
        assert_eq!(frame.error, 0);
        assert_eq!(frame.state, QuantizerState::default());
    }

    #[test]
    fn reported_error_and_state_match_decoder() {
        let mut transform = Adpcm4Transform::new();
        let mut state = QuantizerState::default();
        for phase in [0.0, 0.3, 0.55] {
            let block = sine_block(12_000.0, phase);
            let frame = transform.encode_frame(&block, state, CoefficientSelection::Free);

            let (decoded, decoded_state) = decode_frame(&frame.bytes, state);
            let error: u64 = decoded
                .iter()
                .zip(block.iter())
                .map(|(&d, &o)| (d as i32 - o as i32).unsigned_abs() as u64)
                .sum();

            assert_eq!(frame.error, error);
            assert_eq!(frame.state, decoded_state);
            assert_eq!(frame.state.last, decoded[15] as i32);
            assert_eq!(frame.state.penultimate, decoded[14] as i32);
            state = frame.state;
        }
    }

    #[test]
    fn forced_selection_uses_requested_pair() {
        let mut transform = Adpcm4Transform::new();
        let block = sine_block(8_000.0, 0.1);
        let state = QuantizerState {
            last: 4_000,
            penultimate: 3_500,
        };

        let frame = transform.encode_frame(&block, state, CoefficientSelection::LOOP_SEAM);
        assert_eq!(frame.bytes[0] & 0x0F, 0);

        let frame = transform.encode_frame(&block, state, CoefficientSelection::Forced(7));
        assert_eq!(frame.bytes[0] & 0x0F, 7);
    }

    #[test]
    fn free_selection_is_never_worse_than_forced() {
        let mut transform = Adpcm4Transform::new();
        let block = sine_block(20_000.0, 0.2);
        let state = QuantizerState {
            last: 15_000,
            penultimate: 13_000,
        };
        let free = transform.encode_frame(&block, state, CoefficientSelection::Free);
        let forced = transform.encode_frame(&block, state, CoefficientSelection::LOOP_SEAM);
        assert!(free.error <= forced.error);
    }

    #[test]
    fn full_scale_input_stays_in_range() {
        let mut transform = Adpcm4Transform::new();
        let mut block = [i16::MAX; SAMPLES_PER_FRAME];
        for s in block.iter_mut().skip(1).step_by(2) {
            *s = i16::MIN;
        }
        let frame =
            transform.encode_frame(&block, QuantizerState::default(), CoefficientSelection::Free);
        let (decoded, _) = decode_frame(&frame.bytes, QuantizerState::default());
        let error: u64 = decoded
            .iter()
            .zip(block.iter())
            .map(|(&d, &o)| (d as i32 - o as i32).unsigned_abs() as u64)
            .sum();
        assert_eq!(frame.error, error);
        assert!(decoded[0] > 0 && decoded[1] < 0);
    }

    #[test]
    fn selection_is_forced_only_at_loop_start() {
        assert_eq!(selection_for_frame(0, None), CoefficientSelection::Free);
        assert_eq!(selection_for_frame(32, Some(32)), CoefficientSelection::LOOP_SEAM);
        assert_eq!(selection_for_frame(16, Some(32)), CoefficientSelection::Free);
        assert_eq!(selection_for_frame(48, Some(32)), CoefficientSelection::Free);
    }
}
