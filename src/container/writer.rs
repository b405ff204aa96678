use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

use super::header::{padding_to_boundary, HEADER_SIZE};
use super::plan::EncodePlan;
use crate::adpcm::{Adpcm4Transform, FrameEncoder, FrameTransform, BYTES_PER_FRAME};
use crate::error::Result;
use crate::format::EncodeFormat;
use crate::source::{sample_or_silence, AudioSource, Channel};

/// Summary of one stream encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    pub plan: EncodePlan,
    pub left_error: u64,
    pub right_error: u64,
    pub bytes_written: usize,
}

impl EncodeReport {
    /// Accumulated quantization error over both channels. Zero for PCM16.
    pub fn total_error(&self) -> u64 {
        self.left_error + self.right_error
    }
}

/// A complete AFC stream held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream {
    pub bytes: Vec<u8>,
    pub report: EncodeReport,
}

impl EncodedStream {
    /// Interleaved channel data, without header or trailing padding.
    pub fn payload(&self) -> &[u8] {
        let end = HEADER_SIZE + self.report.plan.data_size as usize;
        &self.bytes[HEADER_SIZE..end]
    }
}

/// Lays out an AFC stream: header, interleaved channel frames, padding.
///
/// Every call starts from fresh quantizer state, so encoding the same
/// source twice yields identical bytes.
#[derive(Debug, Clone, Default)]
pub struct StreamWriter<T = Adpcm4Transform> {
    transform: T,
}

impl StreamWriter<Adpcm4Transform> {
    pub fn new() -> Self {
        Self::with_transform(Adpcm4Transform::new())
    }
}

impl<T> StreamWriter<T>
where
    T: FrameTransform + Clone + Send + Sync,
{
    pub fn with_transform(transform: T) -> Self {
        Self { transform }
    }

    /// Encodes `source` in memory. Sources longer than
    /// [`EncodeFormat::max_sample_count`] get a saturated size field; use
    /// [`StreamWriter::write_container_to`] to have them rejected instead.
    pub fn write_container(&self, source: &AudioSource) -> EncodedStream {
        self.encode_planned(source, EncodePlan::for_source(source))
    }

    fn encode_planned(&self, source: &AudioSource, plan: EncodePlan) -> EncodedStream {
        let payload_len = plan.data_size as usize;
        let unpadded = HEADER_SIZE + payload_len;
        let mut bytes = Vec::with_capacity(unpadded + padding_to_boundary(unpadded));

        bytes.extend_from_slice(&plan.header().to_bytes());

        let (left_error, right_error) = match plan.format {
            EncodeFormat::Adpcm4 => self.write_adpcm4_payload(source, &plan, &mut bytes),
            EncodeFormat::Pcm16 => {
                write_pcm16_payload(source, plan.sample_count, &mut bytes);
                (0, 0)
            }
        };

        let padding = padding_to_boundary(bytes.len());
        bytes.resize(bytes.len() + padding, 0);

        if cfg!(debug_assertions) {
            debug!(
                left_error,
                right_error,
                "total sample error {}",
                left_error + right_error
            );
        }

        let report = EncodeReport {
            plan,
            left_error,
            right_error,
            bytes_written: bytes.len(),
        };
        EncodedStream { bytes, report }
    }

    /// Encodes `source` into `sink`. The sink is flushed before returning and
    /// dropped on every path out of this call. Nothing is written when the
    /// payload would overflow the header's size field.
    pub fn write_container_to<W: Write>(
        &self,
        source: &AudioSource,
        mut sink: W,
    ) -> Result<EncodeReport> {
        let plan = EncodePlan::for_source(source);
        plan.ensure_fits_header()?;
        let stream = self.encode_planned(source, plan);
        sink.write_all(&stream.bytes)?;
        sink.flush()?;
        Ok(stream.report)
    }

    pub fn write_file<P: AsRef<Path>>(
        &self,
        source: &AudioSource,
        path: P,
    ) -> Result<EncodeReport> {
        let file = File::create(path)?;
        self.write_container_to(source, BufWriter::new(file))
    }

    fn write_adpcm4_payload(
        &self,
        source: &AudioSource,
        plan: &EncodePlan,
        out: &mut Vec<u8>,
    ) -> (u64, u64) {
        let encode = |channel: Channel| {
            FrameEncoder::with_transform(self.transform.clone()).encode_channel(
                source.channel(channel),
                plan.sample_count,
                plan.loop_start,
            )
        };

        // Channels share no state; only the interleave below orders them.
        let (left, right) = rayon::join(|| encode(Channel::Left), || encode(Channel::Right));
        debug_assert_eq!(left.frame_count(), right.frame_count());

        interleave_frames(&left.bytes, &right.bytes, BYTES_PER_FRAME, out);
        (left.total_error, right.total_error)
    }
}

/// Encodes with the default ADPCM4 transform.
pub fn write_container(source: &AudioSource) -> EncodedStream {
    StreamWriter::new().write_container(source)
}

/// Encodes `source` into a new file at `path`.
pub fn write_afc_file<P: AsRef<Path>>(source: &AudioSource, path: P) -> Result<EncodeReport> {
    StreamWriter::new().write_file(source, path)
}

/// Appends frame `i` of `left` followed by frame `i` of `right`, for every
/// frame in order.
pub fn interleave_frames(left: &[u8], right: &[u8], bytes_per_frame: usize, out: &mut Vec<u8>) {
    debug_assert_eq!(left.len(), right.len());
    out.reserve(left.len() + right.len());
    for (l, r) in left
        .chunks_exact(bytes_per_frame)
        .zip(right.chunks_exact(bytes_per_frame))
    {
        out.extend_from_slice(l);
        out.extend_from_slice(r);
    }
}

/// Appends each sample pair as big-endian left then right, 4 bytes per pair.
pub fn write_pcm16_payload(source: &AudioSource, sample_count: u32, out: &mut Vec<u8>) {
    let left = source.channel(Channel::Left);
    let right = source.channel(Channel::Right);
    let start = out.len();
    out.resize(start + sample_count as usize * 4, 0);

    for (i, pair) in out[start..].chunks_exact_mut(4).enumerate() {
        BigEndian::write_i16(&mut pair[0..2], sample_or_silence(left, i));
        BigEndian::write_i16(&mut pair[2..4], sample_or_silence(right, i));
    }
}
