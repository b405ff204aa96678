use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use dasp_sample::Sample;
use tracing::debug;

use crate::error::{AfcError, Result};
use crate::source::AudioSource;

/// Reads a mono or stereo WAV file into an [`AudioSource`].
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioSource> {
    let file = File::open(path)?;
    read_wav_from(BufReader::new(file))
}

/// Reads WAV data from any reader. Integer and float sample formats are
/// converted to i16; mono is duplicated onto both channels.
pub fn read_wav_from<R: Read>(reader: R) -> Result<AudioSource> {
    let mut wav_reader = hound::WavReader::new(reader)?;
    let spec = wav_reader.spec();

    let sample_rate = u16::try_from(spec.sample_rate)
        .map_err(|_| AfcError::SampleRateOutOfRange(spec.sample_rate))?;

    let channels = spec.channels;
    if channels != 1 && channels != 2 {
        return Err(AfcError::UnsupportedChannels(channels));
    }

    let samples: Vec<i16> = match (spec.bits_per_sample, spec.sample_format) {
        (16, hound::SampleFormat::Int) => wav_reader
            .samples::<i16>()
            .collect::<std::result::Result<_, _>>()?,
        (8, hound::SampleFormat::Int) => wav_reader
            .samples::<i8>()
            .map(|s| s.map(|s| s.to_sample::<i16>()))
            .collect::<std::result::Result<_, _>>()?,
        (24, hound::SampleFormat::Int) => wav_reader
            .samples::<i32>()
            .map(|s| s.map(|s| (s >> 8) as i16))
            .collect::<std::result::Result<_, _>>()?,
        (32, hound::SampleFormat::Int) => wav_reader
            .samples::<i32>()
            .map(|s| s.map(|s| s.to_sample::<i16>()))
            .collect::<std::result::Result<_, _>>()?,
        (32, hound::SampleFormat::Float) => wav_reader
            .samples::<f32>()
            .map(|s| s.map(|s| s.clamp(-1.0, 1.0).to_sample::<i16>()))
            .collect::<std::result::Result<_, _>>()?,
        (bits, format) => return Err(AfcError::UnsupportedSampleFormat { bits, format }),
    };

    let (left, right) = if channels == 1 {
        (samples.clone(), samples)
    } else {
        let left = samples.iter().step_by(2).copied().collect::<Vec<_>>();
        let right = samples.iter().skip(1).step_by(2).copied().collect::<Vec<_>>();
        (left, right)
    };

    let frames = left.len();
    if u32::try_from(frames).is_err() {
        return Err(AfcError::SampleCountOutOfRange(frames));
    }

    debug!(
        sample_rate,
        channels,
        bits = spec.bits_per_sample,
        frames,
        "read WAV input"
    );

    Ok(AudioSource::new(left, right, sample_rate))
}
