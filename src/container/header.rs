use std::io::Write;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{AfcError, Result};
use crate::format::EncodeFormat;

/// Header fields take 24 bytes; the header block is zero-padded to 32.
pub const HEADER_FIELDS_SIZE: usize = 24;
pub const HEADER_SIZE: usize = 32;
pub const ALIGNMENT: usize = 32;

const SAMPLES_PER_FRAME_FIELD: i16 = 16;
const FRAME_RATE_FIELD: i16 = 30;

/// Number of zero bytes that move `len` to the next 32-byte boundary.
/// An already aligned length gets a full block.
pub fn padding_to_boundary(len: usize) -> usize {
    ALIGNMENT - len % ALIGNMENT
}

/// Fixed big-endian header at the start of every AFC stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub data_size: u32,
    pub sample_count: u32,
    pub sample_rate: u16,
    pub format: EncodeFormat,
    /// `Some` when the stream loops.
    pub loop_start: Option<u32>,
}

impl ContainerHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        BigEndian::write_u32(&mut buf[0..4], self.data_size);
        BigEndian::write_u32(&mut buf[4..8], self.sample_count);
        BigEndian::write_u16(&mut buf[8..10], self.sample_rate);
        BigEndian::write_i16(&mut buf[10..12], self.format.code());
        BigEndian::write_i16(&mut buf[12..14], SAMPLES_PER_FRAME_FIELD);
        BigEndian::write_i16(&mut buf[14..16], FRAME_RATE_FIELD);
        BigEndian::write_u32(&mut buf[16..20], self.loop_start.is_some() as u32);
        BigEndian::write_u32(&mut buf[20..24], self.loop_start.unwrap_or(0));
        buf
    }

    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_FIELDS_SIZE {
            return Err(AfcError::InvalidHeader(format!(
                "need {} bytes, got {}",
                HEADER_FIELDS_SIZE,
                bytes.len()
            )));
        }

        let format = match BigEndian::read_i16(&bytes[10..12]) {
            2 => EncodeFormat::Pcm16,
            4 => EncodeFormat::Adpcm4,
            code => {
                return Err(AfcError::InvalidHeader(format!(
                    "unknown format code {}",
                    code
                )))
            }
        };

        let loop_flag = BigEndian::read_u32(&bytes[16..20]);
        let loop_start = BigEndian::read_u32(&bytes[20..24]);

        Ok(Self {
            data_size: BigEndian::read_u32(&bytes[0..4]),
            sample_count: BigEndian::read_u32(&bytes[4..8]),
            sample_rate: BigEndian::read_u16(&bytes[8..10]),
            format,
            loop_start: (loop_flag != 0).then_some(loop_start),
        })
    }
}
