use afc_encoder::adpcm::FrameEncoder;
use afc_encoder::container::{ContainerHeader, HEADER_SIZE};
use afc_encoder::{write_container, AudioSource, EncodeFormat};

fn tone(len: usize, period: f32, amplitude: f32) -> Vec<i16> {
    (0..len)
        .map(|i| (amplitude * (2.0 * std::f32::consts::PI * i as f32 / period).sin()) as i16)
        .collect()
}

#[test]
fn payload_length_follows_format() {
    for n in [0usize, 1, 15, 16, 17, 100, 1023] {
        let adpcm = AudioSource::new(tone(n, 50.0, 9000.0), tone(n, 70.0, 9000.0), 32_000);
        let stream = write_container(&adpcm);
        assert_eq!(stream.payload().len(), n.div_ceil(16) * 18, "adpcm4 n = {}", n);
        assert_eq!(stream.bytes.len() % 32, 0);

        let pcm = adpcm.with_format(EncodeFormat::Pcm16);
        let stream = write_container(&pcm);
        assert_eq!(stream.payload().len(), n * 4, "pcm16 n = {}", n);
        assert_eq!(stream.bytes.len() % 32, 0);
    }
}

#[test]
fn empty_pcm16_stream_is_header_plus_padding() {
    let source = AudioSource::new(Vec::new(), Vec::new(), 32_000).with_format(EncodeFormat::Pcm16);
    let stream = write_container(&source);

    let header = ContainerHeader::parse(&stream.bytes).unwrap();
    assert_eq!(header.data_size, 0);
    assert_eq!(header.sample_count, 0);
    assert_eq!(header.sample_rate, 32_000);
    assert_eq!(header.format, EncodeFormat::Pcm16);
    assert_eq!(header.loop_start, None);

    assert_eq!(&stream.bytes[16..24], &[0u8; 8]);
    assert_eq!(stream.bytes.len(), HEADER_SIZE + 32);
    assert!(stream.bytes[24..].iter().all(|&b| b == 0));
}

#[test]
fn adpcm4_payload_interleaves_channel_frames() {
    let left = tone(32, 20.0, 12_000.0);
    let right = tone(32, 9.0, 5_000.0);
    let source = AudioSource::new(left.clone(), right.clone(), 32_000);
    let stream = write_container(&source);
    let payload = stream.payload();

    let mut encoder = FrameEncoder::new();
    let l = encoder.encode_channel(&left, 32, None);
    let r = encoder.encode_channel(&right, 32, None);

    assert_eq!(payload.len(), 36);
    assert_eq!(&payload[0..9], l.frame(0));
    assert_eq!(&payload[9..18], r.frame(0));
    assert_eq!(&payload[18..27], l.frame(1));
    assert_eq!(&payload[27..36], r.frame(1));
    assert_eq!(stream.report.left_error, l.total_error);
    assert_eq!(stream.report.right_error, r.total_error);
}

#[test]
fn loop_end_clamps_encoded_length() {
    let source = AudioSource::new(tone(500, 40.0, 8000.0), tone(500, 40.0, 8000.0), 22_050)
        .with_loop(64, 200);
    let stream = write_container(&source);
    let header = ContainerHeader::parse(&stream.bytes).unwrap();

    assert_eq!(header.sample_count, 200);
    assert_eq!(header.data_size, 13 * 18);
    assert_eq!(header.loop_start, Some(64));
    assert_eq!(stream.payload().len(), 13 * 18);
}

#[test]
fn misaligned_loop_start_is_rounded_up() {
    let source = AudioSource::new(tone(256, 30.0, 8000.0), tone(256, 30.0, 8000.0), 32_000)
        .with_loop(70, 256);
    let stream = write_container(&source);
    let header = ContainerHeader::parse(&stream.bytes).unwrap();

    assert_eq!(header.loop_start, Some(80));
    assert!(stream.report.plan.loop_alignment.unwrap().was_corrected());

    // Frame 5 starts at sample 80 and must use the zero coefficient pair.
    let payload = stream.payload();
    assert_eq!(payload[5 * 18] & 0x0F, 0);
    assert_eq!(payload[5 * 18 + 9] & 0x0F, 0);
}

#[test]
fn encoding_twice_is_byte_identical() {
    let source = AudioSource::new(tone(777, 33.0, 20_000.0), tone(777, 12.5, 15_000.0), 32_000)
        .with_loop(128, 700);
    let first = write_container(&source);
    let second = write_container(&source);
    assert_eq!(first, second);
}

#[test]
fn short_channels_read_as_silence() {
    let left = tone(10, 8.0, 4000.0);
    let source = AudioSource::new(left.clone(), Vec::new(), 32_000).with_sample_count(40);
    let stream = write_container(&source);
    assert_eq!(stream.payload().len(), 3 * 18);

    let mut padded = left;
    padded.resize(40, 0);
    let explicit = AudioSource::new(padded, vec![0; 40], 32_000);
    assert_eq!(write_container(&explicit).bytes, stream.bytes);

    let pcm = AudioSource::new(vec![0x1234], Vec::new(), 32_000)
        .with_sample_count(2)
        .with_format(EncodeFormat::Pcm16);
    let stream = write_container(&pcm);
    assert_eq!(stream.payload(), &[0x12, 0x34, 0, 0, 0, 0, 0, 0]);
}
