use oxilzw::codec::{CodecOptions, DictionaryCodec, compress_to_vec, compress_to_vec_with};
use oxilzw::{DecoderState, Error};
use proptest::prelude::*;

fn decode(packed: &[u8]) -> Result<Vec<u8>, Error> {
    let mut codec = DictionaryCodec::new();
    let mut out = Vec::new();
    codec.decompress(&mut &packed[..], &mut out)?;
    Ok(out)
}

proptest! {
    #[test]
    fn prop_compress_decompress_roundtrip(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        max_code_width in 9u8..=16u8
    ) {
        let opts = CodecOptions { max_code_width, ..Default::default() };
        let packed = compress_to_vec_with(&data, opts).unwrap();
        prop_assert_eq!(decode(&packed).unwrap(), data);
    }

    #[test]
    fn prop_low_entropy_roundtrip(
        data in proptest::collection::vec(0u8..4, 0..20_000),
        max_code_width in 9u8..=12u8
    ) {
        let opts = CodecOptions { max_code_width, ..Default::default() };
        let packed = compress_to_vec_with(&data, opts).unwrap();
        prop_assert_eq!(decode(&packed).unwrap(), data);
    }

    #[test]
    fn prop_header_is_nine(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        prop_assert_eq!(compress_to_vec(&data).unwrap()[0], 9);
    }

    #[test]
    fn prop_chunk_size_does_not_change_output(
        data in proptest::collection::vec(any::<u8>(), 0..4096),
        read_chunk_size in 1usize..300
    ) {
        let expected = compress_to_vec(&data).unwrap();
        let opts = CodecOptions { read_chunk_size, ..Default::default() };
        prop_assert_eq!(compress_to_vec_with(&data, opts.clone()).unwrap(), expected.clone());

        let mut codec = DictionaryCodec::with_options(opts).unwrap();
        let mut out = Vec::new();
        codec.decompress(&mut &expected[..], &mut out).unwrap();
        prop_assert_eq!(out, data);
    }

    #[test]
    fn prop_repeated_units_compress(
        unit in proptest::collection::vec(any::<u8>(), 4..16),
        repeats in 8usize..64
    ) {
        let data: Vec<u8> = unit.iter().copied().cycle().take(unit.len() * repeats).collect();
        let mut codec = DictionaryCodec::new();
        codec.compress(&mut &data[..], &mut Vec::new()).unwrap();
        prop_assert!(codec.stats().codes < data.len() as u64);
    }

    #[test]
    fn prop_arbitrary_streams_fail_cleanly(
        body in proptest::collection::vec(any::<u8>(), 0..512),
        header in 9u8..=31u8
    ) {
        let mut stream = vec![header];
        stream.extend_from_slice(&body);
        let mut codec = DictionaryCodec::new();
        let result = codec.decompress(&mut &stream[..], &mut Vec::new());
        let expected = if result.is_ok() { DecoderState::Done } else { DecoderState::Failed };
        prop_assert_eq!(codec.decoder_state(), expected);
        if let Err(e) = result {
            prop_assert!(e.is_corrupt_stream(), "unexpected error kind: {e:?}");
        }
    }

    #[test]
    fn prop_out_of_range_headers_rejected(header in prop_oneof![0u8..9, 32u8..=255]) {
        prop_assert!(matches!(decode(&[header, 0, 0]), Err(Error::MalformedHeader(h)) if h == header));
    }
}

#[test]
#[ignore = "performance properties are workload and machine dependent"]
fn perf_property_roundtrip_not_pathological() {
    use std::time::Instant;
    let data: Vec<u8> = (0..16 * 1024 * 1024usize)
        .map(|i| ((i * 31) ^ (i >> 7)) as u8)
        .collect();

    let t0 = Instant::now();
    let packed = compress_to_vec(&data).unwrap();
    let unpacked = decode(&packed).unwrap();
    let dt = t0.elapsed();
    assert_eq!(unpacked, data);
    assert!(dt.as_secs_f64() < 20.0, "roundtrip took {:?}", dt);
}
