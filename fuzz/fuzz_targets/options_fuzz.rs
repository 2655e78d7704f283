#![no_main]
use libfuzzer_sys::fuzz_target;
use oxilzw::codec::{CodecOptions, DictionaryCodec};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Narrow widths reset often; small chunks split matches across refills.
    let opts = CodecOptions {
        max_code_width: 9 + data[0] % 4,
        read_chunk_size: 1 + data[1] as usize,
    };
    let payload = &data[2..];

    let mut codec = DictionaryCodec::with_options(opts).unwrap();
    let mut packed = Vec::new();
    codec.compress(&mut &payload[..], &mut packed).unwrap();
    assert!(codec.stats().max_code_width <= codec.options().max_code_width);

    let mut out = Vec::new();
    codec.decompress(&mut &packed[..], &mut out).unwrap();
    assert_eq!(out, payload);
});
