#![no_main]
use libfuzzer_sys::fuzz_target;
use oxilzw::codec::{compress_to_vec, decompress_to_vec};

fuzz_target!(|data: &[u8]| {
    let packed = compress_to_vec(data).unwrap();
    assert_eq!(packed[0], 9);
    let decoded = decompress_to_vec(&packed).unwrap();
    assert_eq!(decoded, data);
});
