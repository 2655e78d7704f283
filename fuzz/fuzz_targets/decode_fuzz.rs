#![no_main]
use libfuzzer_sys::fuzz_target;
use oxilzw::codec::decompress_to_vec;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must only ever produce errors, never panics.
    let _ = decompress_to_vec(data);

    // Force a legal header so the code loop gets exercised too.
    if let Some((&first, rest)) = data.split_first() {
        let mut stream = Vec::with_capacity(data.len());
        stream.push(9 + first % 23);
        stream.extend_from_slice(rest);
        let _ = decompress_to_vec(&stream);
    }
});
