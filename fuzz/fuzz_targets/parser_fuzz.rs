#![no_main]
use libfuzzer_sys::fuzz_target;

// Every flag, subcommand and boundary value the oxilzw CLI knows about.
const TOKENS: &[&str] = &[
    "compress",
    "decompress",
    "info",
    "config",
    "-f",
    "--force",
    "-q",
    "--quiet",
    "-v",
    "-vv",
    "--verbose",
    "--json",
    "-c",
    "--stdout",
    "--input",
    "--output",
    "--max-code-width",
    "8",
    "9",
    "31",
    "32",
    "-",
    "in.lzw",
    "out.bin",
];

// Bytes below 0x80 pick a known token; a run of bytes at or above 0x80
// becomes one free-form token so clap also sees arbitrary text.
fuzz_target!(|data: &[u8]| {
    let mut args = Vec::<String>::new();
    let mut i = 0;
    while i < data.len() && args.len() < 32 {
        let b = data[i];
        if b < 0x80 {
            args.push(TOKENS[usize::from(b) % TOKENS.len()].to_string());
            i += 1;
            continue;
        }
        let start = i;
        while i < data.len() && data[i] >= 0x80 {
            i += 1;
        }
        let raw: Vec<u8> = data[start..i].iter().map(|b| b & 0x7F).collect();
        args.push(String::from_utf8_lossy(&raw).into_owned());
    }
    oxilzw::cli::fuzz_try_parse_args(&args);
});
