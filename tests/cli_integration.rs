use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_oxilzw").to_string()
}

#[test]
fn cli_compress_decompress_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("input.lzw");
    let output = dir.path().join("output.txt");

    std::fs::write(&input, b"TOBEORNOTTOBEORTOBEORNOT").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&packed).unwrap(),
        [0x09u8, 0x54, 0x9e, 0x08, 0x29, 0xf2, 0x44, 0x8a, 0x93, 0x27, 0x54, 0x02, 0x0e, 0x2c, 0xa8, 0x90, 0xa0, 0x41, 0x84]
    );

    let st = Command::new(bin())
        .args(["decompress", "--input"])
        .arg(&packed)
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&input).unwrap()
    );
}

#[test]
fn cli_stdio_pipeline() {
    let data: Vec<u8> = (0..50_000u32).map(|i| (i % 97) as u8).collect();

    let mut child = Command::new(bin())
        .args(["compress", "--max-code-width", "10"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&data).unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());
    assert_eq!(packed.stdout[0], 9);

    let mut child = Command::new(bin())
        .arg("decompress")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&packed.stdout)
        .unwrap();
    let unpacked = child.wait_with_output().unwrap();
    assert!(unpacked.status.success());
    assert_eq!(unpacked.stdout, data);
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let packed = dir.path().join("in.lzw");
    std::fs::write(&input, b"payload").unwrap();
    std::fs::write(&packed, b"existing").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert_eq!(st.code(), Some(1));
    assert_eq!(std::fs::read(&packed).unwrap(), b"existing");

    let st = Command::new(bin())
        .args(["--force", "compress"])
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&packed).unwrap()[0], 9);
}

#[test]
fn cli_corrupt_input_fails_and_removes_output() {
    let dir = tempdir().unwrap();
    let packed = dir.path().join("bad.lzw");
    let output = dir.path().join("out.bin");
    std::fs::write(&packed, [0x09u8, 0x2c, 0x01]).unwrap();

    let out = Command::new(bin())
        .arg("decompress")
        .arg(&packed)
        .arg(&output)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("300"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn cli_info_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let packed = dir.path().join("in.lzw");
    std::fs::write(&input, b"AAAAAAAAAA").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());

    let out = Command::new(bin())
        .args(["--json", "info"])
        .arg(&packed)
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(json["command"], "info");
    assert_eq!(json["header_code_width"], 9);
    assert_eq!(json["decoded_size"], 10);
    assert_eq!(json["codes"], 4);
}

#[test]
fn cli_rejects_bad_max_code_width() {
    let st = Command::new(bin())
        .args(["compress", "--max-code-width", "40"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(!st.success());
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("MAX_CODE_WIDTH=31"));
}
