//! End-to-end recovery scenarios, run against real gzip bytes through the
//! public `recover` entry point and temp-file fixtures.

use std::fs;
use std::io::Write;

use gzrecover::{recover, Config, OutputTarget};

fn gzip_bytes(plaintext: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(plaintext).unwrap();
    enc.finish().unwrap()
}

fn write_input(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn clean_gzip_round_trips_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = write_input(&dir, "in.gz", &gzip_bytes(b"hello, world\n"));
    let out_path = dir.path().join("out");

    let cfg = Config::default()
        .with_input_path(Some(input_path))
        .with_output(OutputTarget::Named(out_path.to_string_lossy().into_owned()));
    let stats = recover(&cfg).unwrap();

    assert_eq!(fs::read(&out_path).unwrap(), b"hello, world\n");
    assert_eq!(stats.bytes_written, 13);
}

#[test]
fn corrupt_middle_salvages_both_members() {
    let dir = tempfile::tempdir().unwrap();
    let mut input = gzip_bytes(b"AAAA");
    input.extend((0u8..16).map(|i| i.wrapping_mul(37).wrapping_add(5)));
    input.extend(gzip_bytes(b"BBBB"));
    let input_path = write_input(&dir, "corrupt.gz", &input);

    let out_path = dir.path().join("out");
    let cfg = Config::default()
        .with_input_path(Some(input_path))
        .with_output(OutputTarget::Named(out_path.to_string_lossy().into_owned()));
    let stats = recover(&cfg).unwrap();

    assert_eq!(fs::read(&out_path).unwrap(), b"AAAABBBB");
    assert_eq!(stats.bytes_written, 8);
}

#[test]
fn corrupt_middle_in_split_mode_yields_two_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let mut input = gzip_bytes(b"AAAA");
    input.extend((0u8..16).map(|i| i.wrapping_mul(61).wrapping_add(3)));
    input.extend(gzip_bytes(b"BBBB"));
    let input_path = write_input(&dir, "corrupt.gz", &input);

    let out_base = dir.path().join("out");
    let cfg = Config::default()
        .with_input_path(Some(input_path))
        .with_output(OutputTarget::Named(out_base.to_string_lossy().into_owned()))
        .with_split(true);
    recover(&cfg).unwrap();

    assert_eq!(fs::read(format!("{}.1", out_base.display())).unwrap(), b"AAAA");
    assert_eq!(fs::read(format!("{}.2", out_base.display())).unwrap(), b"BBBB");
}

#[test]
fn truncated_tail_salvages_a_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let plaintext = vec![b'A'; 10 * 1024];
    let full = gzip_bytes(&plaintext);
    let cut = full.len() * 8 / 10;
    let input_path = write_input(&dir, "truncated.gz", &full[..cut]);

    let out_path = dir.path().join("out");
    let cfg = Config::default()
        .with_input_path(Some(input_path))
        .with_output(OutputTarget::Named(out_path.to_string_lossy().into_owned()));
    let stats = recover(&cfg).unwrap();

    let recovered = fs::read(&out_path).unwrap();
    assert!(!recovered.is_empty());
    assert!(recovered.len() < plaintext.len());
    assert!(plaintext.starts_with(&recovered));
    assert_eq!(stats.bytes_written, recovered.len() as u64);
}

#[test]
fn garbage_prefix_is_skipped_entirely() {
    let dir = tempfile::tempdir().unwrap();
    let mut input: Vec<u8> = (0u8..32).map(|i| i.wrapping_mul(91).wrapping_add(7)).collect();
    input.extend(gzip_bytes(b"payload after noise"));
    let input_path = write_input(&dir, "noisy.gz", &input);

    let out_path = dir.path().join("out");
    let cfg = Config::default()
        .with_input_path(Some(input_path))
        .with_output(OutputTarget::Named(out_path.to_string_lossy().into_owned()));
    recover(&cfg).unwrap();

    assert_eq!(fs::read(&out_path).unwrap(), b"payload after noise");
}

#[test]
fn empty_input_exits_cleanly_with_an_empty_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = write_input(&dir, "empty.gz", b"");
    let out_path = dir.path().join("out");

    let cfg = Config::default()
        .with_input_path(Some(input_path))
        .with_output(OutputTarget::Named(out_path.to_string_lossy().into_owned()));
    let stats = recover(&cfg).unwrap();

    assert_eq!(stats.bytes_written, 0);
    assert_eq!(fs::read(&out_path).unwrap(), b"");
}
