use std::fs;
use std::path::Path;

use huffpack::config::ToolConfig;
use huffpack::session::Session;

fn session() -> Session {
    Session::new(ToolConfig::default())
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn compress_then_decompress_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let original = b"It was the best of times, it was the worst of times".repeat(50);
    fs::write(&input, &original).unwrap();

    let (packed, cstats) = session().compress_file(&input, None).unwrap();
    assert_eq!(packed, dir.path().join("notes.txt.hf"));
    assert_eq!(fs::metadata(&packed).unwrap().len(), cstats.output_bytes);
    assert!(cstats.output_bytes < original.len() as u64);

    let restored_path = dir.path().join("restored.txt");
    let (restored, dstats) = session().decompress_file(&packed, Some(&restored_path)).unwrap();
    assert_eq!(restored, restored_path);
    assert_eq!(dstats.output_bytes, original.len() as u64);
    assert_eq!(fs::read(&restored).unwrap(), original);
}

#[test]
fn empty_file_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty");
    fs::write(&input, b"").unwrap();

    let (packed, _) = session().compress_file(&input, None).unwrap();
    let out = dir.path().join("empty.out");
    session().decompress_file(&packed, Some(&out)).unwrap();
    assert!(fs::read(&out).unwrap().is_empty());
}

#[test]
fn bad_magic_leaves_no_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plain.hf");
    fs::write(&input, b"definitely not a huffman stream").unwrap();

    let err = session().decompress_file(&input, None).unwrap_err();
    let codec = err.downcast_ref::<huffpack::CodecError>().unwrap();
    assert!(codec.is_malformed_header());

    assert_eq!(entries(dir.path()), vec!["plain.hf"]);
}

#[test]
fn truncated_file_leaves_no_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.bin");
    fs::write(&input, (0..4000u32).map(|i| (i * 7 % 251) as u8).collect::<Vec<_>>()).unwrap();

    let (packed, _) = session().compress_file(&input, None).unwrap();
    let bytes = fs::read(&packed).unwrap();
    fs::write(&packed, &bytes[..bytes.len() / 2]).unwrap();

    let out = dir.path().join("data.out");
    let err = session().decompress_file(&packed, Some(&out)).unwrap_err();
    assert!(err.downcast_ref::<huffpack::CodecError>().unwrap().is_truncated());
    assert!(!out.exists());
}

#[test]
fn existing_output_is_not_clobbered() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("a.txt");
    fs::write(&input, b"aaaa").unwrap();
    fs::write(dir.path().join("a.txt.hf"), b"keep me").unwrap();

    assert!(session().compress_file(&input, None).is_err());
    assert_eq!(fs::read(dir.path().join("a.txt.hf")).unwrap(), b"keep me");
}

#[test]
fn verify_and_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("v.txt");
    fs::write(&input, b"AAB").unwrap();

    let verification = session().verify_file(&input).unwrap();
    assert!(verification.hash_match);
    assert_eq!(verification.original_hash, verification.restored_hash);

    let (packed, _) = session().compress_file(&input, None).unwrap();
    let inspection = session().inspect_file(&packed).unwrap();
    assert_eq!(inspection.leaves, 3);
    assert!(inspection.outline.contains("EOF"));
}

#[test]
fn input_named_like_output_plus_part_survives() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("p.txt");
    let original = b"backup contents, backup contents".repeat(10);
    fs::write(&plain, &original).unwrap();

    let packed = dir.path().join("backup.part");
    session().compress_file(&plain, Some(&packed)).unwrap();
    let packed_bytes = fs::read(&packed).unwrap();

    let restored = dir.path().join("backup");
    session().decompress_file(&packed, Some(&restored)).unwrap();

    assert_eq!(fs::read(&packed).unwrap(), packed_bytes);
    assert_eq!(fs::read(&restored).unwrap(), original);
}

#[test]
fn unrelated_part_file_beside_output_survives() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("log.txt");
    fs::write(&input, b"line one\nline two\n").unwrap();
    let neighbour = dir.path().join("log.txt.hf.part");
    fs::write(&neighbour, b"someone else's download").unwrap();

    session().compress_file(&input, None).unwrap();
    assert_eq!(fs::read(&neighbour).unwrap(), b"someone else's download");

    // failed decode into the same directory must not touch it either
    let bogus = dir.path().join("junk.hf");
    fs::write(&bogus, b"junk").unwrap();
    let overwriting = Session::new(ToolConfig {
        overwrite: true,
        ..ToolConfig::default()
    });
    let packed = dir.path().join("log.txt.hf");
    let packed_bytes = fs::read(&packed).unwrap();
    assert!(overwriting.decompress_file(&bogus, Some(&packed)).is_err());

    assert_eq!(fs::read(&neighbour).unwrap(), b"someone else's download");
    assert_eq!(fs::read(&packed).unwrap(), packed_bytes);
}

#[test]
fn failed_commit_over_directory_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("src.txt");
    fs::write(&input, b"some bytes to compress").unwrap();
    let dest = dir.path().join("occupied");
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("inside"), b"x").unwrap();

    let overwriting = Session::new(ToolConfig {
        overwrite: true,
        ..ToolConfig::default()
    });
    assert!(overwriting.compress_file(&input, Some(&dest)).is_err());

    assert_eq!(entries(dir.path()), vec!["occupied", "src.txt"]);
    assert_eq!(entries(&dest), vec!["inside"]);
}
