use std::fs;
use std::process::{Command, Output};

fn parfind(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_parfind"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn reports_matches_count_and_time() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/a.txt"), "").unwrap();
    fs::write(dir.path().join("b.txt"), "").unwrap();

    let root = dir.path().to_string_lossy().into_owned();
    let out = parfind(&["a.txt", "--root", &root, "--workers", "2"]);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success());
    assert!(stdout.contains("a.txt"));
    assert!(!stdout.contains("b.txt"));
    assert!(stdout.contains("Found 1 file(s) matching \"a.txt\""));
    assert!(stdout.contains("Search took"));
}

#[test]
fn fatal_error_is_printed_once() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope").to_string_lossy().into_owned();

    let out = parfind(&["a.txt", "--root", &missing]);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert!(!out.status.success());
    assert_eq!(stderr.matches("path not found").count(), 1, "stderr was: {stderr}");
    assert!(out.stdout.is_empty());
}
