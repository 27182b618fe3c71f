// e2e/cli_integration.rs: black-box tests of the `ztester` binary's
// argument handling and exit codes, using std::process::Command.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Locate the `ztester` binary produced by Cargo.
fn ztester_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_ztester") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("ztester");
    p
}

fn run_in(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(ztester_bin())
        .args(args)
        .current_dir(dir.path())
        .env_remove("ZTESTER_COMPRESSOR")
        .env_remove("ZTESTER_LEVEL")
        .env_remove("ZTESTER_WORKDIR")
        .output()
        .expect("failed to run ztester")
}

// ── Usage errors ─────────────────────────────────────────────────────────────

#[test]
fn no_arguments_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn single_operand_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["dumps"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn buffer_index_out_of_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("dumps")).unwrap();
    let out = run_in(&dir, &["-b", "5", "dumps", "out.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn unknown_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["--format", "csv", "dumps", "out.txt"]);
    assert_eq!(out.status.code(), Some(1));
}

// ── Help / version ───────────────────────────────────────────────────────────

#[test]
fn help_exits_zero() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["--help"]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("DUMP_DIR"));
    assert!(text.contains("--buffer-index"));
}

#[test]
fn version_exits_zero() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

// ── Setup failures ───────────────────────────────────────────────────────────

#[test]
fn missing_dump_directory_exits_one() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["nope", "out.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot enumerate dump directory"));
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn unwritable_output_exits_one() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("dumps")).unwrap();
    fs::write(dir.path().join("dumps/a.raw"), [1u8; 64]).unwrap();
    let out = run_in(&dir, &["dumps", "no/such/dir/out.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot open results file"));
}

#[test]
fn empty_dump_directory_exits_zero() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("dumps")).unwrap();
    let out = run_in(&dir, &["dumps", "out.txt"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn quiet_flag_silences_diagnostics() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["-qq", "nope", "out.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stderr.is_empty());
}
