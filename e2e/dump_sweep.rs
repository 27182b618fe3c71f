// e2e/dump_sweep.rs: full sweeps of a dump directory through stand-in
// compressors written as shell scripts.
//
// The binary is pointed at `/bin/sh` with the script as the command word, so
// each chunk runs `sh <script> <level> <out.zpaq> <in.bin>`.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

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

/// Writes exactly 10 bytes per chunk.
const TEN_BYTES: &str = "printf '0123456789' > \"$2\"\n";
/// Fails every chunk without output.
const ALWAYS_FAIL: &str = "exit 3\n";
/// Fails only when the level argument is 9.
const FAIL_AT_LEVEL_9: &str = "[ \"$1\" = 9 ] && exit 1\nprintf '0123456789' > \"$2\"\n";

struct Bench {
    dir: TempDir,
}

impl Bench {
    fn new(stub: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dumps")).unwrap();
        fs::create_dir(dir.path().join("work")).unwrap();
        fs::write(dir.path().join("stub.sh"), stub).unwrap();
        Bench { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn dump(&self, name: &str, data: &[u8]) -> PathBuf {
        let p = self.root().join("dumps").join(name);
        fs::write(&p, data).unwrap();
        p
    }

    fn run(&self, extra: &[&str]) -> Output {
        let stub = self.root().join("stub.sh");
        Command::new(ztester_bin())
            .arg("--compressor")
            .arg("/bin/sh")
            .arg("--command")
            .arg(&stub)
            .arg("--work-dir")
            .arg(self.root().join("work"))
            .args(extra)
            .arg(self.root().join("dumps"))
            .arg(self.root().join("out.txt"))
            .current_dir(self.root())
            .output()
            .expect("failed to run ztester")
    }

    fn log(&self) -> String {
        fs::read_to_string(self.root().join("out.txt")).unwrap()
    }

    fn work_is_empty(&self) -> bool {
        fs::read_dir(self.root().join("work")).unwrap().next().is_none()
    }
}

#[test]
fn single_size_effective_line() {
    let b = Bench::new(TEN_BYTES);
    let a = b.dump("a.raw", &vec![0xAB; 40_000]);
    let out = b.run(&["-b", "0"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    // 3 chunks × 10 bytes; no zero pages.
    let line = format!("{} buffsz 16384, Raw CR, 1333.33, Effective CR, 1333.33", a.display());
    assert_eq!(b.log(), format!("{line}\n\n"));
    assert_eq!(String::from_utf8_lossy(&out.stdout), format!("{line}\n\n"));
    assert!(b.work_is_empty());
}

#[test]
fn full_sweep_writes_five_lines_per_file_in_order() {
    let b = Bench::new(TEN_BYTES);
    b.dump("b.raw", &vec![1u8; 5_000]);
    b.dump("a.raw", &vec![2u8; 5_000]);
    fs::create_dir(b.root().join("dumps/subdir")).unwrap();
    let out = b.run(&[]);
    assert!(out.status.success());

    let log = b.log();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 12);
    for (i, size) in [16_384, 65_536, 262_144, 1_048_576, 2_097_152].iter().enumerate() {
        assert!(lines[i].contains("a.raw"));
        assert!(lines[i].contains(&format!("buffsz {size}, Raw CR, 500.00")));
        assert!(lines[6 + i].contains("b.raw"));
    }
    assert_eq!(lines[5], "");
    assert_eq!(lines[11], "");
    assert!(!log.contains("subdir"));
}

#[test]
fn results_are_appended_across_runs() {
    let b = Bench::new(TEN_BYTES);
    b.dump("a.raw", &vec![7u8; 1_000]);
    assert!(b.run(&["-b", "1", "--format", "ratio"]).status.success());
    assert!(b.run(&["-b", "1", "--format", "ratio"]).status.success());
    let line = format!("{} buffsz 65536: 100.000000 CR\n", b.root().join("dumps/a.raw").display());
    assert_eq!(b.log(), format!("{line}{line}"));
}

#[test]
fn failing_compressor_yields_failure_lines_and_exit_zero() {
    let b = Bench::new(ALWAYS_FAIL);
    let a = b.dump("a.raw", &vec![5u8; 20_000]);
    let out = b.run(&["-b", "0"]);
    assert!(out.status.success());
    assert_eq!(
        b.log(),
        format!("{} buffsz 16384: Compression failed or zero compressed size.\n\n", a.display())
    );
    assert!(String::from_utf8_lossy(&out.stderr).contains("Compression failed for chunk 0"));
    assert!(b.work_is_empty());
}

#[test]
fn level_is_forwarded_to_compressor() {
    let b = Bench::new(FAIL_AT_LEVEL_9);
    b.dump("a.raw", &vec![5u8; 100]);
    assert!(b.run(&["-b", "0", "-l", "9"]).status.success());
    assert!(b.log().contains("Compression failed"));
    fs::remove_file(b.root().join("out.txt")).unwrap();
    assert!(b.run(&["-b", "0", "-l", "2"]).status.success());
    assert!(b.log().contains("Raw CR, 10.00"));
}

#[test]
fn zero_pages_lower_the_effective_size() {
    let b = Bench::new(TEN_BYTES);
    let mut data = vec![0u8; 4096 * 4];
    data[..4096].fill(0x11);
    let a = b.dump("half.raw", &data);
    assert!(b.run(&["-b", "0"]).status.success());
    // One chunk, 10 bytes; 16384 raw, 4096 effective.
    assert_eq!(
        b.log(),
        format!("{} buffsz 16384, Raw CR, 1638.40, Effective CR, 409.60\n\n", a.display())
    );
}

#[test]
fn empty_dump_file_reports_failure() {
    let b = Bench::new(TEN_BYTES);
    b.dump("empty.raw", b"");
    assert!(b.run(&["-b", "4"]).status.success());
    assert!(b.log().starts_with(&format!(
        "{} buffsz 2097152: Compression failed",
        b.root().join("dumps/empty.raw").display()
    )));
}

#[test]
fn missing_work_directory_fails_every_chunk() {
    let b = Bench::new(TEN_BYTES);
    b.dump("a.raw", &vec![1u8; 100]);
    fs::remove_dir(b.root().join("work")).unwrap();
    let out = b.run(&["-b", "0"]);
    assert!(out.status.success());
    assert!(b.log().contains("Compression failed"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("does not exist"));
}
