// Integration tests for measure/mod.rs: InputFile across chunk sizes.
//
//   - One open serves every chunk size; each run starts from offset 0
//   - Totals are the sum of the per-chunk sizes the compressor reports
//   - Chunk failures lower the total instead of aborting the run

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use ztester::config::{ChunkSize, PAGE_SIZE};
use ztester::measure::{ChunkCompressor, ChunkError, ChunkJob, InputFile};

/// Records every job and reports a tenth of each chunk; chunk indices listed
/// in `fail` return an error.
#[derive(Default)]
struct Recorder {
    seen: Vec<(String, usize, u64, usize)>,
    fail: Vec<u64>,
}

impl ChunkCompressor for Recorder {
    fn compress(&mut self, job: &ChunkJob<'_>) -> Result<u64, ChunkError> {
        self.seen.push((
            job.source_name.to_owned(),
            job.chunk_size,
            job.chunk.index,
            job.chunk.len(),
        ));
        if self.fail.contains(&job.chunk.index) {
            return Err(ChunkError::MissingOutput { path: PathBuf::from("missing.zpaq") });
        }
        Ok((job.chunk.len() / 10) as u64)
    }
}

fn write_dump(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn every_chunk_size_rereads_from_start() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "vm.raw", &vec![3u8; 300_000]);
    let mut input = InputFile::open(&path, true).unwrap();
    assert_eq!(input.name(), "vm.raw");
    assert_eq!(input.regsize(), 300_000);

    let mut rec = Recorder::default();
    for size in ChunkSize::all() {
        let run = input.measure(size, &mut rec).unwrap();
        assert_eq!(run.bytes_read, 300_000, "chunk size {}", size);
    }
    assert!(rec.seen.iter().all(|(name, ..)| name == "vm.raw"));
    // 19 + 5 + 2 + 1 + 1
    assert_eq!(rec.seen.len(), 28);
}

#[test]
fn failed_chunks_contribute_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "vm.raw", &vec![9u8; 16_384 * 4]);
    let mut input = InputFile::open(&path, false).unwrap();
    let mut rec = Recorder { fail: vec![1, 2], ..Recorder::default() };
    let run = input.measure(ChunkSize::from_index(0).unwrap(), &mut rec).unwrap();
    assert_eq!(run.chunks, 4);
    assert_eq!(run.failed_chunks, 2);
    assert_eq!(run.compressed_chunks, 2);
    assert_eq!(run.total_compressed_size, 2 * 1638);
    assert!(run.has_ratio());
}

#[test]
fn scan_is_optional() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "z.raw", &vec![0u8; PAGE_SIZE * 3]);
    let scanned = InputFile::open(&path, true).unwrap();
    assert_eq!(scanned.effective_size(), 0);
    assert_eq!(scanned.zero_pages().map(|s| s.zero_pages), Some(3));

    let plain = InputFile::open(&path, false).unwrap();
    assert!(plain.zero_pages().is_none());
    assert_eq!(plain.effective_size(), (PAGE_SIZE * 3) as u64);
}

#[test]
fn missing_file_cannot_be_opened() {
    let dir = TempDir::new().unwrap();
    assert!(InputFile::open(&dir.path().join("absent"), true).is_err());
}
