//! Chunked measurement pipeline.
//!
//! - [`zero_page`]: counts all-zero pages to derive the effective size.
//! - [`chunker`]: splits an input into fixed-size chunks over one reusable buffer.
//! - [`compressor`]: the [`ChunkCompressor`] seam and the external-process implementation.
//! - [`run`]: drives one (input, chunk size) pair and totals the compressed sizes.
//!
//! [`InputFile`] ties the pieces to a path on disk: [`InputFile::open`] stats
//! and scans the file once, [`InputFile::measure`] rewinds and runs one chunk
//! size.

pub mod zero_page;
pub mod chunker;
pub mod compressor;
pub mod run;

pub use chunker::{chunk_count, Chunk, ChunkReader};
pub use compressor::{ChunkArtifacts, ChunkCompressor, ChunkError, ChunkJob, ExternalCompressor};
pub use run::{run_chunks, RunSummary};
pub use zero_page::{analyze, scan_zero_pages, ZeroPageStats};

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::config::ChunkSize;

/// An input dump opened for measurement.
#[derive(Debug)]
pub struct InputFile {
    path: PathBuf,
    name: String,
    file: File,
    regsize: u64,
    zero_pages: Option<ZeroPageStats>,
}

impl InputFile {
    /// Open `path` and record its size. With `scan_zero_pages`, also run the
    /// zero-page scan; the file is left at offset 0 either way.
    ///
    /// # Errors
    /// Any failure to open, stat, or read the file.
    pub fn open(path: &Path, scan_zero_pages: bool) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let regsize = file.metadata()?.len();
        let zero_pages = if scan_zero_pages {
            Some(analyze(&mut file)?)
        } else {
            None
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(InputFile { path: path.to_path_buf(), name, file, regsize, zero_pages })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component, used to name chunk artifacts.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size reported by the filesystem when the file was opened.
    pub fn regsize(&self) -> u64 {
        self.regsize
    }

    /// Zero-page statistics, when the scan was requested.
    pub fn zero_pages(&self) -> Option<&ZeroPageStats> {
        self.zero_pages.as_ref()
    }

    /// Size minus all-zero pages; equal to [`regsize`](Self::regsize) without a scan.
    pub fn effective_size(&self) -> u64 {
        match &self.zero_pages {
            Some(stats) => stats.effective_size(),
            None => self.regsize,
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.zero_pages {
            Some(stats) => stats.is_empty(),
            None => self.regsize == 0,
        }
    }

    /// Rewind and run every chunk of the file through `compressor`.
    pub fn measure<C>(
        &mut self,
        chunk_size: ChunkSize,
        compressor: &mut C,
    ) -> io::Result<RunSummary>
    where
        C: ChunkCompressor + ?Sized,
    {
        self.file.seek(SeekFrom::Start(0))?;
        run_chunks(&mut self.file, &self.name, chunk_size.bytes(), compressor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PAGE_SIZE;
    use std::fs;
    use tempfile::TempDir;

    struct Fixed(u64);

    impl ChunkCompressor for Fixed {
        fn compress(&mut self, _job: &ChunkJob<'_>) -> Result<u64, ChunkError> {
            Ok(self.0)
        }
    }

    #[test]
    fn open_scans_and_measures_repeatedly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mem.dump");
        let mut data = vec![0u8; PAGE_SIZE * 8];
        data[0] = 1;
        fs::write(&path, &data).unwrap();

        let mut input = InputFile::open(&path, true).unwrap();
        assert_eq!(input.name(), "mem.dump");
        assert_eq!(input.regsize(), (PAGE_SIZE * 8) as u64);
        assert_eq!(input.effective_size(), PAGE_SIZE as u64);

        let c0 = ChunkSize::from_index(0).unwrap();
        let first = input.measure(c0, &mut Fixed(100)).unwrap();
        let second = input.measure(c0, &mut Fixed(100)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.chunks, 2);
        assert_eq!(first.bytes_read, input.regsize());
    }

    #[test]
    fn without_scan_effective_is_regsize() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zeros");
        fs::write(&path, vec![0u8; PAGE_SIZE * 2]).unwrap();
        let input = InputFile::open(&path, false).unwrap();
        assert!(input.zero_pages().is_none());
        assert_eq!(input.effective_size(), input.regsize());
    }

    #[test]
    fn empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();
        let mut input = InputFile::open(&path, true).unwrap();
        assert!(input.is_empty());
        let s = input.measure(ChunkSize::from_index(0).unwrap(), &mut Fixed(1)).unwrap();
        assert_eq!(s.chunks, 0);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(InputFile::open(&dir.path().join("absent"), true).is_err());
    }
}
