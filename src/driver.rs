//! Top-level benchmark loop.
//!
//! For each dump file (in listing order) and each selected chunk size
//! (ascending), open the file once, optionally scan zero pages, then rewind
//! and measure every chunk size in turn, writing one result line per pair.
//! Everything runs sequentially on the calling thread.
//!
//! Setup failures (dump directory, results log, opening or reading an input)
//! are returned as errors and end the process with exit code 1. Failures of
//! individual chunks never surface here; they only lower the compressed total.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::ChunkSize;
use crate::displaylevel;
use crate::measure::{ChunkCompressor, ExternalCompressor, InputFile, RunSummary};
use crate::report::{Measurement, ReportFormat, Reporter};
use crate::util::list_dump_files;

/// Everything one invocation needs, after CLI and environment resolution.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dump_dir: PathBuf,
    pub output: PathBuf,
    /// Chunk sizes to measure, in the order they are reported.
    pub chunk_sizes: Vec<ChunkSize>,
    pub format: ReportFormat,
    pub compressor: PathBuf,
    pub command: String,
    pub level: u32,
    pub work_dir: PathBuf,
    pub quiet_compressor: bool,
}

impl RunConfig {
    /// The external compressor described by this configuration.
    pub fn external_compressor(&self) -> ExternalCompressor {
        let mut c = ExternalCompressor::new(&self.compressor, &self.work_dir);
        c.set_command(self.command.clone())
            .set_level(self.level)
            .set_quiet(self.quiet_compressor);
        c
    }
}

/// Counters for a whole invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    /// Input files measured.
    pub files: u64,
    /// Input files skipped because they could not be stat-ted.
    pub skipped_files: u64,
    /// Result lines written.
    pub lines: u64,
    /// Result lines that reported a failure instead of a ratio.
    pub failed_runs: u64,
}

/// Run the benchmark described by `config` against the external compressor.
pub fn run(config: &RunConfig) -> Result<DriverSummary> {
    let files = list_dump_files(&config.dump_dir)
        .with_context(|| format!("cannot enumerate dump directory {}", config.dump_dir.display()))?;
    displaylevel!(3, "{} file(s) found in {}\n", files.len(), config.dump_dir.display());

    if !config.work_dir.is_dir() {
        displaylevel!(
            1,
            "Warning : work directory {} does not exist; every chunk will fail \n",
            config.work_dir.display()
        );
    }

    let mut reporter = Reporter::append_to(&config.output, config.format)
        .with_context(|| format!("cannot open results file {}", config.output.display()))?;
    let mut compressor = config.external_compressor();

    measure_files(&files, &config.chunk_sizes, &mut compressor, &mut reporter)
}

/// Measure every file at every chunk size through `compressor`, reporting to `reporter`.
pub fn measure_files<C, L, O>(
    files: &[PathBuf],
    chunk_sizes: &[ChunkSize],
    compressor: &mut C,
    reporter: &mut Reporter<L, O>,
) -> Result<DriverSummary>
where
    C: ChunkCompressor + ?Sized,
    L: std::io::Write,
    O: std::io::Write,
{
    let mut summary = DriverSummary::default();

    for path in files {
        displaylevel!(2, "Processing file: {}\n", path.display());

        let regsize = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                displaylevel!(1, "Error getting input file size {}: {}\n", path.display(), e);
                summary.skipped_files += 1;
                continue;
            }
        };

        let mut input = InputFile::open(path, reporter.format().needs_zero_pages())
            .with_context(|| format!("cannot read input file {}", path.display()))?;
        if let Some(stats) = input.zero_pages() {
            displaylevel!(
                3,
                "{} : {} zero pages of {}, effective size {} bytes\n",
                path.display(),
                stats.zero_pages,
                stats.pages_scanned(),
                stats.effective_size()
            );
        }
        if input.is_empty() {
            displaylevel!(2, "Input file is empty: {}\n", path.display());
        }

        for &chunk_size in chunk_sizes {
            let run = measure_one(&mut input, chunk_size, compressor)?;
            let m = Measurement {
                path: path.as_path(),
                chunk_size: chunk_size.bytes(),
                regsize,
                effective_size: input.effective_size(),
                total_compressed_size: run.total_compressed_size,
            };
            reporter.report(&m).context("cannot write result line")?;
            if !run.has_ratio() || (reporter.format().needs_zero_pages() && m.effective_size == 0) {
                summary.failed_runs += 1;
            }
            summary.lines += 1;
        }

        reporter.finish_file().context("cannot flush results file")?;
        summary.files += 1;
    }

    Ok(summary)
}

fn measure_one<C>(
    input: &mut InputFile,
    chunk_size: ChunkSize,
    compressor: &mut C,
) -> Result<RunSummary>
where
    C: ChunkCompressor + ?Sized,
{
    if input.is_empty() {
        return Ok(RunSummary::default());
    }

    let start = Instant::now();
    let run = input
        .measure(chunk_size, compressor)
        .with_context(|| format!("read error on {}", input.path().display()))?;
    displaylevel!(
        3,
        "{} buffsz {} : {} chunks ({} failed), {} -> {} bytes in {:.2?}\n",
        display_name(input.path()),
        chunk_size,
        run.chunks,
        run.failed_chunks,
        run.bytes_read,
        run.total_compressed_size,
        start.elapsed()
    );
    Ok(run)
}

fn display_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy())
}
