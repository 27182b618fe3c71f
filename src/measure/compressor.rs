//! Compressor adapter.
//!
//! The harness never compresses anything itself. [`ChunkCompressor`] is the
//! seam: given one chunk it returns the compressed size or a [`ChunkError`].
//! [`ExternalCompressor`] implements it by staging the chunk to a file,
//! running an external executable as
//!
//! ```text
//! <program> <command> <level> <compressed_out> <chunk_in>
//! ```
//!
//! and reading the artifact size back from filesystem metadata.
//!
//! Both files live under the work directory and are named after the source
//! file, the chunk size, and the chunk index, so no two chunks of any run
//! share a path. [`ChunkArtifacts`] removes them on drop: cleanup happens on
//! success, on every failure path, and on unwinding.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::{
    CHUNK_EXTENSION, COMPRESSED_EXTENSION, DEFAULT_COMMAND, DEFAULT_LEVEL,
};
use crate::displaylevel;

use super::chunker::Chunk;

// ── Job / error types ─────────────────────────────────────────────────────────

/// One unit of work for a [`ChunkCompressor`].
#[derive(Debug, Clone, Copy)]
pub struct ChunkJob<'a> {
    /// File name (no directory) of the input the chunk came from.
    pub source_name: &'a str,
    /// Configured chunk size of the run, in bytes.
    pub chunk_size: usize,
    pub chunk: Chunk<'a>,
}

/// Why a single chunk produced no usable compressed size.
///
/// Every variant is recoverable: the run counts the chunk as contributing
/// zero bytes and moves on.
#[derive(Debug)]
pub enum ChunkError {
    /// The chunk could not be written to its staging file.
    Stage { path: PathBuf, source: io::Error },
    /// The compressor process could not be started.
    Spawn { program: PathBuf, source: io::Error },
    /// The compressor ran but did not exit successfully.
    Status { index: u64, status: ExitStatus },
    /// No compressed artifact was found after a successful exit.
    MissingOutput { path: PathBuf },
    /// The compressed artifact exists but is empty.
    EmptyOutput { path: PathBuf },
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::Stage { path, source } => {
                write!(f, "Error creating temp chunk file {}: {}", path.display(), source)
            }
            ChunkError::Spawn { program, source } => {
                write!(f, "Error starting compressor {}: {}", program.display(), source)
            }
            ChunkError::Status { index, status } => {
                write!(f, "Compression failed for chunk {}: {}", index, status)
            }
            ChunkError::MissingOutput { path } | ChunkError::EmptyOutput { path } => {
                write!(f, "Compressed file missing or empty: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChunkError::Stage { source, .. } | ChunkError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Something that can report the compressed size of a chunk.
pub trait ChunkCompressor {
    /// Compress `job.chunk` and return the compressed size in bytes (never zero).
    fn compress(&mut self, job: &ChunkJob<'_>) -> Result<u64, ChunkError>;
}

impl<C: ChunkCompressor + ?Sized> ChunkCompressor for &mut C {
    fn compress(&mut self, job: &ChunkJob<'_>) -> Result<u64, ChunkError> {
        (**self).compress(job)
    }
}

// ── Artifact paths ────────────────────────────────────────────────────────────

/// Staging and output paths for one chunk. Both files are removed on drop.
#[derive(Debug)]
pub struct ChunkArtifacts {
    chunk_path: PathBuf,
    compressed_path: PathBuf,
}

impl ChunkArtifacts {
    /// `<work_dir>/<source>_chunk_<chunk_size>_<index>{.bin,.zpaq}`.
    pub fn new(work_dir: &Path, job: &ChunkJob<'_>) -> Self {
        let stem = format!("{}_chunk_{}_{}", job.source_name, job.chunk_size, job.chunk.index);
        ChunkArtifacts {
            chunk_path: work_dir.join(format!("{stem}{CHUNK_EXTENSION}")),
            compressed_path: work_dir.join(format!("{stem}{COMPRESSED_EXTENSION}")),
        }
    }

    pub fn chunk_path(&self) -> &Path {
        &self.chunk_path
    }

    pub fn compressed_path(&self) -> &Path {
        &self.compressed_path
    }
}

impl Drop for ChunkArtifacts {
    fn drop(&mut self) {
        for path in [&self.chunk_path, &self.compressed_path] {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    displaylevel!(1, "Warning : could not remove {}: {}\n", path.display(), e);
                }
            }
        }
    }
}

// ── External process implementation ───────────────────────────────────────────

/// Runs an external executable once per chunk.
#[derive(Debug, Clone)]
pub struct ExternalCompressor {
    program: PathBuf,
    command: String,
    level: u32,
    work_dir: PathBuf,
    quiet: bool,
}

impl ExternalCompressor {
    /// Compressor `program` writing its artifacts under `work_dir`, with the
    /// default command word and level.
    pub fn new(program: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        ExternalCompressor {
            program: program.into(),
            command: DEFAULT_COMMAND.to_owned(),
            level: DEFAULT_LEVEL,
            work_dir: work_dir.into(),
            quiet: false,
        }
    }

    pub fn set_command(&mut self, command: impl Into<String>) -> &mut Self {
        self.command = command.into();
        self
    }

    pub fn set_level(&mut self, level: u32) -> &mut Self {
        self.level = level;
        self
    }

    /// Discard the child's stdout and stderr instead of inheriting them.
    pub fn set_quiet(&mut self, quiet: bool) -> &mut Self {
        self.quiet = quiet;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// The process invocation for one chunk's artifacts.
    pub fn command_for(&self, artifacts: &ChunkArtifacts) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.command)
            .arg(self.level.to_string())
            .arg(artifacts.compressed_path())
            .arg(artifacts.chunk_path())
            .stdin(Stdio::null());
        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        cmd
    }
}

impl ChunkCompressor for ExternalCompressor {
    fn compress(&mut self, job: &ChunkJob<'_>) -> Result<u64, ChunkError> {
        let artifacts = ChunkArtifacts::new(&self.work_dir, job);

        fs::write(artifacts.chunk_path(), job.chunk.data).map_err(|source| ChunkError::Stage {
            path: artifacts.chunk_path().to_path_buf(),
            source,
        })?;

        let mut cmd = self.command_for(&artifacts);
        displaylevel!(4, "chunk {} : {:?}\n", job.chunk.index, cmd);
        let status = cmd.status().map_err(|source| ChunkError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(ChunkError::Status { index: job.chunk.index, status });
        }

        match fs::metadata(artifacts.compressed_path()) {
            Ok(meta) if meta.len() > 0 => Ok(meta.len()),
            Ok(_) => Err(ChunkError::EmptyOutput {
                path: artifacts.compressed_path().to_path_buf(),
            }),
            Err(_) => Err(ChunkError::MissingOutput {
                path: artifacts.compressed_path().to_path_buf(),
            }),
        }
        // `artifacts` drops here on every path above.
    }
}
