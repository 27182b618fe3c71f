// config.rs: Compile-time constants and environment-driven defaults.
//
// Everything the harness treats as fixed (page size, the chunk-size table,
// the compressor's command template) lives here. The three values an operator
// commonly needs to move between machines (compressor path, level argument,
// work directory) can also be supplied through environment variables; CLI
// flags take precedence over both.

use std::fmt;
use std::path::PathBuf;

use crate::cli::constants::display_level;

// ── Zero-page accounting ──────────────────────────────────────────────────────

/// Page size used for zero-page detection. Independent of the chunk size.
pub const PAGE_SIZE: usize = 4096;

// ── Chunk-size table ──────────────────────────────────────────────────────────

/// Chunk sizes selectable by index, in ascending order.
pub const CHUNK_SIZES: [usize; 5] = [16_384, 65_536, 262_144, 1_048_576, 2_097_152];

/// One entry of [`CHUNK_SIZES`], addressed by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkSize {
    index: usize,
}

impl ChunkSize {
    /// Look up the chunk size at `index`; `None` when the index is outside the table.
    pub fn from_index(index: usize) -> Option<Self> {
        if index < CHUNK_SIZES.len() {
            Some(ChunkSize { index })
        } else {
            None
        }
    }

    /// Every configured chunk size, smallest first.
    pub fn all() -> impl Iterator<Item = ChunkSize> {
        (0..CHUNK_SIZES.len()).map(|index| ChunkSize { index })
    }

    pub fn index(self) -> usize {
        self.index
    }

    /// Size in bytes.
    pub fn bytes(self) -> usize {
        CHUNK_SIZES[self.index]
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes())
    }
}

// ── Compressor command template ───────────────────────────────────────────────
//
// The external compressor is invoked as
//   <executable> <command> <level> <compressed_out> <chunk_in>

/// Executable used when neither `--compressor` nor `ZTESTER_COMPRESSOR` is set.
pub const DEFAULT_COMPRESSOR: &str = "./masterzpaqd";

/// Subcommand word passed as the first argument. Stock `zpaq` builds use `c`.
pub const DEFAULT_COMMAND: &str = "cinst";

/// Level argument passed to the compressor.
pub const DEFAULT_LEVEL: u32 = 3;

/// Directory receiving chunk files and compressed artifacts. Must already exist.
pub const DEFAULT_WORK_DIR: &str = "testdir";

/// Extension of the staged (uncompressed) chunk file.
pub const CHUNK_EXTENSION: &str = ".bin";

/// Extension of the compressed artifact produced by the compressor.
pub const COMPRESSED_EXTENSION: &str = ".zpaq";

// ── Environment overrides ─────────────────────────────────────────────────────

pub const ENV_COMPRESSOR: &str = "ZTESTER_COMPRESSOR";
pub const ENV_LEVEL: &str = "ZTESTER_LEVEL";
pub const ENV_WORK_DIR: &str = "ZTESTER_WORKDIR";

/// Compressor executable from `ZTESTER_COMPRESSOR`, or [`DEFAULT_COMPRESSOR`].
pub fn init_compressor() -> PathBuf {
    init_compressor_from(std::env::var(ENV_COMPRESSOR).ok().as_deref())
}

/// Testable core of [`init_compressor`]. An empty value counts as unset.
pub fn init_compressor_from(env_val: Option<&str>) -> PathBuf {
    match env_val {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => PathBuf::from(DEFAULT_COMPRESSOR),
    }
}

/// Level argument from `ZTESTER_LEVEL`, or [`DEFAULT_LEVEL`].
pub fn init_level() -> u32 {
    init_level_from(std::env::var(ENV_LEVEL).ok().as_deref())
}

/// Testable core of [`init_level`].
///
/// A value that is not a plain decimal number is ignored with a warning at
/// display level 2.
pub fn init_level_from(env_val: Option<&str>) -> u32 {
    if let Some(env) = env_val {
        if let Ok(level) = env.trim().parse::<u32>() {
            return level;
        }
        if display_level() >= 2 {
            eprintln!(
                "Ignore environment variable setting {}={}: not a valid unsigned value ",
                ENV_LEVEL, env
            );
        }
    }
    DEFAULT_LEVEL
}

/// Work directory from `ZTESTER_WORKDIR`, or [`DEFAULT_WORK_DIR`].
pub fn init_work_dir() -> PathBuf {
    init_work_dir_from(std::env::var(ENV_WORK_DIR).ok().as_deref())
}

/// Testable core of [`init_work_dir`]. An empty value counts as unset.
pub fn init_work_dir_from(env_val: Option<&str>) -> PathBuf {
    match env_val {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => PathBuf::from(DEFAULT_WORK_DIR),
    }
}
