// ztester: per-chunk compression ratio benchmark for memory dumps

pub mod config;
pub mod cli;
pub mod util;
pub mod measure;
pub mod report;
pub mod driver;

// ── Version ──────────────────────────────────────────────────────────────────
pub const ZTESTER_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use driver::{run, DriverSummary, RunConfig};
pub use measure::{ChunkCompressor, ExternalCompressor};
pub use report::ReportFormat;
