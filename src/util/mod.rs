//! Filesystem and I/O helpers shared by the driver and the measurement pipeline.
//!
//! - [`file_list`]: dump directory enumeration (`<dir>/*` semantics).
//! - [`read_full`]: `fread`-style buffer filling that keeps EOF and I/O errors apart.

pub mod file_list;
pub mod read_full;

pub use file_list::list_dump_files;
pub use read_full::read_full;
