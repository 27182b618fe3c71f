//! Command-line interface for the `ztester` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity, the `DISPLAY_LEVEL` atomic, and the `display*!` macros. |
//! | [`args`]      | clap-derived [`args::Cli`] and its resolution into a [`crate::driver::RunConfig`]. |
//!
//! Typical call sequence: `parse_args` → `set_display_level` → `Cli::into_config` → `driver::run`.

pub mod constants;
pub mod args;

pub use args::{parse_args, parse_args_from, Cli};
