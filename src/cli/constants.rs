// cli/constants.rs: Program identity, the display-level global, and the
// console output macro used across the crate.

use std::sync::atomic::{AtomicU32, Ordering};

// ── Identity ──────────────────────────────────────────────────────────────────
pub const PROGRAM_NAME: &str = "ztester";
pub const AUTHOR: &str = "ztester contributors";

// ── Display level ─────────────────────────────────────────────────────────────
//
// 0 = no output; 1 = errors and warnings; 2 = progress and per-chunk
// failures (default); 3 = per-run statistics; 4 = per-chunk trace.
//
// Result lines are not gated by this value: the reporter always writes them.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Default display level before `-v` / `-q` are applied.
pub const DISPLAY_LEVEL_DEFAULT: u32 = 2;

/// Highest meaningful display level.
pub const DISPLAY_LEVEL_MAX: u32 = 4;

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Level resulting from `verbose` uses of `-v` and `quiet` uses of `-q`,
/// starting from [`DISPLAY_LEVEL_DEFAULT`] and clamped to `0..=DISPLAY_LEVEL_MAX`.
pub fn level_from_flags(verbose: u8, quiet: u8) -> u32 {
    let level = DISPLAY_LEVEL_DEFAULT as i64 + verbose as i64 - quiet as i64;
    level.clamp(0, DISPLAY_LEVEL_MAX as i64) as u32
}

// ── Display macros ────────────────────────────────────────────────────────────

/// Print to stderr when the display level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
