//! Command-line argument parsing.
//!
//! [`Cli`] is the clap-derived surface; [`Cli::into_config`] layers it over
//! the environment defaults from [`crate::config`] and produces a
//! [`RunConfig`]. [`parse_args_from`] takes an explicit argument list so the
//! parser can be exercised without touching `std::env`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{self, ChunkSize, DEFAULT_COMMAND};
use crate::driver::RunConfig;
use crate::report::ReportFormat;

use super::constants::level_from_flags;

/// Measure per-chunk compression ratios of memory dumps with an external compressor.
///
/// Every file directly inside DUMP_DIR is split into fixed-size chunks, each
/// chunk is compressed separately, and one result line per (file, chunk
/// size) is appended to OUTPUT and echoed to stdout.
#[derive(Debug, Parser)]
#[command(name = "ztester", version)]
pub struct Cli {
    /// Directory containing the dump files to process.
    #[arg(value_name = "DUMP_DIR")]
    pub dump_dir: PathBuf,

    /// Results file; lines are appended, never truncated.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Measure a single chunk size: 0=16 KiB, 1=64 KiB, 2=256 KiB, 3=1 MiB, 4=2 MiB
    /// [default: all five]
    #[arg(
        short = 'b',
        long,
        value_name = "INDEX",
        value_parser = clap::value_parser!(u8).range(0..=4)
    )]
    pub buffer_index: Option<u8>,

    /// Result line format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Effective)]
    pub format: ReportFormat,

    /// Compressor executable [default: $ZTESTER_COMPRESSOR or ./masterzpaqd]
    #[arg(long, value_name = "PATH")]
    pub compressor: Option<PathBuf>,

    /// Subcommand word passed to the compressor.
    #[arg(long, value_name = "WORD", default_value = DEFAULT_COMMAND)]
    pub command: String,

    /// Level argument passed to the compressor [default: $ZTESTER_LEVEL or 3]
    #[arg(short, long, value_name = "N")]
    pub level: Option<u32>,

    /// Directory for chunk files and compressed artifacts; must already exist
    /// [default: $ZTESTER_WORKDIR or testdir]
    #[arg(short, long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Discard the compressor's own stdout and stderr.
    #[arg(long)]
    pub quiet_compressor: bool,

    /// Increase verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

impl Cli {
    /// Display level implied by `-v` / `-q`.
    pub fn display_level(&self) -> u32 {
        level_from_flags(self.verbose, self.quiet)
    }

    /// Chunk sizes selected by `--buffer-index`, or all of them.
    pub fn chunk_sizes(&self) -> Vec<ChunkSize> {
        match self.buffer_index.and_then(|i| ChunkSize::from_index(i as usize)) {
            Some(one) => vec![one],
            None => ChunkSize::all().collect(),
        }
    }

    /// Resolve flags over environment defaults.
    pub fn into_config(self) -> RunConfig {
        let chunk_sizes = self.chunk_sizes();
        RunConfig {
            dump_dir: self.dump_dir,
            output: self.output,
            chunk_sizes,
            format: self.format,
            compressor: self.compressor.unwrap_or_else(config::init_compressor),
            command: self.command,
            level: self.level.unwrap_or_else(config::init_level),
            work_dir: self.work_dir.unwrap_or_else(config::init_work_dir),
            quiet_compressor: self.quiet_compressor,
        }
    }
}

/// Parse an explicit argument list; `args[0]` is the program name.
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Parse `std::env::args_os()`.
pub fn parse_args() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CHUNK_SIZES;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        parse_args_from(std::iter::once("ztester").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn two_operands_sweep_all_sizes() {
        let cli = parse(&["dumps", "out.txt"]).unwrap();
        assert_eq!(cli.dump_dir, PathBuf::from("dumps"));
        assert_eq!(cli.output, PathBuf::from("out.txt"));
        let sizes: Vec<usize> = cli.chunk_sizes().into_iter().map(ChunkSize::bytes).collect();
        assert_eq!(sizes, CHUNK_SIZES.to_vec());
        assert_eq!(cli.format, ReportFormat::Effective);
    }

    #[test]
    fn buffer_index_selects_one_size() {
        let cli = parse(&["-b", "2", "dumps", "out.txt"]).unwrap();
        let sizes: Vec<usize> = cli.chunk_sizes().into_iter().map(ChunkSize::bytes).collect();
        assert_eq!(sizes, vec![262_144]);
    }

    #[test]
    fn buffer_index_range_matches_table() {
        assert!(parse(&["-b", &(CHUNK_SIZES.len() - 1).to_string(), "d", "o"]).is_ok());
        let err = parse(&["-b", &CHUNK_SIZES.len().to_string(), "d", "o"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn missing_operand_is_an_error() {
        let err = parse(&["dumps"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());
    }

    #[test]
    fn help_is_not_an_error_exit() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn ratio_format_and_compressor_options() {
        let cli = parse(&[
            "--format", "ratio", "--compressor", "/opt/zpaq", "--command", "c", "-l", "5",
            "-w", "/tmp/work", "--quiet-compressor", "d", "o",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.format, ReportFormat::Ratio);
        assert_eq!(config.compressor, PathBuf::from("/opt/zpaq"));
        assert_eq!(config.command, "c");
        assert_eq!(config.level, 5);
        assert_eq!(config.work_dir, PathBuf::from("/tmp/work"));
        assert!(config.quiet_compressor);
    }

    #[test]
    fn verbosity_flags() {
        assert_eq!(parse(&["d", "o"]).unwrap().display_level(), 2);
        assert_eq!(parse(&["-vv", "d", "o"]).unwrap().display_level(), 4);
        assert_eq!(parse(&["-q", "d", "o"]).unwrap().display_level(), 1);
        assert!(parse(&["-v", "-q", "d", "o"]).is_err());
    }

    #[test]
    fn command_defaults_to_cinst() {
        assert_eq!(parse(&["d", "o"]).unwrap().command, "cinst");
    }
}
