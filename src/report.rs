//! Ratio computation and result-line output.
//!
//! Each (input, chunk size) pair yields exactly one line, written both to the
//! console and to the append-only results log. Two line shapes exist:
//!
//! ```text
//! effective: <path> buffsz <size>, Raw CR, <raw:.2>, Effective CR, <eff:.2>
//! ratio:     <path> buffsz <size>: <raw:.6> CR
//! failure:   <path> buffsz <size>: Compression failed or zero compressed size.
//! ```
//!
//! In the effective format a blank line follows the last chunk size of each
//! input.

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::Path;

use clap::ValueEnum;

use crate::displaylevel;

/// Shape of the result lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Raw and zero-page-adjusted ratios, two decimals, blank line per file.
    #[default]
    Effective,
    /// Raw ratio only, six decimals; no zero-page scan.
    Ratio,
}

impl ReportFormat {
    /// Whether this format needs the zero-page scan.
    pub fn needs_zero_pages(self) -> bool {
        matches!(self, ReportFormat::Effective)
    }
}

/// Inputs of one result line.
#[derive(Debug, Clone, Copy)]
pub struct Measurement<'a> {
    pub path: &'a Path,
    pub chunk_size: usize,
    pub regsize: u64,
    pub effective_size: u64,
    pub total_compressed_size: u64,
}

/// `size / compressed`, or `None` when `compressed` is zero.
pub fn compression_ratio(size: u64, compressed: u64) -> Option<f64> {
    if compressed == 0 {
        None
    } else {
        Some(size as f64 / compressed as f64)
    }
}

/// Render the line for `m` without a trailing newline.
pub fn format_line(format: ReportFormat, m: &Measurement<'_>) -> String {
    let path = m.path.display();
    let raw = compression_ratio(m.regsize, m.total_compressed_size);

    match format {
        ReportFormat::Effective => {
            let eff = if m.effective_size > 0 {
                compression_ratio(m.effective_size, m.total_compressed_size)
            } else {
                None
            };
            match (raw, eff) {
                (Some(raw), Some(eff)) => format!(
                    "{} buffsz {}, Raw CR, {:.2}, Effective CR, {:.2}",
                    path, m.chunk_size, raw, eff
                ),
                _ => failure_line(m),
            }
        }
        ReportFormat::Ratio => match raw {
            Some(raw) => format!("{} buffsz {}: {:.6} CR", path, m.chunk_size, raw),
            None => failure_line(m),
        },
    }
}

fn failure_line(m: &Measurement<'_>) -> String {
    format!(
        "{} buffsz {}: Compression failed or zero compressed size.",
        m.path.display(),
        m.chunk_size
    )
}

/// Writes result lines to a log and a console sink.
///
/// The log is authoritative: its write errors are returned. The console only
/// echoes; the first console error is displayed and echoing stops for the
/// rest of the run.
#[derive(Debug)]
pub struct Reporter<L: Write, O: Write> {
    log: L,
    console: O,
    console_closed: bool,
    format: ReportFormat,
    lines: u64,
}

impl Reporter<File, Stdout> {
    /// Open `path` for appending (creating it if needed) and echo to stdout.
    /// Existing content is never truncated.
    pub fn append_to(path: &Path, format: ReportFormat) -> io::Result<Self> {
        let log = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Reporter::new(log, io::stdout(), format))
    }
}

impl<L: Write, O: Write> Reporter<L, O> {
    pub fn new(log: L, console: O, format: ReportFormat) -> Self {
        Reporter { log, console, console_closed: false, format, lines: 0 }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Result lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// `true` once a console write has failed.
    pub fn console_closed(&self) -> bool {
        self.console_closed
    }

    /// Append the line for `m` to the log, then echo it to the console.
    pub fn report(&mut self, m: &Measurement<'_>) -> io::Result<()> {
        let line = format_line(self.format, m);
        writeln!(self.log, "{}", line)?;
        self.lines += 1;
        self.echo(|console| writeln!(console, "{}", line));
        Ok(())
    }

    /// Close off one input: blank separator line in the effective format,
    /// then flush both sinks so the log only ever holds whole lines.
    pub fn finish_file(&mut self) -> io::Result<()> {
        if self.format == ReportFormat::Effective {
            writeln!(self.log)?;
            self.echo(|console| writeln!(console));
        }
        self.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.log.flush()?;
        self.echo(|console| console.flush());
        Ok(())
    }

    pub fn into_inner(self) -> (L, O) {
        (self.log, self.console)
    }

    fn echo<F>(&mut self, write: F)
    where
        F: FnOnce(&mut O) -> io::Result<()>,
    {
        if self.console_closed {
            return;
        }
        if let Err(e) = write(&mut self.console) {
            displaylevel!(
                1,
                "Warning : console output stopped ({}); results still go to the log \n",
                e
            );
            self.console_closed = true;
        }
    }
}
