//! Binary entry point for the `ztester` benchmark tool.
//!
//! # Control flow
//!
//! 1. [`parse_args`] reads the command line; usage errors exit with 1,
//!    `--help` and `--version` print and exit with 0.
//! 2. The `-v` / `-q` count sets the global display level.
//! 3. [`Cli::into_config`] fills in environment defaults and [`run`] sweeps
//!    the dump directory. Any setup failure it reports exits with 1.

use ztester::cli::constants::{display_level, set_display_level, AUTHOR, PROGRAM_NAME};
use ztester::cli::{parse_args, Cli};
use ztester::driver::run;

fn main() {
    let cli: Cli = match parse_args() {
        Ok(c) => c,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            // Printing only fails when the terminal is gone; the exit code still stands.
            let _ = e.print();
            std::process::exit(code);
        }
    };

    set_display_level(cli.display_level());
    ztester::displaylevel!(
        3,
        "*** {} v{} {}-bit, by {} ***\n",
        PROGRAM_NAME,
        ztester::ZTESTER_VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8,
        AUTHOR
    );

    let config = cli.into_config();
    ztester::displaylevel!(
        4,
        "compressor {} {} {} in {} (display level {})\n",
        config.compressor.display(),
        config.command,
        config.level,
        config.work_dir.display(),
        display_level()
    );

    match run(&config) {
        Ok(summary) => {
            ztester::displaylevel!(
                3,
                "{} file(s), {} line(s) written, {} failed, {} skipped \n",
                summary.files,
                summary.lines,
                summary.failed_runs,
                summary.skipped_files
            );
        }
        Err(e) => {
            ztester::displaylevel!(1, "{}: {:#}\n", PROGRAM_NAME, e);
            std::process::exit(1);
        }
    }
}
