//! `check`: validate CSV syntax without transforming anything, reporting
//! every error found to stderr and exiting non-zero if any were found
//! (`-v` for verbose per-record tracing, `-nl` to disallow embedded
//! newlines, `-s` to stop after the first error). With `-q`, output is
//! suppressed and the command exits at the first error instead of
//! scanning the rest of the input. Grounded on `csved_check.cpp`, which
//! drives `CSVChecker`'s syntax-only reader.

use crate::csv::checker::CsvChecker;
use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{CommandLine, FlagSpec};
use crate::ioman::IOManager;

pub const HELP: &str = "check - validate CSV syntax, exit non-zero on error (-nl, -s, -q, -v)";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::switch("-nl"),
        FlagSpec::switch("-s"),
        FlagSpec::switch("-q"),
        FlagSpec::switch("-v"),
    ];
    let cmd = CommandLine::parse(argv, &specs)?;
    let allow_embedded_newline = !cmd.has_flag("-nl");
    let quiet = cmd.has_flag("-q");
    let stop_at_first = cmd.has_flag("-s") || quiet;
    let verbose = cmd.has_flag("-v");

    let io = IOManager::new(&cmd)?;
    let sep = io.sep();
    let mut error_count = 0usize;

    for i in 0..io.in_stream_count() {
        let (name, reader) = io.open_raw(i)?;
        let mut checker = CsvChecker::new(&name, reader, sep, allow_embedded_newline);
        loop {
            match checker.next_record() {
                Ok(None) => break,
                Ok(Some(row)) => {
                    if verbose {
                        eprintln!("{}: OK ({} fields)", name, row.len());
                    }
                }
                Err(e) => {
                    error_count += 1;
                    if !quiet {
                        if let Some(text) = e.line_text() {
                            eprintln!("{}: {}", e, text);
                        } else {
                            eprintln!("{}", e);
                        }
                    }
                    if stop_at_first {
                        return Err(e);
                    }
                }
            }
        }
    }

    if error_count > 0 {
        return Err(CsvFixError::logic(format!("check: {} error(s) found", error_count)));
    }
    Ok(())
}
