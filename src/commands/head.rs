//! `head`: emit the first `-n` records (default 10), grounded on
//! `csved_headtail.cpp`'s `HeadCommand`.

use crate::commands::support::standard_loop;
use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{CommandLine, FlagSpec};

pub const HELP: &str = "head - output the first N records (-n, default 10)";

fn count(cmd: &CommandLine) -> CsvFixResult<usize> {
    if !cmd.has_flag("-n") {
        return Ok(10);
    }
    cmd.get_value("-n")
        .trim()
        .parse()
        .map_err(|_| CsvFixError::dispatch("Invalid -n value"))
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::opt("-n")];
    let mut emitted = 0usize;
    let mut limit = None;
    standard_loop(argv, &specs, |cmd, row| {
        if limit.is_none() {
            limit = Some(count(cmd)?);
        }
        if emitted < limit.unwrap() {
            emitted += 1;
            Ok(Some(row.clone()))
        } else {
            Ok(None)
        }
    })
}
