//! `echo`: copy input to output unchanged, subject to the universal flags
//! and `-skip`/`-pass`. The simplest command in the set — grounded on
//! `csved_echo.cpp`, which is itself little more than a pass-through over
//! the I/O manager.

use crate::commands::support::standard_loop;
use crate::error::CsvFixResult;

pub const HELP: &str = "echo - copy CSV input to output unchanged";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    standard_loop(argv, &[], |_cmd, row| Ok(Some(row.clone())))
}
