//! `tail`: emit the last `-n` records (default 10). Unlike `head`, the
//! whole stream must be read before anything can be written, so this
//! bypasses `standard_loop` and keeps a ring buffer, mirroring
//! `csved_headtail.cpp`'s `TailCommand`.

use crate::commands::support::read_all;
use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{CommandLine, FlagSpec};
use crate::ioman::IOManager;
use std::collections::VecDeque;

pub const HELP: &str = "tail - output the last N records (-n, default 10)";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::opt("-n")];
    let cmd = CommandLine::parse(argv, &specs)?;
    let n: usize = if cmd.has_flag("-n") {
        cmd.get_value("-n")
            .trim()
            .parse()
            .map_err(|_| CsvFixError::dispatch("Invalid -n value"))?
    } else {
        10
    };

    let mut io = IOManager::new(&cmd)?;
    let rows = read_all(&mut io)?;
    let mut buf: VecDeque<_> = rows.into();
    while buf.len() > n {
        buf.pop_front();
    }
    for row in buf {
        io.write_row(&row)?;
    }
    Ok(())
}
