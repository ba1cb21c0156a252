//! `read_multi`: assemble one output record from several consecutive
//! input lines, rather than csvfix's usual one-record-per-line. `-n N`
//! groups every N raw lines into one field each; `-sep STR` instead reads
//! lines until one equal to STR is seen, treating that line as a record
//! separator rather than data. Exactly one of `-n`/`-sep` is required.
//! Grounded on `csved_readmulti.cpp`.

use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{not_both, CommandLine, FlagSpec, Predicates};
use crate::ioman::IOManager;

pub const HELP: &str = "read_multi - combine several input lines into one record (-n count | -sep marker)";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::opt("-n"), FlagSpec::opt("-sep")];
    let cmd = CommandLine::parse(argv, &specs)?;
    not_both(&cmd, "-n", "-sep", true)?;

    let preds = Predicates::compile(&cmd)?;
    let mut io = IOManager::new(&cmd)?;
    let mut line = String::new();

    if cmd.has_flag("-n") {
        let n: usize = cmd
            .get_value("-n")
            .trim()
            .parse()
            .map_err(|_| CsvFixError::dispatch("read_multi: -n needs a positive integer"))?;
        if n == 0 {
            return Err(CsvFixError::dispatch("read_multi: -n must be greater than zero"));
        }
        loop {
            let mut record = Vec::with_capacity(n);
            for _ in 0..n {
                if !io.read_line(&mut line)? {
                    break;
                }
                record.push(line.clone());
            }
            if record.is_empty() {
                break;
            }
            if preds.should_skip(&record)? {
                continue;
            }
            io.write_row(&record)?;
        }
    } else {
        let marker = cmd.get_value("-sep");
        let mut record: Vec<String> = Vec::new();
        while io.read_line(&mut line)? {
            if line == marker {
                if !record.is_empty() {
                    if !preds.should_skip(&record)? {
                        io.write_row(&record)?;
                    }
                    record = Vec::new();
                }
                continue;
            }
            record.push(line.clone());
        }
        if !record.is_empty() && !preds.should_skip(&record)? {
            io.write_row(&record)?;
        }
    }
    Ok(())
}
