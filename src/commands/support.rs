//! Shared per-command plumbing: the standard read-transform-write loop
//! that most commands build on, plus small helpers commands reach for
//! repeatedly (reading all records up front, resolving a field by name or
//! index).

use crate::csv::Record;
use crate::error::CsvFixResult;
use crate::flags::{CommandLine, FlagSpec, Predicates};
use crate::ioman::IOManager;

/// Run the standard per-record loop: parse `argv`, compile `-skip`/`-pass`,
/// open an `IOManager`, and call `transform` for every record that survives
/// the predicates. `transform` returns `Some(row)` to emit a record (its
/// own, usually a modified copy of the input) or `None` to drop it.
pub fn standard_loop<F>(argv: &[String], specs: &[FlagSpec], mut transform: F) -> CsvFixResult<()>
where
    F: FnMut(&CommandLine, &Record) -> CsvFixResult<Option<Record>>,
{
    let cmd = CommandLine::parse(argv, specs)?;
    let preds = Predicates::compile(&cmd)?;
    let mut io = IOManager::new(&cmd)?;
    let mut row = Record::new();
    while io.read_csv(&mut row)? {
        if preds.should_skip(&row)? {
            continue;
        }
        if preds.should_pass(&row)? {
            io.write_row(&row)?;
            continue;
        }
        if let Some(out) = transform(&cmd, &row)? {
            io.write_row(&out)?;
        }
    }
    Ok(())
}

/// Read every record from `io` into memory, for commands (`shuffle`,
/// `unique -d`, `stat`) that need the whole stream before producing output.
pub fn read_all(io: &mut IOManager) -> CsvFixResult<Vec<Record>> {
    let mut rows = Vec::new();
    let mut row = Record::new();
    while io.read_csv(&mut row)? {
        rows.push(row.clone());
    }
    Ok(rows)
}

pub fn field_value(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}
