//! `unique`: drop records that repeat an earlier one, compared either over
//! the whole record or over a `-f` field list; `-d` inverts the sense to
//! emit only the duplicates, including the first occurrence of each
//! repeated key. Since that first occurrence isn't known to be a
//! duplicate until its second occurrence arrives, `-d` holds each key's
//! first row back and emits it (then the second row) once the key
//! repeats; every later occurrence of an already-confirmed key is then
//! emitted inline. Grounded on `csved_unique.cpp`.

use crate::commands::support::field_value;
use crate::error::CsvFixResult;
use crate::fields::{parse_field_list, FieldList};
use crate::flags::{CommandLine, FlagSpec};
use crate::ioman::IOManager;
use std::collections::{HashMap, HashSet};

pub const HELP: &str = "unique - drop repeated records (-f fields, -d keep only duplicates)";

fn key(row: &[String], fields: &FieldList) -> Vec<String> {
    if fields.is_empty() {
        row.to_vec()
    } else {
        fields.iter().map(|&i| field_value(row, i)).collect()
    }
}

enum DupState {
    Pending(Vec<String>),
    Confirmed,
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::opt("-f"), FlagSpec::switch("-d")];
    let cmd = CommandLine::parse(argv, &specs)?;
    let fields = if cmd.has_flag("-f") {
        parse_field_list(&cmd.get_value("-f"))?
    } else {
        Vec::new()
    };
    let dups_only = cmd.has_flag("-d");

    let mut io = IOManager::new(&cmd)?;
    let mut row = Vec::new();

    if dups_only {
        let mut seen: HashMap<Vec<String>, DupState> = HashMap::new();
        while io.read_csv(&mut row)? {
            let k = key(&row, &fields);
            match seen.get_mut(&k) {
                None => {
                    seen.insert(k, DupState::Pending(row.clone()));
                }
                Some(DupState::Pending(first)) => {
                    let first = std::mem::take(first);
                    io.write_row(&first)?;
                    io.write_row(&row)?;
                    seen.insert(k, DupState::Confirmed);
                }
                Some(DupState::Confirmed) => {
                    io.write_row(&row)?;
                }
            }
        }
    } else {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        while io.read_csv(&mut row)? {
            let k = key(&row, &fields);
            if seen.insert(k) {
                io.write_row(&row)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_whole_row_when_no_fields_given() {
        let row = vec!["a".to_string(), "b".to_string()];
        assert_eq!(key(&row, &[]), row);
    }

    #[test]
    fn key_uses_named_fields_when_given() {
        let row = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(key(&row, &vec![0, 2]), vec!["a".to_string(), "c".to_string()]);
    }
}
