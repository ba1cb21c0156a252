//! `order`: rewrite each record under one of three mutually exclusive
//! field-selection modes — `-f` index list, `-fn` header-name list
//! (requires `-ifn` so a column map is available), or `-ef` exclusion list
//! (emit everything except the named fields, in original order). `-rf`
//! reverses the whole row first; the selection mode (if any) then applies
//! against the reversed row, so `-rf -f 1` takes the *last* field. `-nc`
//! omits rather than pads source indexes past the row's width. Grounded on
//! `csved_order.cpp`.

use crate::commands::support::field_value;
use crate::error::{CsvFixError, CsvFixResult};
use crate::fields::{parse_field_list, FieldList};
use crate::flags::{names, CommandLine, FlagSpec, Predicates};
use crate::ioman::IOManager;

pub const HELP: &str =
    "order - reorder/drop fields (-f indexes | -fn names | -ef exclude, -rf reverse row first, -nc no-pad)";

fn resolve_by_name(io: &IOManager, names: &str) -> FieldList {
    names
        .split(',')
        .filter_map(|n| io.column_index(n.trim()))
        .collect()
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::opt("-f"),
        FlagSpec::opt("-fn"),
        FlagSpec::opt("-ef"),
        FlagSpec::switch("-rf"),
        FlagSpec::switch("-nc"),
    ];
    let cmd = CommandLine::parse(argv, &specs)?;
    let selector_count = ["-f", "-fn", "-ef"].iter().filter(|f| cmd.has_flag(f)).count();
    if selector_count > 1 {
        return Err(CsvFixError::dispatch(
            "order: -f, -fn and -ef are mutually exclusive field-selection modes",
        ));
    }

    let preds = Predicates::compile(&cmd)?;
    let by_name = cmd.has_flag("-fn");
    if by_name && !cmd.has_flag(names::IFN) {
        return Err(CsvFixError::dispatch("order: -fn requires -ifn so header names can be resolved"));
    }
    let reverse_row = cmd.has_flag("-rf");
    let no_copy = cmd.has_flag("-nc");
    let exclude: FieldList = if cmd.has_flag("-ef") {
        parse_field_list(&cmd.get_value("-ef"))?
    } else {
        Vec::new()
    };

    let mut io = IOManager::with_column_map(&cmd)?;
    let mut row = Vec::new();
    let mut fields: FieldList = if by_name {
        Vec::new()
    } else if cmd.has_flag("-f") {
        parse_field_list(&cmd.get_value("-f"))?
    } else {
        Vec::new()
    };

    while io.read_csv(&mut row)? {
        if preds.should_skip(&row)? {
            continue;
        }
        if by_name && io.source_changed() {
            fields = resolve_by_name(&io, &cmd.get_value("-fn"));
        }
        if preds.should_pass(&row)? {
            io.write_row(&row)?;
            continue;
        }

        let source: Vec<String> = if reverse_row {
            row.iter().rev().cloned().collect()
        } else {
            row.clone()
        };

        let out: Vec<String> = if !exclude.is_empty() {
            source
                .iter()
                .enumerate()
                .filter(|(i, _)| !exclude.contains(i))
                .map(|(_, v)| v.clone())
                .collect()
        } else if !fields.is_empty() {
            fields
                .iter()
                .filter_map(|&i| {
                    if no_copy && i >= source.len() {
                        None
                    } else {
                        Some(field_value(&source, i))
                    }
                })
                .collect()
        } else {
            source
        };
        io.write_row(&out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_row_reverses_before_selection() {
        let row = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let reversed: Vec<String> = row.iter().rev().cloned().collect();
        assert_eq!(reversed, vec!["c".to_string(), "b".to_string(), "a".to_string()]);
    }
}
