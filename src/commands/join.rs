//! `join`: treat the last positional file as the right-hand side and all
//! preceding inputs as the left-hand side, performing an equi-join on a
//! list of `left:right` 1-based field-index pairs (`-f`, e.g. `2:1` or
//! `1:1,2:2`). `-oj` emits unjoined left rows with blank fills for the
//! right side (outer join); `-inv` emits only unjoined left rows instead
//! (mutually exclusive with `-oj`); `-ic` folds both sides' keys to
//! lower case before comparing; `-kr` retains the right side's key
//! fields in the output instead of dropping them (they duplicate the
//! left key by construction). The right-hand side is read once into a
//! hash multimap keyed by the concatenation of its key fields; left rows
//! are then probed against it in input order. Grounded on `csved_join.cpp`.

use crate::csv::stream::{StreamParser, StreamParserOptions};
use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{names, CommandLine, FlagSpec};
use crate::ioman::IOManager;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

pub const HELP: &str = "join - equi-join left sources against the last source (-f L:R,..., -oj, -inv, -ic, -kr)";

fn norm(s: &str, ic: bool) -> String {
    if ic {
        s.to_lowercase()
    } else {
        s.to_string()
    }
}

/// `-f` is a comma-separated list of `left:right` 1-based field pairs.
fn parse_join_spec(spec: &str) -> CsvFixResult<Vec<(usize, usize)>> {
    spec.split(',')
        .map(|pair| {
            let (l, r) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| CsvFixError::dispatch(format!("Invalid join pair in -f: {}", pair)))?;
            let l: usize = l
                .trim()
                .parse()
                .map_err(|_| CsvFixError::dispatch(format!("Invalid join pair in -f: {}", pair)))?;
            let r: usize = r
                .trim()
                .parse()
                .map_err(|_| CsvFixError::dispatch(format!("Invalid join pair in -f: {}", pair)))?;
            if l == 0 || r == 0 {
                return Err(CsvFixError::logic("join field indexes are 1-based and must be >= 1"));
            }
            Ok((l - 1, r - 1))
        })
        .collect()
}

fn composite_key(row: &[String], indexes: &[usize], ic: bool) -> String {
    indexes
        .iter()
        .map(|&i| norm(row.get(i).map(String::as_str).unwrap_or(""), ic))
        .collect::<Vec<_>>()
        .join("\u{1}")
}

fn right_fields(row: &[String], key_indexes: &[usize], keep_keys: bool) -> Vec<String> {
    if keep_keys {
        row.to_vec()
    } else {
        row.iter()
            .enumerate()
            .filter(|(i, _)| !key_indexes.contains(i))
            .map(|(_, v)| v.clone())
            .collect()
    }
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::req("-f"),
        FlagSpec::switch("-oj"),
        FlagSpec::switch("-inv"),
        FlagSpec::switch("-ic"),
        FlagSpec::switch("-kr"),
    ];
    let mut cmd = CommandLine::parse(argv, &specs)?;
    let pairs = parse_join_spec(&cmd.get_value("-f"))?;
    let ic = cmd.has_flag("-ic");
    let outer = cmd.has_flag("-oj");
    let invert = cmd.has_flag("-inv");
    let keep_right_keys = cmd.has_flag("-kr");
    if outer && invert {
        return Err(CsvFixError::dispatch("join: -oj and -inv are mutually exclusive"));
    }
    if cmd.files.len() < 2 {
        return Err(CsvFixError::dispatch("join: requires at least two input sources (left... right)"));
    }

    let right_path = cmd.files.pop().unwrap();
    let left_keys: Vec<usize> = pairs.iter().map(|&(l, _)| l).collect();
    let right_keys: Vec<usize> = pairs.iter().map(|&(_, r)| r).collect();
    let ibl = cmd.has_flag(names::IBL);

    let mut io = IOManager::new(&cmd)?;
    let sep = io.sep();

    let file = File::open(&right_path)
        .map_err(|e| CsvFixError::Io(format!("Cannot open join file {}: {}", right_path, e)))?;
    let mut right_parser = StreamParser::new(
        BufReader::new(file),
        StreamParserOptions { sep, ignore_blank_lines: ibl, skip_header_record: false, build_column_map: false },
    );

    let mut table: HashMap<String, Vec<Vec<String>>> = HashMap::new();
    let mut right_width = 0usize;
    while let Some(row) = right_parser.next_record()? {
        right_width = right_width.max(row.len());
        let key = composite_key(&row, &right_keys, ic);
        table.entry(key).or_default().push(row);
    }

    let blank_right_width = right_width.saturating_sub(if keep_right_keys { 0 } else { right_keys.len() });

    let mut row = Vec::new();
    while io.read_csv(&mut row)? {
        let key = composite_key(&row, &left_keys, ic);
        let matches = table.get(&key);

        if invert {
            if matches.is_none() {
                io.write_row(&row)?;
            }
            continue;
        }

        match matches {
            Some(rights) => {
                for right_row in rights {
                    let mut out = row.clone();
                    out.extend(right_fields(right_row, &right_keys, keep_right_keys));
                    io.write_row(&out)?;
                }
            }
            None if outer => {
                let mut out = row.clone();
                out.extend(std::iter::repeat(String::new()).take(blank_right_width));
                io.write_row(&out)?;
            }
            None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_join_pairs() {
        assert_eq!(parse_join_spec("2:1,3:4").unwrap(), vec![(1, 0), (2, 3)]);
    }

    #[test]
    fn composite_key_joins_with_sentinel() {
        let row = vec!["a".to_string(), "b".to_string()];
        assert_eq!(composite_key(&row, &[0, 1], false), "a\u{1}b");
    }

    #[test]
    fn right_fields_drops_key_columns_by_default() {
        let row = vec!["1".to_string(), "X".to_string()];
        assert_eq!(right_fields(&row, &[0], false), vec!["X".to_string()]);
        assert_eq!(right_fields(&row, &[0], true), vec!["1".to_string(), "X".to_string()]);
    }
}
