//! `trim`: strip whitespace from field values. `-f` selects which fields
//! (default all); `-l`/`-t` restrict trimming to leading/trailing only,
//! `-w` collapses internal runs of whitespace to a single space. Grounded
//! on `csved_trim.cpp`.

use crate::commands::support::standard_loop;
use crate::error::CsvFixResult;
use crate::fields::{parse_field_list, FieldList};
use crate::flags::FlagSpec;

pub const HELP: &str = "trim - strip whitespace from fields (-f, -l, -t, -w)";

fn collapse_internal(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_one(s: &str, lead: bool, trail: bool, collapse: bool) -> String {
    let s = match (lead, trail) {
        (true, false) => s.trim_start(),
        (false, true) => s.trim_end(),
        _ => s.trim(),
    };
    if collapse {
        collapse_internal(s)
    } else {
        s.to_string()
    }
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::opt("-f"),
        FlagSpec::switch("-l"),
        FlagSpec::switch("-t"),
        FlagSpec::switch("-w"),
    ];
    standard_loop(argv, &specs, |cmd, row| {
        let fields: FieldList = if cmd.has_flag("-f") {
            parse_field_list(&cmd.get_value("-f"))?
        } else {
            Vec::new()
        };
        let lead = cmd.has_flag("-l");
        let trail = cmd.has_flag("-t");
        let collapse = cmd.has_flag("-w");

        let mut out = row.clone();
        if fields.is_empty() {
            for v in out.iter_mut() {
                *v = trim_one(v, lead, trail, collapse);
            }
        } else {
            for &i in &fields {
                if let Some(v) = out.get_mut(i) {
                    *v = trim_one(v, lead, trail, collapse);
                }
            }
        }
        Ok(Some(out))
    })
}
