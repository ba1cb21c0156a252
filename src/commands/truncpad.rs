//! `truncate`/`pad`: fix every selected field to a width, either cutting
//! it down (`truncate -n`) or right/left padding it (`pad -n -p`).
//! Grounded on `csved_truncpad.cpp`, which implements both as one
//! `TruncPadCommand` switched by which subcommand name invoked it.

use crate::commands::support::standard_loop;
use crate::error::{CsvFixError, CsvFixResult};
use crate::fields::{parse_field_list, FieldList};
use crate::flags::FlagSpec;

pub const TRUNCATE_HELP: &str = "truncate - cut fields down to width N (-n, -f)";
pub const PAD_HELP: &str = "pad - pad fields out to width N (-n, -p char, -f)";

fn fields_of(cmd: &crate::flags::CommandLine) -> CsvFixResult<FieldList> {
    if cmd.has_flag("-f") {
        parse_field_list(&cmd.get_value("-f"))
    } else {
        Ok(Vec::new())
    }
}

fn width_of(cmd: &crate::flags::CommandLine) -> CsvFixResult<usize> {
    cmd.get_value("-n")
        .trim()
        .parse()
        .map_err(|_| CsvFixError::dispatch("Invalid -n value"))
}

pub fn run_truncate(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::req("-n"), FlagSpec::opt("-f")];
    standard_loop(argv, &specs, |cmd, row| {
        let n = width_of(cmd)?;
        let fields = fields_of(cmd)?;
        let mut out = row.clone();
        apply(&mut out, &fields, |v| {
            if v.chars().count() > n {
                v.chars().take(n).collect()
            } else {
                v.clone()
            }
        });
        Ok(Some(out))
    })
}

pub fn run_pad(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::req("-n"), FlagSpec::opt("-p"), FlagSpec::opt("-f")];
    standard_loop(argv, &specs, |cmd, row| {
        let n = width_of(cmd)?;
        let fields = fields_of(cmd)?;
        let pad_char = cmd.get_value_or("-p", " ").chars().next().unwrap_or(' ');
        let mut out = row.clone();
        apply(&mut out, &fields, |v| {
            let len = v.chars().count();
            if len >= n {
                v.clone()
            } else {
                let mut s = v.clone();
                s.extend(std::iter::repeat(pad_char).take(n - len));
                s
            }
        });
        Ok(Some(out))
    })
}

fn apply<F: Fn(&String) -> String>(row: &mut [String], fields: &FieldList, f: F) {
    if fields.is_empty() {
        for v in row.iter_mut() {
            *v = f(v);
        }
    } else {
        for &i in fields {
            if let Some(v) = row.get_mut(i) {
                *v = f(v);
            }
        }
    }
}
