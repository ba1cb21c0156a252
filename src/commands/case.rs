//! `case`: change the letter case of selected fields. The subcommand name
//! itself (`upper`/`lower`/`mixed`) selects the mode, matching the
//! original's three thin subclasses in `csved_case.cpp`; `mixed` title-
//! cases each whitespace-separated word.

use crate::commands::support::standard_loop;
use crate::error::CsvFixResult;
use crate::fields::{parse_field_list, FieldList};
use crate::flags::FlagSpec;

pub const UPPER_HELP: &str = "upper - convert fields to upper case (-f)";
pub const LOWER_HELP: &str = "lower - convert fields to lower case (-f)";
pub const MIXED_HELP: &str = "mixed - title-case fields (-f)";

fn mixed_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_with<F: Fn(&str) -> String + 'static>(argv: &[String], transform: F) -> CsvFixResult<()> {
    let specs = [FlagSpec::opt("-f")];
    standard_loop(argv, &specs, move |cmd, row| {
        let fields: FieldList = if cmd.has_flag("-f") {
            parse_field_list(&cmd.get_value("-f"))?
        } else {
            Vec::new()
        };
        let mut out = row.clone();
        if fields.is_empty() {
            for v in out.iter_mut() {
                *v = transform(v);
            }
        } else {
            for &i in &fields {
                if let Some(v) = out.get_mut(i) {
                    *v = transform(v);
                }
            }
        }
        Ok(Some(out))
    })
}

pub fn run_upper(argv: &[String]) -> CsvFixResult<()> {
    run_with(argv, |s| s.to_uppercase())
}

pub fn run_lower(argv: &[String]) -> CsvFixResult<()> {
    run_with(argv, |s| s.to_lowercase())
}

pub fn run_mixed(argv: &[String]) -> CsvFixResult<()> {
    run_with(argv, mixed_case)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_case_title_cases_words() {
        assert_eq!(mixed_case("HELLO world"), "Hello World");
    }
}
