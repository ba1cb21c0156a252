//! `rmnew`: remove embedded newlines from selected fields (default: all
//! fields). `-r STR` replaces each newline with STR (default a single
//! space); `-c` instead cuts the field at its first newline, discarding
//! the remainder. `-f` restricts which fields are affected. Grounded on
//! `csved_rmnew.cpp`.

use crate::commands::support::standard_loop;
use crate::error::CsvFixResult;
use crate::fields::{parse_field_list, FieldList};
use crate::flags::{not_both, FlagSpec};

pub const HELP: &str = "rmnew - remove embedded newlines from fields (-f, -r replacement | -c cut)";

fn fix_one(s: &str, cut: bool, replacement: &str) -> String {
    if cut {
        match s.find('\n') {
            Some(i) => s[..i].to_string(),
            None => s.to_string(),
        }
    } else {
        s.replace('\n', replacement)
    }
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::opt("-f"), FlagSpec::opt("-r"), FlagSpec::switch("-c")];
    standard_loop(argv, &specs, |cmd, row| {
        not_both(cmd, "-r", "-c", false)?;
        let fields: FieldList = if cmd.has_flag("-f") {
            parse_field_list(&cmd.get_value("-f"))?
        } else {
            Vec::new()
        };
        let cut = cmd.has_flag("-c");
        let replacement = cmd.get_value_or("-r", " ");

        let mut out = row.clone();
        if fields.is_empty() {
            for v in out.iter_mut() {
                *v = fix_one(v, cut, &replacement);
            }
        } else {
            for &i in &fields {
                if let Some(v) = out.get_mut(i) {
                    *v = fix_one(v, cut, &replacement);
                }
            }
        }
        Ok(Some(out))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_newline_with_given_string() {
        assert_eq!(fix_one("a\nb", false, " / "), "a / b");
    }

    #[test]
    fn cuts_at_first_newline() {
        assert_eq!(fix_one("a\nb\nc", true, " "), "a");
    }

    #[test]
    fn leaves_plain_fields_unchanged() {
        assert_eq!(fix_one("plain", false, " "), "plain");
    }
}
