//! `put`: insert a computed value as a new field. `-p` gives the 1-based
//! position to insert at (default: append); `-v` a literal value, with
//! three recognized special tokens: `@DATE` (today's date, ISO form),
//! `@DATETIME` (current local date and time) and `@COUNT` (a counter
//! starting at 1 and incrementing once per record); `-e NAME` reads the
//! named environment variable instead (empty string if unset). Grounded
//! on `csved_put.cpp`.

use crate::commands::support::standard_loop;
use crate::error::CsvFixResult;
use crate::flags::{not_both, FlagSpec};
use chrono::Local;

pub const HELP: &str = "put - insert a literal, @DATE/@DATETIME/@COUNT token, or env var as a new field (-p, -v | -e)";

fn literal_value(raw: &str, count: &mut i64) -> String {
    match raw {
        "@DATE" => Local::now().format("%Y-%m-%d").to_string(),
        "@DATETIME" => Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "@COUNT" => {
            let n = *count;
            *count += 1;
            n.to_string()
        }
        other => other.to_string(),
    }
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::opt("-p"),
        FlagSpec::opt("-v"),
        FlagSpec::opt("-e"),
    ];
    let mut count: i64 = 1;
    standard_loop(argv, &specs, move |cmd, row| {
        not_both(cmd, "-v", "-e", true)?;
        let value = if cmd.has_flag("-v") {
            literal_value(&cmd.get_value("-v"), &mut count)
        } else {
            std::env::var(cmd.get_value("-e")).unwrap_or_default()
        };

        let mut out = row.clone();
        let pos = if cmd.has_flag("-p") {
            cmd.get_value("-p").trim().parse::<usize>().unwrap_or(out.len() + 1)
        } else {
            out.len() + 1
        };
        let idx = pos.saturating_sub(1).min(out.len());
        out.insert(idx, value);
        Ok(Some(out))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_value_passes_through_plain_text() {
        let mut count = 1;
        assert_eq!(literal_value("hello", &mut count), "hello");
    }

    #[test]
    fn count_token_increments_per_call() {
        let mut count = 1;
        assert_eq!(literal_value("@COUNT", &mut count), "1");
        assert_eq!(literal_value("@COUNT", &mut count), "2");
        assert_eq!(literal_value("@COUNT", &mut count), "3");
    }

    #[test]
    fn date_token_produces_iso_date() {
        let mut count = 1;
        let s = literal_value("@DATE", &mut count);
        assert_eq!(s.len(), 10);
        assert_eq!(s.matches('-').count(), 2);
    }

    #[test]
    fn datetime_token_includes_time_component() {
        let mut count = 1;
        let s = literal_value("@DATETIME", &mut count);
        assert!(s.contains(':'));
    }
}
