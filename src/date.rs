//! Date reader/formatter: masked parse (`d/m/y` etc.) and a
//! strftime-like reformatter, both built on `chrono::NaiveDate` for the
//! Gregorian validity arithmetic (leap years, days-per-month).
//!
//! Resolved from `alib/src/a_date.cpp` and `csvfix/src/csved_date.cpp`:
//! the two-digit year wrap base defaults to 1930, and month names fold
//! ASCII case only.

use crate::error::{CsvFixError, CsvFixResult};
use chrono::{Datelike, NaiveDate, Weekday};

pub const DEFAULT_MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub const DEFAULT_BASE_YEAR: i32 = 1930;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Part {
    Day,
    Month,
    Year,
}

/// A compiled date mask: five characters `D s D s D`, each `D` one of
/// `d`, `m`, `y` appearing exactly once, `s` a single non-alphanumeric
/// separator (the two separators may differ).
pub struct Mask {
    order: [Part; 3],
    sep: [char; 2],
}

impl Mask {
    pub fn parse(mask: &str) -> CsvFixResult<Mask> {
        let chars: Vec<char> = mask.chars().collect();
        if chars.len() != 5 {
            return Err(CsvFixError::logic(format!("Invalid date mask: {}", mask)));
        }
        let part = |c: char| -> CsvFixResult<Part> {
            match c {
                'd' => Ok(Part::Day),
                'm' => Ok(Part::Month),
                'y' => Ok(Part::Year),
                _ => Err(CsvFixError::logic(format!("Invalid character in date mask: {}", c))),
            }
        };
        let order = [part(chars[0])?, part(chars[2])?, part(chars[4])?];
        let sep = [chars[1], chars[3]];
        if sep[0].is_alphanumeric() || sep[1].is_alphanumeric() {
            return Err(CsvFixError::logic(format!("Invalid separator in date mask: {}", mask)));
        }
        let mut seen = [false; 3];
        for p in &order {
            let i = match p {
                Part::Day => 0,
                Part::Month => 1,
                Part::Year => 2,
            };
            if seen[i] {
                return Err(CsvFixError::logic(format!("Invalid date mask: {}", mask)));
            }
            seen[i] = true;
        }
        Ok(Mask { order, sep })
    }
}

/// Parse `text` against `mask`, using `month_names` (12 entries) for
/// case-insensitive unambiguous-prefix month matching and `base_year` for
/// two-digit year wrap.
pub fn parse(
    text: &str,
    mask: &Mask,
    base_year: i32,
    month_names: &[&str; 12],
) -> CsvFixResult<NaiveDate> {
    let s1 = text.find(mask.sep[0]);
    let s2 = text.rfind(mask.sep[1]);
    let (s1, s2) = match (s1, s2) {
        (Some(a), Some(b)) if a < b => (a, b),
        _ => return Err(CsvFixError::DateOrNumberParse(format!("Invalid date: {}", text))),
    };

    let toks = [&text[..s1], &text[s1 + mask.sep[0].len_utf8()..s2], &text[s2 + mask.sep[1].len_utf8()..]];

    let mut day: Option<u32> = None;
    let mut month: Option<u32> = None;
    let mut year: Option<i32> = None;

    for (tok, part) in toks.iter().zip(mask.order.iter()) {
        match part {
            Part::Day => day = parse_int(tok),
            Part::Month => month = parse_month(tok, month_names),
            Part::Year => year = parse_year(tok, base_year),
        }
    }

    let (y, m, d) = match (year, month, day) {
        (Some(y), Some(m), Some(d)) => (y, m, d),
        _ => return Err(CsvFixError::DateOrNumberParse(format!("Invalid date: {}", text))),
    };

    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| CsvFixError::DateOrNumberParse(format!("Invalid date: {}", text)))
}

fn parse_int(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

fn parse_month(s: &str, month_names: &[&str; 12]) -> Option<u32> {
    if let Some(n) = parse_int(s) {
        return Some(n);
    }
    if s.len() < 3 {
        return None;
    }
    for (i, name) in month_names.iter().enumerate() {
        if name.len() >= s.len() && name[..s.len()].eq_ignore_ascii_case(s) {
            return Some((i + 1) as u32);
        }
    }
    None
}

fn parse_year(s: &str, base_year: i32) -> Option<i32> {
    let n: i32 = s.trim().parse().ok()?;
    match s.trim().len() {
        2 => {
            if n < (base_year - 1900) {
                Some(2000 + n)
            } else {
                Some(1900 + n)
            }
        }
        4 => Some(n),
        _ => None,
    }
}

/// Parse an ISO `yyyy-mm-dd` date, the wire format used between
/// `date_iso` and `date_format`.
pub fn parse_iso(s: &str) -> CsvFixResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CsvFixError::DateOrNumberParse(format!("Invalid date: {}", s)))
}

pub fn format_iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

const FMT_CHARS: &str = "dmyMwW";

fn is_fmt_char(c: char) -> bool {
    FMT_CHARS.contains(c)
}

/// Reformat `date` according to a template string built from literal
/// spans and runs of identical directive characters (`d`, `dd`, `m`,
/// `mm`, `mmm`, `M`, `y`, `yyyy`, `w`, `W`); unknown directive runs are
/// errors.
pub fn format(date: NaiveDate, fmt: &str, month_names: &[&str; 12]) -> CsvFixResult<String> {
    let mut out = String::new();
    let chars: Vec<char> = fmt.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_fmt_char(c) {
            let mut j = i + 1;
            while j < chars.len() && chars[j] == c {
                j += 1;
            }
            let run: String = chars[i..j].iter().collect();
            out.push_str(&format_directive(&run, date, month_names)?);
            i = j;
        } else {
            out.push(c);
            i += 1;
        }
    }
    Ok(out)
}

fn format_directive(run: &str, date: NaiveDate, month_names: &[&str; 12]) -> CsvFixResult<String> {
    Ok(match run {
        "d" => date.day().to_string(),
        "dd" => format!("{:02}", date.day()),
        "m" => date.month().to_string(),
        "mm" => format!("{:02}", date.month()),
        "mmm" => month_names[(date.month() - 1) as usize][..3].to_string(),
        "M" => month_names[(date.month() - 1) as usize].to_string(),
        "y" | "yyyy" => date.year().to_string(),
        "w" => short_day_name(date.weekday()),
        "W" => day_name(date.weekday()),
        other => {
            return Err(CsvFixError::logic(format!(
                "Invalid date format substring: {}",
                other
            )))
        }
    })
}

fn day_name(w: Weekday) -> String {
    match w {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
    .to_string()
}

fn short_day_name(w: Weekday) -> String {
    day_name(w)[..3].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dmy_mask() {
        let mask = Mask::parse("d/m/y").unwrap();
        let d = parse("19/8/1953", &mask, DEFAULT_BASE_YEAR, &DEFAULT_MONTH_NAMES).unwrap();
        assert_eq!(format_iso(d), "1953-08-19");
    }

    #[test]
    fn matches_month_name_prefix() {
        let mask = Mask::parse("d/m/y").unwrap();
        let d = parse("19/Aug/1953", &mask, DEFAULT_BASE_YEAR, &DEFAULT_MONTH_NAMES).unwrap();
        assert_eq!(d.month(), 8);
    }

    #[test]
    fn two_digit_year_wraps_around_base() {
        let mask = Mask::parse("d/m/y").unwrap();
        let d = parse("1/1/25", &mask, DEFAULT_BASE_YEAR, &DEFAULT_MONTH_NAMES).unwrap();
        assert_eq!(d.year(), 2025);
        let d2 = parse("1/1/45", &mask, DEFAULT_BASE_YEAR, &DEFAULT_MONTH_NAMES).unwrap();
        assert_eq!(d2.year(), 1945);
    }

    #[test]
    fn rejects_invalid_date() {
        let mask = Mask::parse("d/m/y").unwrap();
        assert!(parse("31/2/2000", &mask, DEFAULT_BASE_YEAR, &DEFAULT_MONTH_NAMES).is_err());
    }

    #[test]
    fn format_round_trips_through_iso() {
        let d = parse_iso("1953-08-19").unwrap();
        let s = format(d, "dd/mm/yyyy", &DEFAULT_MONTH_NAMES).unwrap();
        assert_eq!(s, "19/08/1953");
    }

    #[test]
    fn format_short_month_and_day_names() {
        let d = parse_iso("2024-03-04").unwrap(); // a Monday
        assert_eq!(format(d, "mmm", &DEFAULT_MONTH_NAMES).unwrap(), "Mar");
        assert_eq!(format(d, "w", &DEFAULT_MONTH_NAMES).unwrap(), "Mon");
        assert_eq!(format(d, "W", &DEFAULT_MONTH_NAMES).unwrap(), "Monday");
    }

    #[test]
    fn unknown_directive_errors() {
        let d = parse_iso("2024-03-04").unwrap();
        assert!(format(d, "zz", &DEFAULT_MONTH_NAMES).is_err());
    }
}
