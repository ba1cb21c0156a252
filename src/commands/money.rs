//! `money`: reformat a numeric field as a money amount. `-f` the field(s)
//! to reformat (required); `-dp` decimal places (default 2); `-dc`
//! decimal-point character (default `.`); `-ts` thousands separator
//! (default none); `-cs` currency symbol prefix; `-ms` minus-sign style:
//! `-` (default, leading hyphen), `()` (parenthesize), or `t` (trailing
//! hyphen); `-cn` treats the input as whole cents; `-w` right-aligns the
//! result to a width; `-r` replaces the field in place rather than
//! appending a new one. Non-numeric fields pass through unchanged.
//! Grounded on `csved_money.cpp`.

use crate::commands::support::standard_loop;
use crate::error::{CsvFixError, CsvFixResult};
use crate::fields::parse_field_list;
use crate::flags::FlagSpec;

pub const HELP: &str = "money - format a numeric field as money (-f, -dp, -dc, -ts, -cs, -ms, -cn, -w, -r)";

#[derive(Clone, Copy, PartialEq)]
enum MinusStyle {
    Leading,
    Paren,
    Trailing,
}

fn parse_minus_style(s: &str) -> CsvFixResult<MinusStyle> {
    match s {
        "-" => Ok(MinusStyle::Leading),
        "()" => Ok(MinusStyle::Paren),
        "t" => Ok(MinusStyle::Trailing),
        other => Err(CsvFixError::dispatch(format!("money: invalid -ms value '{}'", other))),
    }
}

fn group_thousands(int_part: &str, sep: char) -> String {
    let digits: Vec<char> = int_part.chars().collect();
    let mut out = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(*c);
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn format_money(
    raw: &str,
    dp: usize,
    dc: char,
    ts: Option<char>,
    cs: &str,
    ms: MinusStyle,
    cn: bool,
    width: usize,
) -> String {
    let trimmed = raw.trim();
    let value: f64 = match trimmed.parse() {
        Ok(v) => v,
        Err(_) => return raw.to_string(),
    };
    let value = if cn { value / 100.0 } else { value };
    let negative = value < 0.0;
    let abs = value.abs();

    let fixed = format!("{:.*}", dp, abs);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (fixed, String::new()),
    };
    let int_part = match ts {
        Some(sep) => group_thousands(&int_part, sep),
        None => int_part,
    };

    let mut body = cs.to_string();
    body.push_str(&int_part);
    if dp > 0 {
        body.push(dc);
        body.push_str(&frac_part);
    }

    let signed = if negative {
        match ms {
            MinusStyle::Paren => format!("({})", body),
            MinusStyle::Trailing => format!("{}-", body),
            MinusStyle::Leading => format!("-{}", body),
        }
    } else {
        body
    };

    if signed.chars().count() < width {
        format!("{:>width$}", signed, width = width)
    } else {
        signed
    }
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::req("-f"),
        FlagSpec::opt("-dp"),
        FlagSpec::opt("-dc"),
        FlagSpec::opt("-ts"),
        FlagSpec::opt("-cs"),
        FlagSpec::opt("-ms"),
        FlagSpec::switch("-cn"),
        FlagSpec::opt("-w"),
        FlagSpec::switch("-r"),
    ];
    standard_loop(argv, &specs, |cmd, row| {
        let fields = parse_field_list(&cmd.get_value("-f"))?;
        let dp: usize = cmd
            .get_value_or("-dp", "2")
            .parse()
            .map_err(|_| CsvFixError::dispatch("Invalid -dp value"))?;
        let dc = cmd.get_value_or("-dc", ".").chars().next().unwrap_or('.');
        let ts = if cmd.has_flag("-ts") { cmd.get_value("-ts").chars().next() } else { None };
        let cs = cmd.get_value("-cs");
        let ms = parse_minus_style(&cmd.get_value_or("-ms", "-"))?;
        let cn = cmd.has_flag("-cn");
        let width: usize = cmd.get_value_or("-w", "0").parse().unwrap_or(0);
        let replace = cmd.has_flag("-r");

        let mut out = row.clone();
        for &i in &fields {
            if let Some(v) = row.get(i) {
                let formatted = format_money(v, dp, dc, ts, &cs, ms, cn, width);
                if replace {
                    if let Some(slot) = out.get_mut(i) {
                        *slot = formatted;
                    }
                } else {
                    out.push(formatted);
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
    fn formats_with_thousands_and_decimals() {
        let s = format_money("1234.5", 2, '.', Some(','), "$", MinusStyle::Leading, false, 0);
        assert_eq!(s, "$1,234.50");
    }

    #[test]
    fn negative_uses_parens_when_requested() {
        let s = format_money("-42", 2, '.', None, "", MinusStyle::Paren, false, 0);
        assert_eq!(s, "(42.00)");
    }

    #[test]
    fn negative_trailing_style() {
        let s = format_money("-42", 0, '.', None, "", MinusStyle::Trailing, false, 0);
        assert_eq!(s, "42-");
    }

    #[test]
    fn cents_input_divides_by_hundred() {
        let s = format_money("12345", 2, '.', None, "", MinusStyle::Leading, true, 0);
        assert_eq!(s, "123.45");
    }

    #[test]
    fn custom_decimal_point_character() {
        let s = format_money("12.5", 1, ',', None, "", MinusStyle::Leading, false, 0);
        assert_eq!(s, "12,5");
    }

    #[test]
    fn non_numeric_passes_through() {
        assert_eq!(format_money("n/a", 2, '.', None, "", MinusStyle::Leading, false, 0), "n/a");
    }
}
