//! `printf`: replace each record with text built from a C-`printf`-style
//! format string (`-fmt`, required). Conversions `d`, `i`, `o`, `x`, `X`,
//! `u`, `c`, `s`, `f`, `e`, `E`, `g`, `G` each consume the next field in
//! record order (not by index); `%@` consumes and discards the next
//! field without emitting anything; `%%` is a literal `%`. With `-q`,
//! every conversion's rendered output is wrapped in doubled-quote CSV
//! escaping so the text round-trips as a quoted CSV value. Grounded on
//! `csved_printf.cpp`.

use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{CommandLine, FlagSpec, Predicates};
use crate::ioman::IOManager;

pub const HELP: &str = "printf - format each record as text (-fmt, -q)";

fn render_conversion(conv: char, value: &str) -> CsvFixResult<String> {
    let bad_num = || CsvFixError::logic(format!("printf: '{}' is not a valid number for %{}", value, conv));
    match conv {
        's' => Ok(value.to_string()),
        'c' => Ok(value.chars().next().map(|c| c.to_string()).unwrap_or_default()),
        'd' | 'i' => {
            let n: i64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok(n.to_string())
        }
        'u' => {
            let n: i64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok((n.unsigned_abs()).to_string())
        }
        'o' => {
            let n: i64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok(format!("{:o}", n))
        }
        'x' => {
            let n: i64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok(format!("{:x}", n))
        }
        'X' => {
            let n: i64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok(format!("{:X}", n))
        }
        'f' => {
            let n: f64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok(format!("{:.6}", n))
        }
        'e' => {
            let n: f64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok(format!("{:e}", n))
        }
        'E' => {
            let n: f64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok(format!("{:E}", n))
        }
        'g' | 'G' => {
            let n: f64 = value.trim().parse().map_err(|_| bad_num())?;
            Ok(format!("{}", n))
        }
        other => Err(CsvFixError::dispatch(format!("printf: unknown conversion '%{}'", other))),
    }
}

fn expand(fmt: &str, row: &[String], quote: bool) -> CsvFixResult<String> {
    const CONVERSIONS: &str = "dioxXucsfeEgG";
    let mut out = String::new();
    let chars: Vec<char> = fmt.chars().collect();
    let mut i = 0;
    let mut field = 0usize;
    while i < chars.len() {
        if chars[i] == '%' && i + 1 < chars.len() {
            let c2 = chars[i + 1];
            if c2 == '%' {
                out.push('%');
                i += 2;
            } else if c2 == '@' {
                field += 1;
                i += 2;
            } else if CONVERSIONS.contains(c2) {
                let value = row.get(field).cloned().unwrap_or_default();
                field += 1;
                let rendered = render_conversion(c2, &value)?;
                if quote {
                    out.push('"');
                    out.push_str(&rendered.replace('"', "\"\""));
                    out.push('"');
                } else {
                    out.push_str(&rendered);
                }
                i += 2;
            } else {
                return Err(CsvFixError::dispatch(format!("printf: unknown conversion '%{}'", c2)));
            }
        } else if chars[i] == '\\' && i + 1 < chars.len() {
            match chars[i + 1] {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                c => out.push(c),
            }
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::req("-fmt"), FlagSpec::switch("-q")];
    let cmd = CommandLine::parse(argv, &specs)?;
    let preds = Predicates::compile(&cmd)?;
    let fmt = cmd.get_value("-fmt");
    let quote = cmd.has_flag("-q");

    let mut io = IOManager::new(&cmd)?;
    let mut row = Vec::new();
    while io.read_csv(&mut row)? {
        if preds.should_skip(&row)? {
            continue;
        }
        if preds.should_pass(&row)? {
            io.write_row(&row)?;
            continue;
        }
        let text = expand(&fmt, &row, quote)?;
        io.write_text(&text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_conversions_in_field_order() {
        let row = vec!["a".to_string(), "3".to_string()];
        assert_eq!(expand("%s-%d", &row, false).unwrap(), "a-3");
    }

    #[test]
    fn at_directive_skips_a_field() {
        let row = vec!["skip".to_string(), "b".to_string()];
        assert_eq!(expand("%@%s", &row, false).unwrap(), "b");
    }

    #[test]
    fn quotes_values_when_requested() {
        let row = vec!["a,b".to_string()];
        assert_eq!(expand("%s", &row, true).unwrap(), "\"a,b\"");
    }

    #[test]
    fn hex_conversion() {
        let row = vec!["255".to_string()];
        assert_eq!(expand("%x", &row, false).unwrap(), "ff");
    }
}
