//! CSV line parser: split one already-assembled logical line into fields.
//!
//! The line may contain embedded newlines if it came from a quoted field
//! that spanned multiple physical lines; this module only scans for the
//! separator and quote characters, it never reads further input itself.

use crate::error::{CsvFixError, CsvFixResult};

pub type Record = Vec<String>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    OutVal,
    InVal,
    InQVal,
    HaveQ,
}

/// Check that `sep` is a legal field separator: a single ASCII byte, not
/// alphanumeric, not whitespace, and not the quote character. `RawLineAssembler`
/// narrows the separator to a `u8`, so anything outside ASCII would be
/// silently truncated to a meaningless byte rather than matched.
pub fn validate_separator(sep: char) -> CsvFixResult<()> {
    if !sep.is_ascii() || sep.is_alphanumeric() || sep.is_whitespace() || sep == '"' {
        return Err(CsvFixError::logic(format!("Invalid separator '{}'", sep)));
    }
    Ok(())
}

/// Parse one logical line into a `Record`. The line must not include its
/// terminating newline. `\r` bytes, if present, are the caller's concern
/// (the stream parser strips them before assembling the line).
///
/// An unterminated quoted field (end-of-line reached while still `InQVal`)
/// is a structural error. The stream parser is careful never to call
/// this with a line that ends mid-quote; only the checker routes that
/// condition here for diagnosis.
pub fn parse_line(line: &str, sep: char) -> CsvFixResult<Record> {
    parse_line_mode(line, sep, false)
}

/// Strict variant used by the checker: a stray character after a
/// closing quote is reported rather than silently folded back into the
/// field as a literal character.
pub fn parse_line_strict(line: &str, sep: char) -> CsvFixResult<Record> {
    parse_line_mode(line, sep, true)
}

fn parse_line_mode(line: &str, sep: char, strict: bool) -> CsvFixResult<Record> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = State::OutVal;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match state {
            State::OutVal => {
                if c == '"' {
                    state = State::InQVal;
                    field.clear();
                } else if c == sep {
                    fields.push(field.clone());
                    field.clear();
                } else {
                    field.push(c);
                    state = State::InVal;
                }
            }
            State::InVal => {
                if c == sep {
                    fields.push(std::mem::take(&mut field));
                    state = State::OutVal;
                } else {
                    field.push(c);
                }
            }
            State::InQVal => {
                if c == '"' {
                    state = State::HaveQ;
                } else {
                    field.push(c);
                }
            }
            State::HaveQ => {
                if c == '"' {
                    field.push('"');
                    state = State::InQVal;
                } else if c == sep {
                    fields.push(std::mem::take(&mut field));
                    state = State::OutVal;
                } else if strict {
                    return Err(CsvFixError::logic(format!(
                        "Unexpected character '{}' after closing quote",
                        c
                    )));
                } else {
                    // Lenient mode: fold the stray character back in and
                    // resume as an unquoted continuation of the field.
                    field.push(c);
                    state = State::InVal;
                }
            }
        }
        i += 1;
    }

    if state == State::InQVal {
        return Err(CsvFixError::logic("Unterminated quoted field"));
    }

    // Whatever we were accumulating (including the case of a field that was
    // never separator-terminated) becomes the final field. A trailing
    // separator leaves `field` empty, which is exactly the trailing-empty-
    // field invariant from the data model.
    fields.push(field);

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_separator_yields_empty_last_field() {
        let r = parse_line("1,2,", ',').unwrap();
        assert_eq!(r, vec!["1", "2", ""]);
    }

    #[test]
    fn quoted_fields_round_trip() {
        let r = parse_line("\"1\",\"2\",", ',').unwrap();
        assert_eq!(r, vec!["1", "2", ""]);
    }

    #[test]
    fn no_separator_yields_one_field() {
        let r = parse_line("justone", ',').unwrap();
        assert_eq!(r, vec!["justone"]);
    }

    #[test]
    fn doubled_quote_is_literal_quote() {
        let r = parse_line("\"e\"\"f\"", ',').unwrap();
        assert_eq!(r, vec!["e\"f"]);
    }

    #[test]
    fn unterminated_quote_is_error() {
        assert!(parse_line("\"abc", ',').is_err());
    }
}
