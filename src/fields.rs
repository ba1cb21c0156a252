//! Field-list parsing: comma-separated 1-based indexes and inclusive
//! ranges `a:b` (ascending or descending), producing zero-based indexes.

use crate::error::{CsvFixError, CsvFixResult};

pub type FieldList = Vec<usize>;

fn is_integer(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && (s.starts_with('-') && s.len() > 1 || s.chars().next().unwrap().is_ascii_digit())
        && s.trim_start_matches('-').chars().all(|c| c.is_ascii_digit())
}

fn to_integer(s: &str) -> CsvFixResult<i64> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| CsvFixError::logic(format!("Need integer, not '{}'", s)))
}

/// Parse a user field-list spec (empty string means "no explicit list",
/// distinct from a caller treating that as "all fields").
pub fn parse_field_list(spec: &str) -> CsvFixResult<FieldList> {
    let mut out = Vec::new();
    if spec.trim().is_empty() {
        return Ok(out);
    }
    for tok in spec.split(',') {
        let tok = tok.trim();
        if tok.is_empty() {
            continue;
        }
        let parts: Vec<&str> = tok.split(':').collect();
        match parts.len() {
            1 => {
                if !is_integer(parts[0]) {
                    return Err(CsvFixError::logic(format!(
                        "Need integer, not '{}'",
                        parts[0]
                    )));
                }
                let n = to_integer(parts[0])?;
                if n < 1 {
                    return Err(CsvFixError::logic(format!(
                        "Index must be greater than zero, not '{}'",
                        parts[0]
                    )));
                }
                out.push((n - 1) as usize);
            }
            2 => {
                if !is_integer(parts[0]) || !is_integer(parts[1]) {
                    return Err(CsvFixError::logic(format!("Invalid range: {}", tok)));
                }
                let n1 = to_integer(parts[0])?;
                let n2 = to_integer(parts[1])?;
                if n1 < 1 || n2 < 1 {
                    return Err(CsvFixError::logic(format!("Invalid range: {}", tok)));
                }
                if n1 <= n2 {
                    let mut n = n1;
                    while n <= n2 {
                        out.push((n - 1) as usize);
                        n += 1;
                    }
                } else {
                    let mut n = n1;
                    while n >= n2 {
                        out.push((n - 1) as usize);
                        n -= 1;
                    }
                }
            }
            _ => return Err(CsvFixError::logic(format!("Invalid field: {}", tok))),
        }
    }
    Ok(out)
}

pub fn get_field(row: &[String], i: usize) -> String {
    row.get(i).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_indexes_are_one_based_in_zero_based_out() {
        assert_eq!(parse_field_list("1,3").unwrap(), vec![0, 2]);
    }

    #[test]
    fn ascending_range() {
        assert_eq!(parse_field_list("2:4").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn descending_range() {
        assert_eq!(parse_field_list("4:2").unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn rejects_zero_index() {
        assert!(parse_field_list("0").is_err());
    }

    #[test]
    fn empty_spec_is_empty_list() {
        assert_eq!(parse_field_list("").unwrap(), Vec::<usize>::new());
    }
}
