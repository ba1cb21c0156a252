//! Validation rule engine: a small rule factory modeled on the
//! original `RuleFactory`/`ValidationRule` pair (`csved_rules.cpp`), plus a
//! rule-file parser for the `validate` command.
//!
//! There is no surviving original source for `validate`'s rule-file
//! syntax; the one-directive-per-line form below (`FIELDLIST RULENAME
//! PARAMS...`) is this crate's own design, chosen to put the field list
//! first the same way every other command's flags do. `lookup`'s leading
//! FIELDLIST is kept for directive uniformity but unused: its two params
//! are `JOINSPEC` (`a1:b1,a2:b2,...`, record fields to lookup-file
//! fields) and `FILE`, the lookup source loaded once into memory at
//! rule-creation time.

use crate::csv::line::parse_line;
use crate::error::{CsvFixError, CsvFixResult};
use crate::fields::{parse_field_list, FieldList};
use std::collections::HashSet;
use std::fs;

/// Join two composite-key field lists together into one delimiter that
/// cannot occur in either side (it isn't a legal CSV field separator).
const KEY_SEP: char = '\u{1}';

/// A parsed `lookup` join spec: `a1:b1,a2:b2,...` becomes parallel index
/// lists, the record-side indexes and the lookup-file-side indexes.
fn parse_join_spec(spec: &str) -> CsvFixResult<(FieldList, FieldList)> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for pair in spec.split(',') {
        let (a, b) = pair
            .split_once(':')
            .ok_or_else(|| CsvFixError::config(format!("Invalid lookup join spec: {}", pair)))?;
        left.extend(parse_field_list(a.trim())?);
        right.extend(parse_field_list(b.trim())?);
    }
    if left.len() != right.len() || left.is_empty() {
        return Err(CsvFixError::config(format!("Invalid lookup join spec: {}", spec)));
    }
    Ok((left, right))
}

fn composite_key(row: &[String], fields: &FieldList) -> String {
    fields
        .iter()
        .map(|&i| row.get(i).map(String::as_str).unwrap_or(""))
        .collect::<Vec<&str>>()
        .join(&KEY_SEP.to_string())
}

/// Load the lookup file once and build the set of keys from its `right`
/// fields, per "loaded once, lazily, into memory".
fn load_lookup_keys(path: &str, right: &FieldList) -> CsvFixResult<HashSet<String>> {
    let text = fs::read_to_string(path)
        .map_err(|e| CsvFixError::Io(format!("Cannot read lookup file {}: {}", path, e)))?;
    let mut keys = HashSet::new();
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let row = parse_line(line, ',')?;
        keys.insert(composite_key(&row, right));
    }
    Ok(keys)
}

/// One violation of a rule against a single field.
pub struct Violation {
    pub field: usize,
    pub rule: String,
    pub message: String,
}

enum Kind {
    Required,
    NotEmpty,
    Values(Vec<String>),
    NotValues(Vec<String>),
    Numeric(Vec<(f64, f64)>),
    Length { min: usize, max: usize },
    Fields { min: usize, max: usize },
    Lookup { left: FieldList, keys: HashSet<String> },
    Date(String, Option<(chrono::NaiveDate, chrono::NaiveDate)>),
}

pub struct Rule {
    name: String,
    fields: FieldList,
    kind: Kind,
}

impl Rule {
    /// Construct a rule from its directive name and parameter tokens,
    /// mirroring `RuleFactory::CreateRule`'s name-to-constructor dispatch.
    fn create(name: &str, fields: FieldList, params: &[String]) -> CsvFixResult<Rule> {
        let kind = match name {
            "required" => Kind::Required,
            "notempty" => Kind::NotEmpty,
            "values" => Kind::Values(params.to_vec()),
            "notvalues" => Kind::NotValues(params.to_vec()),
            "numeric" => {
                let ranges = params
                    .iter()
                    .map(|p| {
                        let (a, b) = p
                            .split_once(':')
                            .ok_or_else(|| CsvFixError::config(format!("Invalid numeric range: {}", p)))?;
                        let lo: f64 = a.parse().map_err(|_| CsvFixError::config(format!("Invalid numeric range: {}", p)))?;
                        let hi: f64 = b.parse().map_err(|_| CsvFixError::config(format!("Invalid numeric range: {}", p)))?;
                        if lo > hi {
                            return Err(CsvFixError::config(format!("Invalid numeric range: {}", p)));
                        }
                        Ok((lo, hi))
                    })
                    .collect::<CsvFixResult<Vec<_>>>()?;
                Kind::Numeric(ranges)
            }
            "length" => {
                let (min, max) = parse_min_max(params)?;
                Kind::Length { min, max }
            }
            "fields" => {
                let (min, max) = parse_min_max(params)?;
                Kind::Fields { min, max }
            }
            "lookup" => {
                let joinspec = params
                    .first()
                    .ok_or_else(|| CsvFixError::config("lookup rule needs a JOINSPEC parameter"))?;
                let path = params
                    .get(1)
                    .ok_or_else(|| CsvFixError::config("lookup rule needs a FILE parameter"))?;
                let (left, right) = parse_join_spec(joinspec)?;
                let keys = load_lookup_keys(path, &right)?;
                Kind::Lookup { left, keys }
            }
            "date" => {
                let mask = params.first().cloned().unwrap_or_else(|| "d/m/y".to_string());
                let range = match params.get(1) {
                    Some(spec) => {
                        let (lo, hi) = spec
                            .split_once(':')
                            .ok_or_else(|| CsvFixError::config(format!("Invalid date RANGE: {}", spec)))?;
                        let lo = crate::date::parse_iso(lo)
                            .map_err(|_| CsvFixError::config(format!("Invalid date RANGE: {}", spec)))?;
                        let hi = crate::date::parse_iso(hi)
                            .map_err(|_| CsvFixError::config(format!("Invalid date RANGE: {}", spec)))?;
                        Some((lo, hi))
                    }
                    None => None,
                };
                Kind::Date(mask, range)
            }
            other => return Err(CsvFixError::config(format!("Unknown validation rule: {}", other))),
        };
        Ok(Rule { name: name.to_string(), fields, kind })
    }

    /// Apply this rule to one record, yielding a violation per offending
    /// field, following `ValidationRule::Apply`'s per-field loop.
    fn apply(&self, row: &[String]) -> Vec<Violation> {
        if let Kind::Fields { min, max } = &self.kind {
            let n = row.len();
            if n < *min {
                return vec![Violation { field: 0, rule: self.name.clone(), message: "Not enough fields".to_string() }];
            }
            if n > *max {
                return vec![Violation { field: 0, rule: self.name.clone(), message: "Too many fields".to_string() }];
            }
            return Vec::new();
        }

        if let Kind::Lookup { left, keys } = &self.kind {
            let key = composite_key(row, left);
            if keys.contains(&key) {
                return Vec::new();
            }
            return vec![Violation {
                field: *left.first().unwrap_or(&0),
                rule: self.name.clone(),
                message: format!("Key '{}' not found in lookup file", key.replace(KEY_SEP, ":")),
            }];
        }

        let mut out = Vec::new();
        for &idx in &self.fields {
            let value = row.get(idx).map(String::as_str).unwrap_or("");
            if let Err(message) = self.validate_one(value) {
                out.push(Violation { field: idx, rule: self.name.clone(), message });
            }
        }
        out
    }

    fn validate_one(&self, value: &str) -> Result<(), String> {
        match &self.kind {
            Kind::Required | Kind::NotEmpty => {
                if value.trim().is_empty() {
                    Err("Value is required".to_string())
                } else {
                    Ok(())
                }
            }
            Kind::Values(allowed) => {
                if allowed.iter().any(|v| v == value) {
                    Ok(())
                } else {
                    Err(format!("Value '{}' not in allowed list", value))
                }
            }
            Kind::NotValues(forbidden) => {
                if forbidden.iter().any(|v| v == value) {
                    Err(format!("Value '{}' is forbidden", value))
                } else {
                    Ok(())
                }
            }
            Kind::Numeric(ranges) => {
                let n: f64 = value.trim().parse().map_err(|_| format!("Value '{}' is not numeric", value))?;
                if ranges.is_empty() || ranges.iter().any(|&(lo, hi)| n >= lo && n <= hi) {
                    Ok(())
                } else {
                    Err(format!("Value '{}' is outside the allowed numeric ranges", value))
                }
            }
            Kind::Length { min, max } => {
                let len = value.chars().count();
                if len >= *min && len <= *max {
                    Ok(())
                } else {
                    Err(format!("Value '{}' has length {}, expected {}..{}", value, len, min, max))
                }
            }
            Kind::Fields { .. } => unreachable!("handled in apply"),
            Kind::Lookup { .. } => unreachable!("handled in apply"),
            Kind::Date(mask, range) => {
                let m = crate::date::Mask::parse(mask).map_err(|e| e.to_string())?;
                let parsed =
                    crate::date::parse(value, &m, crate::date::DEFAULT_BASE_YEAR, &crate::date::DEFAULT_MONTH_NAMES)
                        .map_err(|_| format!("Value '{}' is not a valid date", value))?;
                if let Some((lo, hi)) = range {
                    if parsed < *lo || parsed > *hi {
                        return Err(format!("Value '{}' is outside the allowed date range", value));
                    }
                }
                Ok(())
            }
        }
    }
}

fn parse_min_max(params: &[String]) -> CsvFixResult<(usize, usize)> {
    let spec = params
        .first()
        .ok_or_else(|| CsvFixError::config("Rule needs a min:max parameter"))?;
    let (a, b) = spec
        .split_once(':')
        .ok_or_else(|| CsvFixError::config(format!("Invalid min:max spec: {}", spec)))?;
    let min: usize = a.parse().map_err(|_| CsvFixError::config(format!("Invalid min:max spec: {}", spec)))?;
    let max: usize = b.parse().map_err(|_| CsvFixError::config(format!("Invalid min:max spec: {}", spec)))?;
    Ok((min, max))
}

/// A parsed rule file: an ordered list of rules applied to every record.
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Parse a rule file, one directive per non-blank, non-`#`-comment
    /// line: `FIELDLIST RULENAME [PARAMS...]`. `PARAMS` containing a `,`
    /// or `:` used as its own delimiter is passed through as one token
    /// (e.g. a `values` rule's comma list, or a `length`/`fields` rule's
    /// `min:max` pair).
    pub fn parse(text: &str) -> CsvFixResult<RuleSet> {
        let mut rules = Vec::new();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut toks = line.split_whitespace();
            let field_spec = toks.next().ok_or_else(|| {
                CsvFixError::config(format!("Rule file line {}: missing field list", lineno + 1))
            })?;
            let rule_name = toks.next().ok_or_else(|| {
                CsvFixError::config(format!("Rule file line {}: missing rule name", lineno + 1))
            })?;
            let params: Vec<String> = toks.map(|s| s.to_string()).collect();
            let fields = parse_field_list(field_spec)?;
            rules.push(Rule::create(rule_name, fields, &params)?);
        }
        Ok(RuleSet { rules })
    }

    /// Apply every rule to one record, returning all violations found.
    pub fn validate(&self, row: &[String]) -> Vec<Violation> {
        let mut out = Vec::new();
        for rule in &self.rules {
            out.extend(rule.apply(row));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rule_flags_blank_fields() {
        let rs = RuleSet::parse("1 required\n").unwrap();
        assert!(rs.validate(&["".to_string()]).len() == 1);
        assert!(rs.validate(&["x".to_string()]).is_empty());
    }

    #[test]
    fn values_rule_checks_membership() {
        let rs = RuleSet::parse("1 values red,green,blue\n").unwrap();
        assert!(rs.validate(&["red".to_string()]).is_empty());
        assert!(!rs.validate(&["purple".to_string()]).is_empty());
    }

    #[test]
    fn numeric_rule() {
        let rs = RuleSet::parse("2 numeric\n").unwrap();
        assert!(rs.validate(&["a".to_string(), "3.14".to_string()]).is_empty());
        assert!(!rs.validate(&["a".to_string(), "xyz".to_string()]).is_empty());
    }

    #[test]
    fn numeric_rule_with_disjoint_ranges() {
        let rs = RuleSet::parse("1 numeric 1:5 10:20\n").unwrap();
        assert!(rs.validate(&["3".to_string()]).is_empty());
        assert!(rs.validate(&["15".to_string()]).is_empty());
        assert!(!rs.validate(&["7".to_string()]).is_empty());
    }

    #[test]
    fn fields_rule_checks_record_width() {
        let rs = RuleSet::parse("1:3 fields 3:3\n").unwrap();
        assert!(rs.validate(&["a".to_string(), "b".to_string(), "c".to_string()]).is_empty());

        let too_few = rs.validate(&["a".to_string(), "b".to_string()]);
        assert_eq!(too_few.len(), 1);
        assert_eq!(too_few[0].message, "Not enough fields");

        let too_many =
            rs.validate(&["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()]);
        assert_eq!(too_many.len(), 1);
        assert_eq!(too_many[0].message, "Too many fields");
    }

    #[test]
    fn date_rule_uses_mask() {
        let rs = RuleSet::parse("1 date d/m/y\n").unwrap();
        assert!(rs.validate(&["19/8/1953".to_string()]).is_empty());
        assert!(!rs.validate(&["31/2/2000".to_string()]).is_empty());
    }

    #[test]
    fn date_rule_enforces_range() {
        let rs = RuleSet::parse("1 date d/m/y 2000-01-01:2010-12-31\n").unwrap();
        assert!(rs.validate(&["1/1/2005".to_string()]).is_empty());
        assert!(!rs.validate(&["1/1/1990".to_string()]).is_empty());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let rs = RuleSet::parse("# a comment\n\n1 required\n").unwrap();
        assert_eq!(rs.rules.len(), 1);
    }

    #[test]
    fn lookup_rule_joins_against_a_file() {
        let mut lookup_file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(lookup_file, "1001,Acme").unwrap();
        writeln!(lookup_file, "1002,Globex").unwrap();
        let path = lookup_file.path().to_str().unwrap();

        let text = format!("1 lookup 1:1 {}\n", path);
        let rs = RuleSet::parse(&text).unwrap();
        assert!(rs.validate(&["1001".to_string()]).is_empty());
        assert!(!rs.validate(&["9999".to_string()]).is_empty());
    }
}
