//! Generic per-command framework: flag declaration, argv parsing,
//! `-skip`/`-pass` predicate compilation, and the universal flags that the
//! I/O manager and the framework itself recognize on every command.

use crate::error::{CsvFixError, CsvFixResult};
use crate::expr::{self, Expression};
use std::collections::{HashMap, HashSet};

/// Declare flag name constants the same way the ambient stack declares its
/// configuration keys: one identifier per flag, all upper case, expanding to
/// `pub const NAME: &str = "NAME"`. Values are lower-cased to the literal
/// flag text at each call site below instead, since csvfix's flags are
/// lower-case tokens like `-sep`; the constants instead name the canonical
/// Rust-side identifier and are bound to the right literal explicitly.
pub mod names {
    pub const OUT: &str = "-o";
    pub const IBL: &str = "-ibl";
    pub const IFN: &str = "-ifn";
    pub const SMQ: &str = "-smq";
    pub const SQF: &str = "-sqf";
    pub const SEP: &str = "-sep";
    pub const RSEP: &str = "-rsep";
    pub const OSEP: &str = "-osep";
    pub const HDR: &str = "-hdr";
    pub const SEED: &str = "-seed";
    pub const SKIP: &str = "-skip";
    pub const PASS: &str = "-pass";
}

#[derive(Clone, Copy)]
pub struct FlagSpec {
    pub name: &'static str,
    pub required: bool,
    pub has_value: bool,
}

impl FlagSpec {
    pub const fn req(name: &'static str) -> Self {
        FlagSpec { name, required: true, has_value: true }
    }
    pub const fn opt(name: &'static str) -> Self {
        FlagSpec { name, required: false, has_value: true }
    }
    pub const fn switch(name: &'static str) -> Self {
        FlagSpec { name, required: false, has_value: false }
    }
}

/// The universal flags every command accepts: I/O, separator and
/// quoting configuration, plus `-skip`/`-pass`.
pub fn universal_flags() -> Vec<FlagSpec> {
    vec![
        FlagSpec::opt(names::OUT),
        FlagSpec::switch(names::IBL),
        FlagSpec::switch(names::IFN),
        FlagSpec::switch(names::SMQ),
        FlagSpec::opt(names::SQF),
        FlagSpec::opt(names::SEP),
        FlagSpec::opt(names::RSEP),
        FlagSpec::opt(names::OSEP),
        FlagSpec::opt(names::HDR),
        FlagSpec::opt(names::SEED),
        FlagSpec::opt(names::SKIP),
        FlagSpec::opt(names::PASS),
    ]
}

pub struct CommandLine {
    values: HashMap<String, String>,
    present: HashSet<String>,
    pub files: Vec<String>,
}

impl CommandLine {
    pub fn has_flag(&self, name: &str) -> bool {
        self.present.contains(name)
    }

    pub fn get_value(&self, name: &str) -> String {
        self.values.get(name).cloned().unwrap_or_default()
    }

    pub fn get_value_or(&self, name: &str, default: &str) -> String {
        self.values.get(name).cloned().unwrap_or_else(|| default.to_string())
    }

    /// Parse `argv` (the command's own arguments, with the subcommand name
    /// already removed) against `command_specs` plus the universal flags.
    pub fn parse(argv: &[String], command_specs: &[FlagSpec]) -> CsvFixResult<CommandLine> {
        let mut specs: HashMap<&str, FlagSpec> = HashMap::new();
        for s in universal_flags().into_iter().chain(command_specs.iter().copied()) {
            specs.insert(s.name, s);
        }

        let mut values = HashMap::new();
        let mut present = HashSet::new();
        let mut files = Vec::new();

        let mut i = 0;
        while i < argv.len() {
            let tok = &argv[i];
            if tok.starts_with('-') && tok.len() > 1 && !looks_like_negative_number(tok) {
                let spec = specs.get(tok.as_str()).ok_or_else(|| {
                    CsvFixError::dispatch(format!("Unknown flag {}", tok))
                })?;
                present.insert(spec.name.to_string());
                if spec.has_value {
                    i += 1;
                    let val = argv.get(i).ok_or_else(|| {
                        CsvFixError::dispatch(format!("Flag {} needs a value", spec.name))
                    })?;
                    values.insert(spec.name.to_string(), val.clone());
                }
            } else {
                files.push(tok.clone());
            }
            i += 1;
        }

        for s in specs.values() {
            if s.required && !present.contains(s.name) {
                return Err(CsvFixError::dispatch(format!("Missing required flag {}", s.name)));
            }
        }

        Ok(CommandLine { values, present, files })
    }
}

fn looks_like_negative_number(tok: &str) -> bool {
    tok.len() > 1 && tok.as_bytes()[0] == b'-' && tok.as_bytes()[1].is_ascii_digit()
}

/// Enforce "at most one of" / "exactly one of" for two flags, mirroring
/// the original's shared `NotBoth` helper.
pub fn not_both(cmd: &CommandLine, a: &str, b: &str, required: bool) -> CsvFixResult<()> {
    if cmd.has_flag(a) && cmd.has_flag(b) {
        return Err(CsvFixError::dispatch(format!(
            "Cannot specify both {} and {} options",
            a, b
        )));
    }
    if required && !(cmd.has_flag(a) || cmd.has_flag(b)) {
        return Err(CsvFixError::dispatch(format!("Need one of {} or {} options", a, b)));
    }
    Ok(())
}

/// Compiled `-skip`/`-pass` predicates, evaluated per record.
pub struct Predicates {
    skip: Option<Expression>,
    pass: Option<Expression>,
}

impl Predicates {
    pub fn compile(cmd: &CommandLine) -> CsvFixResult<Predicates> {
        let skip = if cmd.has_flag(names::SKIP) {
            Some(expr::compile(&cmd.get_value(names::SKIP))?)
        } else {
            None
        };
        let pass = if cmd.has_flag(names::PASS) {
            Some(expr::compile(&cmd.get_value(names::PASS))?)
        } else {
            None
        };
        Ok(Predicates { skip, pass })
    }

    /// `-skip` is checked first: a truthy skip discards the record entirely
    /// and `pass` is not consulted.
    pub fn should_skip(&self, row: &[String]) -> CsvFixResult<bool> {
        match &self.skip {
            Some(e) => e.evaluate_bool(&expr::params_from_record(row)),
            None => Ok(false),
        }
    }

    /// A truthy `-pass` bypasses the command's transform for this record.
    pub fn should_pass(&self, row: &[String]) -> CsvFixResult<bool> {
        match &self.pass {
            Some(e) => e.evaluate_bool(&expr::params_from_record(row)),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_files() {
        let argv: Vec<String> = vec!["-f", "1,2", "in.csv"].into_iter().map(String::from).collect();
        let specs = [FlagSpec::opt("-f")];
        let cmd = CommandLine::parse(&argv, &specs).unwrap();
        assert_eq!(cmd.get_value("-f"), "1,2");
        assert_eq!(cmd.files, vec!["in.csv".to_string()]);
    }

    #[test]
    fn missing_required_flag_errors() {
        let argv: Vec<String> = vec![];
        let specs = [FlagSpec::req("-n")];
        assert!(CommandLine::parse(&argv, &specs).is_err());
    }

    #[test]
    fn unknown_flag_errors() {
        let argv: Vec<String> = vec!["-bogus".to_string()];
        assert!(CommandLine::parse(&argv, &[]).is_err());
    }

    #[test]
    fn skip_checked_before_pass() {
        let argv: Vec<String> = vec!["-skip".to_string(), "$1 == \"x\"".to_string()];
        let cmd = CommandLine::parse(&argv, &[]).unwrap();
        let preds = Predicates::compile(&cmd).unwrap();
        assert!(preds.should_skip(&["x".to_string()]).unwrap());
        assert!(!preds.should_skip(&["y".to_string()]).unwrap());
    }
}
