//! Command dispatch table: every subcommand registers a name, a
//! one-line summary, and a run function; `resolve` implements the
//! original's unique-unambiguous-prefix matching so `csvfix ord ...` works
//! as long as `ord` names exactly one command.

use crate::error::{CsvFixError, CsvFixResult};

pub type RunFn = fn(&[String]) -> CsvFixResult<()>;

pub struct CommandEntry {
    pub name: &'static str,
    pub summary: &'static str,
    pub run: RunFn,
}

/// The full set of registered commands, in help-listing order.
pub fn commands() -> Vec<CommandEntry> {
    crate::commands::all()
}

/// Resolve a user-typed command name against the registry: an exact match
/// always wins; otherwise a name that is an unambiguous prefix of exactly
/// one registered command resolves to it.
pub fn resolve<'a>(table: &'a [CommandEntry], name: &str) -> CsvFixResult<&'a CommandEntry> {
    if let Some(exact) = table.iter().find(|c| c.name == name) {
        return Ok(exact);
    }
    let matches: Vec<&CommandEntry> = table.iter().filter(|c| c.name.starts_with(name)).collect();
    match matches.len() {
        0 => Err(CsvFixError::dispatch(format!("Unknown command: {}", name))),
        1 => Ok(matches[0]),
        _ => {
            let names: Vec<&str> = matches.iter().map(|c| c.name).collect();
            Err(CsvFixError::dispatch(format!(
                "Ambiguous command '{}': matches {}",
                name,
                names.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &[String]) -> CsvFixResult<()> {
        Ok(())
    }

    fn sample_table() -> Vec<CommandEntry> {
        vec![
            CommandEntry { name: "order", summary: "reorder fields", run: noop },
            CommandEntry { name: "ord2", summary: "unused", run: noop },
            CommandEntry { name: "echo", summary: "copy input to output", run: noop },
        ]
    }

    #[test]
    fn exact_match_wins_even_with_ambiguous_prefix() {
        let t = sample_table();
        assert_eq!(resolve(&t, "order").unwrap().name, "order");
    }

    #[test]
    fn unique_prefix_resolves() {
        let t = sample_table();
        assert_eq!(resolve(&t, "ech").unwrap().name, "echo");
    }

    #[test]
    fn ambiguous_prefix_errors() {
        let t = sample_table();
        assert!(resolve(&t, "or").is_err());
    }

    #[test]
    fn unknown_command_errors() {
        let t = sample_table();
        assert!(resolve(&t, "bogus").is_err());
    }
}
