//! Config file loader: `defaults`/`alias` directives that splice extra
//! arguments into argv before flag parsing, grounded on `csved_config.cpp`.
//!
//! The config file is named `.csvfix` on Unix and `csvfix.cfg` on Windows
//! (the original's `CONFIG_FILE_UNIX`/`CONFIG_FILE_WIN32` split); this
//! crate only ships on Unix-like targets, so the Unix name is used
//! unconditionally, with a note of the alternative kept here for anyone
//! porting it.

use crate::error::{CsvFixError, CsvFixResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
const CONFIG_FILE_NAME: &str = ".csvfix";
#[cfg(not(unix))]
const CONFIG_FILE_NAME: &str = "csvfix.cfg";

/// `defaults` entries apply to every invocation of the named command;
/// `alias` entries define a new subcommand name that expands to an
/// existing command plus its own fixed argument body.
#[derive(Default)]
pub struct Config {
    defaults: HashMap<String, Vec<String>>,
    aliases: HashMap<String, (String, Vec<String>)>,
}

impl Config {
    /// Look for a config file in the current directory, then in `$HOME`,
    /// returning an empty `Config` if neither exists. `known_commands`
    /// validates `alias` directives eagerly, at the point they are parsed,
    /// per `csved_config.cpp` (the loader holds a registry reference for
    /// exactly this check rather than deferring it to invocation time).
    pub fn load(known_commands: &[&str]) -> CsvFixResult<Config> {
        if let Some(path) = find_config_file() {
            let text = fs::read_to_string(&path)
                .map_err(|e| CsvFixError::config(format!("Cannot read {}: {}", path.display(), e)))?;
            Config::parse(&text, known_commands)
        } else {
            Ok(Config::default())
        }
    }

    fn parse(text: &str, known_commands: &[&str]) -> CsvFixResult<Config> {
        let mut cfg = Config::default();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut toks = tokenize(line)?;
            if toks.is_empty() {
                continue;
            }
            let directive = toks.remove(0);
            match directive.as_str() {
                "defaults" => {
                    if toks.is_empty() {
                        return Err(CsvFixError::config(format!(
                            "Config file line {}: 'defaults' needs a command name",
                            lineno + 1
                        )));
                    }
                    let cmd = toks.remove(0);
                    cfg.defaults.entry(cmd).or_default().extend(toks);
                }
                "alias" => {
                    if toks.len() < 2 {
                        return Err(CsvFixError::config(format!(
                            "Config file line {}: 'alias' needs a name and a target command",
                            lineno + 1
                        )));
                    }
                    let alias_name = toks.remove(0);
                    let target = toks.remove(0);
                    if cfg.aliases.contains_key(&alias_name) {
                        return Err(CsvFixError::config(format!(
                            "Config file line {}: duplicate alias '{}'",
                            lineno + 1,
                            alias_name
                        )));
                    }
                    if !known_commands.contains(&target.as_str()) {
                        return Err(CsvFixError::config(format!(
                            "Config file line {}: alias '{}' names unknown command '{}'",
                            lineno + 1,
                            alias_name,
                            target
                        )));
                    }
                    cfg.aliases.insert(alias_name, (target, toks));
                }
                other => {
                    return Err(CsvFixError::config(format!(
                        "Config file line {}: unknown directive '{}'",
                        lineno + 1,
                        other
                    )))
                }
            }
        }
        Ok(cfg)
    }

    /// Resolve `argv[0]` (the subcommand token) through any alias, then
    /// splice in that command's `defaults` body after the resolved name.
    /// Defaults are placed first so any explicit user flag later in argv
    /// overrides them during `CommandLine::parse`'s last-one-wins parse.
    pub fn rewrite_argv(&self, argv: &[String]) -> Vec<String> {
        if argv.is_empty() {
            return argv.to_vec();
        }
        let mut out = Vec::new();
        let (resolved_name, alias_body) = match self.aliases.get(&argv[0]) {
            Some((target, body)) => (target.clone(), body.clone()),
            None => (argv[0].clone(), Vec::new()),
        };
        out.push(resolved_name.clone());
        out.extend(alias_body);
        if let Some(defaults) = self.defaults.get(&resolved_name) {
            out.extend(defaults.clone());
        }
        out.extend(argv[1..].iter().cloned());
        out
    }
}

fn find_config_file() -> Option<PathBuf> {
    let cwd = Path::new(CONFIG_FILE_NAME);
    if cwd.is_file() {
        return Some(cwd.to_path_buf());
    }
    if let Ok(home) = std::env::var("HOME") {
        let p = Path::new(&home).join(CONFIG_FILE_NAME);
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

/// Split a config line into tokens, respecting double-quoted spans so a
/// `defaults`/`alias` value can itself contain whitespace.
fn tokenize(line: &str) -> CsvFixResult<Vec<String>> {
    let mut toks = Vec::new();
    let mut chars = line.chars().peekable();
    let mut cur = String::new();
    let mut in_token = false;

    while let Some(c) = chars.next() {
        if c == '"' {
            in_token = true;
            while let Some(&nc) = chars.peek() {
                if nc == '"' {
                    chars.next();
                    break;
                }
                cur.push(nc);
                chars.next();
            }
        } else if c.is_whitespace() {
            if in_token {
                toks.push(std::mem::take(&mut cur));
                in_token = false;
            }
        } else {
            in_token = true;
            cur.push(c);
        }
    }
    if in_token {
        toks.push(cur);
    }
    Ok(toks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: &[&str] = &["order", "echo"];

    #[test]
    fn defaults_are_appended_after_resolved_command() {
        let cfg = Config::parse("defaults order -f 1,2\n", COMMANDS).unwrap();
        let out = cfg.rewrite_argv(&["order".to_string(), "-r".to_string()]);
        assert_eq!(out, vec!["order", "-f", "1,2", "-r"]);
    }

    #[test]
    fn alias_expands_to_target_command_and_body() {
        let cfg = Config::parse("alias byname order -nf\n", COMMANDS).unwrap();
        let out = cfg.rewrite_argv(&["byname".to_string(), "name".to_string()]);
        assert_eq!(out, vec!["order", "-nf", "name"]);
    }

    #[test]
    fn quoted_values_keep_embedded_spaces() {
        let cfg = Config::parse("defaults echo -hdr \"a, b, c\"\n", COMMANDS).unwrap();
        let out = cfg.rewrite_argv(&["echo".to_string()]);
        assert_eq!(out, vec!["echo", "-hdr", "a, b, c"]);
    }

    #[test]
    fn unknown_directive_errors() {
        assert!(Config::parse("bogus foo\n", COMMANDS).is_err());
    }

    #[test]
    fn alias_to_unknown_command_errors() {
        assert!(Config::parse("alias x bogus\n", COMMANDS).is_err());
    }

    #[test]
    fn duplicate_alias_errors() {
        assert!(Config::parse("alias x order\nalias x echo\n", COMMANDS).is_err());
    }
}
