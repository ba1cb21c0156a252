//! `exec`: run an external command once per record, substituting `%1`,
//! `%2`, ... placeholders with field values (`%%` for a literal `%`).
//! Without `-r`, each line of the subprocess's stdout is parsed as CSV
//! and its fields are appended to the original record's fields, emitting
//! one output record per stdout line. With `-r`, each stdout line
//! (parsed as CSV) replaces the record outright instead of being
//! appended. A non-zero child exit status is a command-execution error.
//! Each substituted field value is shell-escaped (backslash, single-quote,
//! double-quote, `$` and a backtick are each backslash-escaped, then the
//! whole value is wrapped in double quotes) before interpolation, so
//! record contents can never break out of their argument position, nor
//! trigger command or variable substitution, in the surrounding command
//! line. Grounded on `csved_exec.cpp`.

use crate::csv::line::parse_line;
use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{CommandLine, FlagSpec, Predicates};
use crate::ioman::IOManager;
use std::process::Command;

pub const HELP: &str = "exec - run a shell command per record, substituting %N fields (-c, -r)";

/// Escape a field value for safe interpolation into a `sh -c` command
/// line: backslash-escape `\`, `'`, `"`, `$` and `` ` ``, then wrap the
/// result in double quotes. Double quotes in POSIX shells still expand
/// `$...` and `` `...` `` unless those characters are themselves escaped,
/// so both must be covered alongside the quote characters for the value
/// to be inert rather than re-parsed as shell syntax.
fn shell_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '\\' || c == '\'' || c == '"' || c == '$' || c == '`' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn expand_command(fmt: &str, row: &[String]) -> CsvFixResult<String> {
    let chars: Vec<char> = fmt.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' && i + 1 < chars.len() && chars[i + 1] == '%' {
            out.push('%');
            i += 2;
        } else if chars[i] == '%' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit() {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let n: usize = chars[i + 1..j].iter().collect::<String>().parse().unwrap();
            let value = row.get(n.wrapping_sub(1)).map(String::as_str).unwrap_or("");
            out.push_str(&shell_quote(value));
            i = j;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::req("-c"), FlagSpec::switch("-r")];
    let cmd = CommandLine::parse(argv, &specs)?;
    let preds = Predicates::compile(&cmd)?;
    let template = cmd.get_value("-c");
    let replace = cmd.has_flag("-r");

    let mut io = IOManager::new(&cmd)?;
    let sep = io.sep();
    let mut row = Vec::new();
    while io.read_csv(&mut row)? {
        if preds.should_skip(&row)? {
            continue;
        }
        if preds.should_pass(&row)? {
            io.write_row(&row)?;
            continue;
        }
        let shell_cmd = expand_command(&template, &row)?;
        let output = Command::new("sh")
            .arg("-c")
            .arg(&shell_cmd)
            .output()
            .map_err(|e| CsvFixError::Io(format!("Cannot run '{}': {}", shell_cmd, e)))?;
        if !output.status.success() {
            return Err(CsvFixError::Io(format!(
                "exec: '{}' exited with status {}",
                shell_cmd,
                output.status.code().unwrap_or(-1)
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            let fields = parse_line(line, sep)?;
            let out = if replace {
                fields
            } else {
                let mut combined = row.clone();
                combined.extend(fields);
                combined
            };
            io.write_row(&out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_fields_and_literal_percent() {
        let row = vec!["a".to_string(), "b".to_string()];
        assert_eq!(expand_command("echo %1%%%2", &row).unwrap(), "echo \"a\"%\"b\"");
    }

    #[test]
    fn field_values_are_shell_escaped() {
        let row = vec!["$(rm -rf /); \"x\"".to_string()];
        let expanded = expand_command("echo %1", &row).unwrap();
        assert_eq!(expanded, "echo \"\\$(rm -rf /); \\\"x\\\"\"");
    }

    #[test]
    fn command_substitution_payload_is_not_executed_by_the_shell() {
        let row = vec!["$(touch /tmp/csvfix-exec-injection-marker)".to_string()];
        let shell_cmd = expand_command("printf %s %1", &row).unwrap();
        let output = Command::new("sh").arg("-c").arg(&shell_cmd).output().unwrap();
        assert_eq!(
            String::from_utf8_lossy(&output.stdout),
            "$(touch /tmp/csvfix-exec-injection-marker)"
        );
    }

    #[test]
    fn backtick_command_substitution_payload_is_not_executed_by_the_shell() {
        let row = vec!["`id`".to_string()];
        let shell_cmd = expand_command("printf %s %1", &row).unwrap();
        let output = Command::new("sh").arg("-c").arg(&shell_cmd).output().unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "`id`");
    }
}
