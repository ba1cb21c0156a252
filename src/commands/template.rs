//! `template`: produce non-CSV text per record from a template file
//! (`-ft`, read once at startup). `{N}` expands to field N (1-based);
//! `{@EXPR}` evaluates EXPR in the expression engine with the record's
//! fields bound as `$1..$N`; `\n`, `\t`, and `\{`/`\}` escape. With
//! `-fn`, a second template expands per record to a file name, and the
//! record's rendered text is written there instead of to the shared
//! sink (one file per record). Grounded on `csved_template.cpp`.

use crate::error::{CsvFixError, CsvFixResult};
use crate::expr;
use crate::flags::{CommandLine, FlagSpec, Predicates};
use crate::ioman::IOManager;
use std::fs::{self, File};
use std::io::Write;

pub const HELP: &str = "template - format each record from a template file (-ft, -fn per-record file naming)";

fn expand(tmpl: &str, row: &[String]) -> CsvFixResult<String> {
    let chars: Vec<char> = tmpl.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && i + 1 < chars.len() {
            match chars[i + 1] {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                '{' => out.push('{'),
                '}' => out.push('}'),
                other => out.push(other),
            }
            i += 2;
        } else if c == '{' {
            let mut j = i + 1;
            while j < chars.len() && chars[j] != '}' {
                j += 1;
            }
            if j >= chars.len() {
                return Err(CsvFixError::dispatch("template: unterminated '{' directive"));
            }
            let inner: String = chars[i + 1..j].iter().collect();
            if let Some(rest) = inner.strip_prefix('@') {
                let compiled = expr::compile(rest)?;
                out.push_str(&compiled.evaluate(&expr::params_from_record(row))?);
            } else {
                let n: usize = inner
                    .trim()
                    .parse()
                    .map_err(|_| CsvFixError::dispatch(format!("template: invalid field reference '{{{}}}'", inner)))?;
                out.push_str(row.get(n.wrapping_sub(1)).map(String::as_str).unwrap_or(""));
            }
            i = j + 1;
        } else {
            out.push(c);
            i += 1;
        }
    }
    Ok(out)
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::req("-ft"), FlagSpec::opt("-fn")];
    let cmd = CommandLine::parse(argv, &specs)?;
    let preds = Predicates::compile(&cmd)?;
    let path = cmd.get_value("-ft");
    let tmpl = fs::read_to_string(&path)
        .map_err(|e| CsvFixError::Io(format!("Cannot read template file {}: {}", path, e)))?;
    let file_name_tmpl = if cmd.has_flag("-fn") { Some(cmd.get_value("-fn")) } else { None };

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
        let text = expand(&tmpl, &row)?;
        match &file_name_tmpl {
            Some(fnt) => {
                let name = expand(fnt, &row)?;
                let mut f = File::create(&name)
                    .map_err(|e| CsvFixError::Io(format!("Cannot create {}: {}", name, e)))?;
                f.write_all(text.as_bytes())?;
            }
            None => io.write_text(&text)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_reference_expands_1_based() {
        let row = vec!["x".to_string(), "41".to_string()];
        assert_eq!(expand("{1}={@$2+1}\n", &row).unwrap(), "x=42\n");
    }

    #[test]
    fn escapes_braces_and_control_chars() {
        let row: Vec<String> = vec![];
        assert_eq!(expand("\\{lit\\}\\t!", &row).unwrap(), "{lit}\t!");
    }
}
