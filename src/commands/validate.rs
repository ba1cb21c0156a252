//! `validate`: apply a rule file to every record. `-rules FILE` names
//! the rule file (required); `-wg`/`-wb` narrow output to only passing or
//! only failing records, mirroring a write-all/write-good/write-bad
//! trichotomy — the default, `-wa`, passes every record through and
//! reports violations to stderr. Grounded on `csved_rules.cpp`/
//! `csved_validate.cpp`.

use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{CommandLine, FlagSpec, Predicates};
use crate::ioman::IOManager;
use crate::validate::RuleSet;
use std::fs;

pub const HELP: &str = "validate - apply a rule file to every record (-rules, -wa | -wg | -wb)";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::req("-rules"),
        FlagSpec::switch("-wa"),
        FlagSpec::switch("-wg"),
        FlagSpec::switch("-wb"),
    ];
    let cmd = CommandLine::parse(argv, &specs)?;
    let modes = ["-wa", "-wg", "-wb"].iter().filter(|f| cmd.has_flag(f)).count();
    if modes > 1 {
        return Err(CsvFixError::dispatch("validate: -wa, -wg and -wb are mutually exclusive"));
    }

    let path = cmd.get_value("-rules");
    let text = fs::read_to_string(&path)
        .map_err(|e| CsvFixError::Io(format!("Cannot read rule file {}: {}", path, e)))?;
    let rules = RuleSet::parse(&text)?;

    let preds = Predicates::compile(&cmd)?;
    let mut io = IOManager::new(&cmd)?;
    let mut row = Vec::new();
    let write_good_only = cmd.has_flag("-wg");
    let write_bad_only = cmd.has_flag("-wb");

    while io.read_csv(&mut row)? {
        if preds.should_skip(&row)? {
            continue;
        }
        if preds.should_pass(&row)? {
            io.write_row(&row)?;
            continue;
        }

        let violations = rules.validate(&row);
        let ok = violations.is_empty();
        if !ok {
            for v in &violations {
                eprintln!(
                    "{}:{}: {} (field {}): {}",
                    io.current_file_name(),
                    io.current_line(),
                    v.rule,
                    v.field + 1,
                    v.message
                );
            }
        }

        let emit = if write_good_only {
            ok
        } else if write_bad_only {
            !ok
        } else {
            true
        };
        if emit {
            io.write_row(&row)?;
        }
    }
    Ok(())
}
