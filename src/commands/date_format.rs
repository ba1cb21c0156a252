//! `date_format`: reformat an ISO `yyyy-mm-dd` date field using a
//! `d/dd/m/mm/mmm/M/y/yyyy/w/W` template (`-fmt`, required). `-f` selects
//! the field (required). Grounded on `csved_date.cpp`'s `DateFormatCommand`.

use crate::commands::support::standard_loop;
use crate::date::{self, DEFAULT_MONTH_NAMES};
use crate::error::CsvFixResult;
use crate::fields::parse_field_list;
use crate::flags::FlagSpec;

pub const HELP: &str = "date_format - reformat an ISO date field per a template (-f, -fmt)";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::req("-f"), FlagSpec::req("-fmt")];
    standard_loop(argv, &specs, |cmd, row| {
        let fields = parse_field_list(&cmd.get_value("-f"))?;
        let fmt = cmd.get_value("-fmt");

        let mut out = row.clone();
        for &i in &fields {
            if let Some(v) = row.get(i) {
                let parsed = date::parse_iso(v)?;
                let formatted = date::format(parsed, &fmt, &DEFAULT_MONTH_NAMES)?;
                if let Some(slot) = out.get_mut(i) {
                    *slot = formatted;
                }
            }
        }
        Ok(Some(out))
    })
}
