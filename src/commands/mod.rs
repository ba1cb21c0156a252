//! The transform command set: one module per subcommand (a few
//! modules back more than one registry entry, where the original grouped
//! thin subclasses under one source file — `case`, `truncpad`).

pub mod case;
pub mod check;
pub mod date_format;
pub mod date_iso;
pub mod echo;
pub mod exec;
pub mod file_split;
pub mod from_xml;
pub mod head;
pub mod join;
pub mod money;
pub mod order;
pub mod printf;
pub mod put;
pub mod read_multi;
pub mod rmnew;
pub mod sequence;
pub mod shuffle;
pub mod stat;
pub mod support;
pub mod tail;
pub mod template;
pub mod to_xml;
pub mod trim;
pub mod truncpad;
pub mod unique;
pub mod validate;

use crate::registry::CommandEntry;

/// The full registration table, in help-listing order. `registry::resolve`
/// sorts or searches this as needed; this order is simply the order new
/// commands were grounded in, matching the original's registration call
/// sequence in `csved_main.cpp`.
pub fn all() -> Vec<CommandEntry> {
    vec![
        CommandEntry { name: "echo", summary: echo::HELP, run: echo::run },
        CommandEntry { name: "head", summary: head::HELP, run: head::run },
        CommandEntry { name: "tail", summary: tail::HELP, run: tail::run },
        CommandEntry { name: "unique", summary: unique::HELP, run: unique::run },
        CommandEntry { name: "shuffle", summary: shuffle::HELP, run: shuffle::run },
        CommandEntry { name: "order", summary: order::HELP, run: order::run },
        CommandEntry { name: "trim", summary: trim::HELP, run: trim::run },
        CommandEntry { name: "truncate", summary: truncpad::TRUNCATE_HELP, run: truncpad::run_truncate },
        CommandEntry { name: "pad", summary: truncpad::PAD_HELP, run: truncpad::run_pad },
        CommandEntry { name: "upper", summary: case::UPPER_HELP, run: case::run_upper },
        CommandEntry { name: "lower", summary: case::LOWER_HELP, run: case::run_lower },
        CommandEntry { name: "mixed", summary: case::MIXED_HELP, run: case::run_mixed },
        CommandEntry { name: "put", summary: put::HELP, run: put::run },
        CommandEntry { name: "sequence", summary: sequence::HELP, run: sequence::run },
        CommandEntry { name: "printf", summary: printf::HELP, run: printf::run },
        CommandEntry { name: "template", summary: template::HELP, run: template::run },
        CommandEntry { name: "exec", summary: exec::HELP, run: exec::run },
        CommandEntry { name: "check", summary: check::HELP, run: check::run },
        CommandEntry { name: "join", summary: join::HELP, run: join::run },
        CommandEntry { name: "file_split", summary: file_split::HELP, run: file_split::run },
        CommandEntry { name: "stat", summary: stat::HELP, run: stat::run },
        CommandEntry { name: "money", summary: money::HELP, run: money::run },
        CommandEntry { name: "date_iso", summary: date_iso::HELP, run: date_iso::run },
        CommandEntry { name: "date_format", summary: date_format::HELP, run: date_format::run },
        CommandEntry { name: "rmnew", summary: rmnew::HELP, run: rmnew::run },
        CommandEntry { name: "read_multi", summary: read_multi::HELP, run: read_multi::run },
        CommandEntry { name: "from_xml", summary: from_xml::HELP, run: from_xml::run },
        CommandEntry { name: "to_xml", summary: to_xml::HELP, run: to_xml::run },
        CommandEntry { name: "validate", summary: validate::HELP, run: validate::run },
    ]
}
