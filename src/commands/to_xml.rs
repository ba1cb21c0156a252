//! `to_xml`: read the whole input stream and write it out as one XML
//! document, one `-rn` element per row and one child element per field.
//! Field element names come from `-fn NAMES` (explicit list); otherwise
//! positional `f1`, `f2`, ... names are used, matching the XHTML-table
//! fallback the original uses when no naming source is given. `-rt` sets
//! the root element name, `-ni` disables pretty-indentation. `-af` names
//! fields that become attributes of the record element rather than child
//! elements; `-cdata` wraps remaining field text in CDATA sections; `-gf`
//! groups consecutive records sharing the named fields' values under one
//! `-gn` parent element (default "group"), dropping those fields from the
//! nested record and attaching them as attributes of the group instead.
//! Grounded on `csved_toxml.cpp`.

use crate::commands::support::read_all;
use crate::error::CsvFixResult;
use crate::fields::parse_field_list;
use crate::flags::{CommandLine, FlagSpec};
use crate::ioman::IOManager;
use crate::xml::{to_xml as convert, ToXmlOptions};

pub const HELP: &str =
    "to_xml - convert CSV rows to an XML document (-fn names, -rn record, -rt root, -ni, -af attrs, -cdata, -gf group, -gn)";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::opt("-fn"),
        FlagSpec::opt("-rn"),
        FlagSpec::opt("-rt"),
        FlagSpec::switch("-ni"),
        FlagSpec::opt("-af"),
        FlagSpec::switch("-cdata"),
        FlagSpec::opt("-gf"),
        FlagSpec::opt("-gn"),
    ];
    let cmd = CommandLine::parse(argv, &specs)?;

    let mut io = IOManager::new(&cmd)?;
    let rows = read_all(&mut io)?;

    let field_names = if cmd.has_flag("-fn") {
        cmd.get_value("-fn").split(',').map(|s| s.trim().to_string()).collect()
    } else {
        Vec::new()
    };
    let attribute_fields = if cmd.has_flag("-af") { parse_field_list(&cmd.get_value("-af"))? } else { Vec::new() };
    let group_fields = if cmd.has_flag("-gf") { parse_field_list(&cmd.get_value("-gf"))? } else { Vec::new() };

    let opts = ToXmlOptions {
        field_names,
        record_name: cmd.get_value_or("-rn", "record"),
        root_name: cmd.get_value_or("-rt", "csv"),
        indent: !cmd.has_flag("-ni"),
        attribute_fields,
        cdata: cmd.has_flag("-cdata"),
        group_fields,
        group_name: cmd.get_value_or("-gn", "group"),
    };

    let text = convert(&rows, &opts)?;
    io.write_text(&text)?;
    Ok(())
}
