//! `from_xml`: read an XML document (whole input, not streamed per record)
//! and emit one CSV row per match of `-re PATH` (`@`-separated element
//! path to the repeating record element, matched as a suffix of the
//! current DOM path, required). `-ex NAMES` drops
//! named child elements/attributes; `-na` skips attributes entirely; `-ip`
//! prepends the matched path as the first field; `-ml STR` sets the
//! separator used to join a child element's repeated text nodes. Grounded
//! on `csved_fromxml.cpp`.

use crate::error::{CsvFixError, CsvFixResult};
use crate::flags::{CommandLine, FlagSpec};
use crate::ioman::IOManager;
use crate::xml::{from_xml as convert, FromXmlOptions};
use std::io::Read;

pub const HELP: &str = "from_xml - convert XML records to CSV rows (-re path, -ex, -na, -ip, -ml)";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [
        FlagSpec::req("-re"),
        FlagSpec::opt("-ex"),
        FlagSpec::switch("-na"),
        FlagSpec::switch("-ip"),
        FlagSpec::opt("-ml"),
    ];
    let cmd = CommandLine::parse(argv, &specs)?;

    let opts = FromXmlOptions {
        record_path: cmd.get_value("-re").split('@').map(|s| s.trim().to_string()).collect(),
        exclude: if cmd.has_flag("-ex") {
            cmd.get_value("-ex").split(',').map(|s| s.trim().to_string()).collect()
        } else {
            Vec::new()
        },
        no_attributes: cmd.has_flag("-na"),
        insert_path: cmd.has_flag("-ip"),
        multiline_sep: cmd.get_value_or("-ml", " "),
    };

    let mut io = IOManager::new(&cmd)?;
    let sources = io.in_stream_count();
    let mut text = String::new();
    for i in 0..sources {
        let (_name, mut reader) = io.open_raw(i)?;
        reader
            .read_to_string(&mut text)
            .map_err(|e| CsvFixError::Io(format!("Cannot read XML input: {}", e)))?;
    }

    let rows = convert(&text, &opts)?;

    for row in rows {
        io.write_row(&row)?;
    }
    Ok(())
}
