//! `stat`: emit one output record per input source, `(file-name,
//! record-count, min-fields, max-fields)`. An empty source still emits a
//! record with count 0 and min/max fields 0. Takes no flags beyond the
//! universal set, matching `csved_stat.cpp`'s `StatCommand`, which
//! likewise has no options of its own.

use crate::csv::stream::{StreamParser, StreamParserOptions};
use crate::error::CsvFixResult;
use crate::flags::CommandLine;
use crate::ioman::IOManager;

pub const HELP: &str = "stat - per input file: file name, record count, min fields, max fields";

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let cmd = CommandLine::parse(argv, &[])?;
    let mut io = IOManager::new(&cmd)?;
    let sep = io.sep();

    for i in 0..io.in_stream_count() {
        let (name, reader) = io.open_raw(i)?;
        let mut parser = StreamParser::new(
            reader,
            StreamParserOptions { sep, ignore_blank_lines: false, skip_header_record: false, build_column_map: false },
        );

        let mut count = 0usize;
        let mut min_fields = usize::MAX;
        let mut max_fields = 0usize;
        while let Some(row) = parser.next_record()? {
            count += 1;
            min_fields = min_fields.min(row.len());
            max_fields = max_fields.max(row.len());
        }
        if count == 0 {
            min_fields = 0;
        }

        io.write_row(&vec![name, count.to_string(), min_fields.to_string(), max_fields.to_string()])?;
    }
    Ok(())
}
