//! CSV stream parser: assembles records from a byte stream via the
//! quote-aware state machine in `raw`, tracking line numbers and raw text
//! and optionally building a header column map.

use super::line::{self, Record};
use super::raw::RawLineAssembler;
use crate::error::CsvFixResult;
use std::collections::HashMap;
use std::io::Read;

pub struct StreamParserOptions {
    pub sep: char,
    pub ignore_blank_lines: bool,
    pub skip_header_record: bool,
    pub build_column_map: bool,
}

pub struct StreamParser<R: Read> {
    assembler: RawLineAssembler<R>,
    sep: char,
    ignore_blank_lines: bool,
    skip_header_record: bool,
    build_column_map: bool,
    raw_line: String,
    column_map: Option<HashMap<String, usize>>,
    header_handled: bool,
}

impl<R: Read> StreamParser<R> {
    pub fn new(inner: R, opts: StreamParserOptions) -> Self {
        StreamParser {
            assembler: RawLineAssembler::new(inner, opts.sep, true, false),
            sep: opts.sep,
            ignore_blank_lines: opts.ignore_blank_lines,
            skip_header_record: opts.skip_header_record,
            build_column_map: opts.build_column_map,
            raw_line: String::new(),
            column_map: None,
            header_handled: false,
        }
    }

    pub fn line_number(&self) -> usize {
        self.assembler.line_number()
    }

    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_map.as_ref().and_then(|m| m.get(name).copied())
    }

    fn is_blank(line: &str) -> bool {
        line.trim().is_empty()
    }

    /// Read the next record, applying blank-line filtering and header
    /// handling. Returns `Ok(None)` at end of stream.
    pub fn next_record(&mut self) -> CsvFixResult<Option<Record>> {
        loop {
            let next = self.assembler.next_logical_line()?;
            let (line, _lineno) = match next {
                None => return Ok(None),
                Some(v) => v,
            };

            if self.ignore_blank_lines && Self::is_blank(&line) {
                continue;
            }

            self.raw_line = line.clone();
            let record = line::parse_line(&line, self.sep)?;

            if !self.header_handled {
                self.header_handled = true;
                if self.build_column_map {
                    let mut map = HashMap::new();
                    for (i, name) in record.iter().enumerate() {
                        if map.contains_key(name) {
                            return Err(crate::error::CsvFixError::logic(format!(
                                "Duplicate column name '{}' in header",
                                name
                            )));
                        }
                        map.insert(name.clone(), i);
                    }
                    self.column_map = Some(map);
                }
                if self.skip_header_record {
                    continue;
                }
            }

            return Ok(Some(record));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parser(text: &str) -> StreamParser<Cursor<Vec<u8>>> {
        StreamParser::new(
            Cursor::new(text.as_bytes().to_vec()),
            StreamParserOptions {
                sep: ',',
                ignore_blank_lines: false,
                skip_header_record: false,
                build_column_map: false,
            },
        )
    }

    #[test]
    fn embedded_newline_is_one_record_and_reports_line_two() {
        let mut p = parser("\"a\nb\",c\n");
        let r = p.next_record().unwrap().unwrap();
        assert_eq!(r, vec!["a\nb", "c"]);
        assert_eq!(p.line_number(), 2);
    }

    #[test]
    fn multiple_records_in_order() {
        let mut p = parser("1,2\n3,4\n");
        assert_eq!(p.next_record().unwrap().unwrap(), vec!["1", "2"]);
        assert_eq!(p.next_record().unwrap().unwrap(), vec!["3", "4"]);
        assert!(p.next_record().unwrap().is_none());
    }

    #[test]
    fn blank_lines_skipped_when_requested() {
        let mut p = StreamParser::new(
            Cursor::new(b"1,2\n\n3,4\n".to_vec()),
            StreamParserOptions {
                sep: ',',
                ignore_blank_lines: true,
                skip_header_record: false,
                build_column_map: false,
            },
        );
        assert_eq!(p.next_record().unwrap().unwrap(), vec!["1", "2"]);
        assert_eq!(p.next_record().unwrap().unwrap(), vec!["3", "4"]);
    }

    #[test]
    fn header_builds_column_map_and_is_skipped() {
        let mut p = StreamParser::new(
            Cursor::new(b"name,age\nbob,9\n".to_vec()),
            StreamParserOptions {
                sep: ',',
                ignore_blank_lines: false,
                skip_header_record: true,
                build_column_map: true,
            },
        );
        let r = p.next_record().unwrap().unwrap();
        assert_eq!(r, vec!["bob", "9"]);
        assert_eq!(p.column_index("age"), Some(1));
    }
}
