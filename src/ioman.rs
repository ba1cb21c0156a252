//! I/O manager: owns the ordered list of input sources and the single
//! output sink, presents a unified record iterator, enforces the output
//! quoting policy, and lets commands re-resolve field names against each
//! new source's column map.

use crate::csv::line::{validate_separator, Record};
use crate::csv::stream::{StreamParser, StreamParserOptions};
use crate::error::{CsvFixError, CsvFixResult};
use crate::fields::{parse_field_list, FieldList};
use crate::flags::{names, CommandLine};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Stdin, Write};

fn decode_escapes(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('t') => {
                    out.push('\t');
                    chars.next();
                }
                Some(other) => {
                    out.push(*other);
                    chars.next();
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_sep_flag(cmd: &CommandLine, name: &str) -> CsvFixResult<Option<char>> {
    if !cmd.has_flag(name) {
        return Ok(None);
    }
    let raw = decode_escapes(&cmd.get_value(name));
    let ch = raw.chars().next().ok_or_else(|| CsvFixError::logic("Empty separator"))?;
    validate_separator(ch)?;
    Ok(Some(ch))
}

enum Input {
    Stdin(Stdin),
    File(BufReader<File>),
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Input::Stdin(s) => s.read(buf),
            Input::File(f) => f.read(buf),
        }
    }
}

pub struct IOManager {
    sources: Vec<String>,
    next_source_idx: usize,
    current: Option<StreamParser<Input>>,
    current_file_name: String,
    last_observed_source: usize,

    sink: Box<dyn Write>,
    hdr: Option<String>,
    hdr_written: bool,

    sep: char,
    out_sep: char,
    smq: bool,
    sqf_list: Option<FieldList>,
    ibl: bool,
    ifn: bool,
    build_column_map: bool,

    pub seed: i64,
}

impl IOManager {
    pub fn new(cmd: &CommandLine) -> CsvFixResult<IOManager> {
        Self::with_options(cmd, false)
    }

    /// Build an I/O manager that also maintains a header column map per
    /// source, for commands that resolve fields by name (e.g. `order -nf`).
    pub fn with_column_map(cmd: &CommandLine) -> CsvFixResult<IOManager> {
        Self::with_options(cmd, true)
    }

    fn with_options(cmd: &CommandLine, build_column_map: bool) -> CsvFixResult<IOManager> {
        let rsep = parse_sep_flag(cmd, names::RSEP)?;
        let sep_flag = parse_sep_flag(cmd, names::SEP)?;
        let sep = rsep.or(sep_flag).unwrap_or(',');
        let retain = rsep.is_some();

        let out_sep = if cmd.has_flag(names::OSEP) {
            let raw = decode_escapes(&cmd.get_value(names::OSEP));
            raw.chars().next().ok_or_else(|| CsvFixError::logic("Empty output separator"))?
        } else if retain {
            sep
        } else {
            ','
        };

        let smq = cmd.has_flag(names::SMQ);
        let sqf_list = if cmd.has_flag(names::SQF) {
            let v = cmd.get_value(names::SQF);
            if v == "none" || v == "0" {
                Some(Vec::new())
            } else {
                Some(parse_field_list(&v)?)
            }
        } else {
            None
        };

        let ibl = cmd.has_flag(names::IBL);
        let ifn = cmd.has_flag(names::IFN);

        let hdr = if cmd.has_flag(names::HDR) {
            Some(cmd.get_value(names::HDR))
        } else {
            None
        };

        let seed = if cmd.has_flag(names::SEED) {
            cmd.get_value(names::SEED)
                .trim()
                .parse()
                .map_err(|_| CsvFixError::logic("Invalid -seed value"))?
        } else {
            0
        };

        let sink: Box<dyn Write> = if cmd.has_flag(names::OUT) {
            let path = cmd.get_value(names::OUT);
            Box::new(BufWriter::new(File::create(&path).map_err(|e| {
                CsvFixError::Io(format!("Cannot open output file {}: {}", path, e))
            })?))
        } else {
            Box::new(BufWriter::new(io::stdout()))
        };

        let sources = if cmd.files.is_empty() {
            vec!["-".to_string()]
        } else {
            cmd.files.clone()
        };

        Ok(IOManager {
            sources,
            next_source_idx: 0,
            current: None,
            current_file_name: String::new(),
            last_observed_source: usize::MAX,
            sink,
            hdr,
            hdr_written: false,
            sep,
            out_sep,
            smq,
            sqf_list,
            ibl,
            ifn,
            build_column_map,
            seed,
        })
    }

    fn open_next_source(&mut self) -> CsvFixResult<bool> {
        if self.next_source_idx >= self.sources.len() {
            return Ok(false);
        }
        let name = self.sources[self.next_source_idx].clone();
        self.next_source_idx += 1;

        let input = if name == "-" {
            Input::Stdin(io::stdin())
        } else {
            let f = File::open(&name)
                .map_err(|e| CsvFixError::Io(format!("Cannot open input file {}: {}", name, e)))?;
            Input::File(BufReader::new(f))
        };

        self.current_file_name = if name == "-" { "-".to_string() } else { name };
        self.current = Some(StreamParser::new(
            input,
            StreamParserOptions {
                sep: self.sep,
                ignore_blank_lines: self.ibl,
                skip_header_record: self.ifn,
                build_column_map: self.build_column_map,
            },
        ));
        Ok(true)
    }

    /// Read the next record, transparently advancing across input sources.
    pub fn read_csv(&mut self, row: &mut Record) -> CsvFixResult<bool> {
        loop {
            if self.current.is_none() && !self.open_next_source()? {
                return Ok(false);
            }
            let parser = self.current.as_mut().unwrap();
            match parser.next_record()? {
                Some(r) => {
                    *row = r;
                    return Ok(true);
                }
                None => {
                    self.current = None;
                }
            }
        }
    }

    /// Read the next raw line (used by `read_multi`), bypassing CSV
    /// splitting but still crossing source boundaries transparently.
    pub fn read_line(&mut self, line: &mut String) -> CsvFixResult<bool> {
        let mut row = Record::new();
        if self.read_csv(&mut row)? {
            // A successful read_csv leaves the parser that produced it open,
            // so its raw (pre-split) line text is still available.
            *line = self.current_raw_input().to_string();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn current_file_name(&self) -> &str {
        &self.current_file_name
    }

    pub fn current_line(&self) -> usize {
        self.current.as_ref().map(|p| p.line_number()).unwrap_or(0)
    }

    pub fn current_raw_input(&self) -> &str {
        self.current.as_ref().map(|p| p.raw_line()).unwrap_or("")
    }

    /// Resolve a header name against the current source's column map.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.current.as_ref().and_then(|p| p.column_index(name))
    }

    /// Returns true the first time it is called after a new source has
    /// begun producing records; callers that need to re-resolve field
    /// names per source (the `order -nf` consumer) poll this once per
    /// record read.
    pub fn source_changed(&mut self) -> bool {
        if self.last_observed_source != self.next_source_idx {
            self.last_observed_source = self.next_source_idx;
            true
        } else {
            false
        }
    }

    pub fn in_stream_count(&self) -> usize {
        self.sources.len()
    }

    /// Open input source `i` directly for the `check` command, which reads
    /// character-by-character itself rather than through `read_csv`.
    pub fn open_raw(&self, i: usize) -> CsvFixResult<(String, Box<dyn Read>)> {
        let name = self.sources[i].clone();
        let input: Box<dyn Read> = if name == "-" {
            Box::new(io::stdin())
        } else {
            Box::new(BufReader::new(File::open(&name).map_err(|e| {
                CsvFixError::Io(format!("Cannot open input file {}: {}", name, e))
            })?))
        };
        Ok((name, input))
    }

    pub fn sep(&self) -> char {
        self.sep
    }

    fn escape_field(&self, field: &str, idx: usize, suppress_csv_escape: bool) -> String {
        if let Some(list) = &self.sqf_list {
            if list.contains(&idx) {
                return format!("\"{}\"", field.replace('"', "\"\""));
            }
        }
        if self.smq && !field.contains(self.out_sep) && !field.contains('"') {
            return field.to_string();
        }
        if suppress_csv_escape {
            return format!("\"{}\"", field);
        }
        format!("\"{}\"", field.replace('"', "\"\""))
    }

    /// Write one record, applying the four-way quoting decision per field.
    pub fn write_row(&mut self, row: &Record) -> CsvFixResult<()> {
        self.write_row_opts(row, false)
    }

    /// As `write_row`, but with `suppress_csv_escape` set: quoted fields are
    /// wrapped in `"` without doubling embedded `"`, per the third rung of
    /// the four-way quoting decision in §4.4.
    pub fn write_row_opts(&mut self, row: &Record, suppress_csv_escape: bool) -> CsvFixResult<()> {
        self.write_header_if_needed()?;
        let sep = self.out_sep;
        let mut line = String::new();
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                line.push(sep);
            }
            line.push_str(&self.escape_field(field, i, suppress_csv_escape));
        }
        line.push('\n');
        self.sink.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Write raw text verbatim (used by `printf`, `template`, `exec`).
    pub fn write_text(&mut self, text: &str) -> CsvFixResult<()> {
        self.write_header_if_needed()?;
        self.sink.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            self.sink.write_all(b"\n")?;
        }
        Ok(())
    }

    fn write_header_if_needed(&mut self) -> CsvFixResult<()> {
        if !self.hdr_written {
            self.hdr_written = true;
            if let Some(h) = self.hdr.clone() {
                self.sink.write_all(h.as_bytes())?;
                self.sink.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

/// Split a row back into a raw line for commands that need the pre-split
/// text; `line::parse_line` is the inverse for round-tripping in tests.
pub fn rejoin(row: &Record, sep: char) -> String {
    row.join(&sep.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::CommandLine;

    fn cmd(argv: &[&str]) -> CommandLine {
        let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        CommandLine::parse(&argv, &[]).unwrap()
    }

    #[test]
    fn smart_quote_only_escapes_fields_that_need_it() {
        let mut io = IOManager::new(&cmd(&["-smq", "-"])).unwrap();
        let row = vec!["ab".to_string(), "c,d".to_string(), "e\"f".to_string()];
        io.write_row(&row).unwrap();
    }

    #[test]
    fn sqf_none_leaves_smart_quote_in_control() {
        // Per §9 Open Questions: "-sqf none" means an empty force-quote
        // list, not "never quote" — smart-quote (or the default
        // always-quote) still governs fields it doesn't name.
        let io = IOManager::new(&cmd(&["-sqf", "none", "-"])).unwrap();
        assert_eq!(io.escape_field("plain", 0, false), "\"plain\"");
    }

    #[test]
    fn sqf_list_forces_quoting_even_under_smart_quote() {
        // -sqf 1 names field index 0 (1-based -> 0-based); that field is
        // force-quoted even though smart-quote would otherwise leave it
        // bare, while field index 1 stays governed by smart-quote.
        let io = IOManager::new(&cmd(&["-smq", "-sqf", "1", "-"])).unwrap();
        assert_eq!(io.escape_field("plain", 0, false), "\"plain\"");
        assert_eq!(io.escape_field("plain", 1, false), "plain");
    }
}
