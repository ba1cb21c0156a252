//! Shared byte-level logical-line assembler used by both the stream parser
//! and the checker. Scans a byte stream and
//! joins together the physical lines that make up one logical CSV record,
//! tracking line numbers as it goes.

use crate::error::{CsvFixError, CsvFixResult};
use std::io::{Bytes, Read};

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Outside,
    InUnquoted,
    InQuoted,
    JustClosedQuote,
}

pub struct RawLineAssembler<R: Read> {
    bytes: Bytes<R>,
    sep: u8,
    line_number: usize,
    allow_embedded_newline: bool,
    strict: bool,
    last_line_text: String,
}

impl<R: Read> RawLineAssembler<R> {
    pub fn new(inner: R, sep: char, allow_embedded_newline: bool, strict: bool) -> Self {
        RawLineAssembler {
            bytes: inner.bytes(),
            sep: sep as u8,
            line_number: 0,
            allow_embedded_newline,
            strict,
            last_line_text: String::new(),
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The raw text accumulated for the line most recently returned or
    /// that triggered a syntax error, for diagnostics that want to show
    /// the offending line.
    pub fn last_line_text(&self) -> &str {
        &self.last_line_text
    }

    /// Consume the remainder of the current physical line (up to and
    /// including its terminator) into `buf`, so a mid-line syntax error
    /// can still report the whole offending line rather than just the
    /// prefix read before the error was detected.
    fn drain_rest_of_line(&mut self, buf: &mut Vec<u8>) {
        loop {
            match self.bytes.next() {
                None | Some(Err(_)) => return,
                Some(Ok(b'\r')) => continue,
                Some(Ok(b'\n')) => {
                    self.line_number += 1;
                    return;
                }
                Some(Ok(b)) => buf.push(b),
            }
        }
    }

    /// Read the next logical line (without its terminator). Returns `Ok(None)`
    /// at true end of stream. A logical line may span several physical lines
    /// when a quoted field contains embedded newlines; the returned line
    /// number is the physical line on which the logical line ended.
    pub fn next_logical_line(&mut self) -> CsvFixResult<Option<(String, usize)>> {
        let mut buf: Vec<u8> = Vec::new();
        let mut state = FieldState::Outside;
        let mut saw_any = false;

        loop {
            match self.bytes.next() {
                None => {
                    if !saw_any {
                        return Ok(None);
                    }
                    self.last_line_text = String::from_utf8_lossy(&buf).into_owned();
                    if state == FieldState::InQuoted {
                        return Err(CsvFixError::logic(
                            "Unexpected end of file inside quoted field",
                        ));
                    }
                    self.line_number += 1;
                    return Ok(Some((self.last_line_text.clone(), self.line_number)));
                }
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(b)) => {
                    saw_any = true;
                    if b == b'\r' {
                        continue;
                    }
                    if b == b'\n' {
                        if state == FieldState::InQuoted {
                            if !self.allow_embedded_newline {
                                self.last_line_text = String::from_utf8_lossy(&buf).into_owned();
                                return Err(CsvFixError::logic(
                                    "Embedded newline in quoted field not allowed",
                                ));
                            }
                            buf.push(b'\n');
                            self.line_number += 1;
                            continue;
                        } else {
                            self.line_number += 1;
                            self.last_line_text = String::from_utf8_lossy(&buf).into_owned();
                            return Ok(Some((self.last_line_text.clone(), self.line_number)));
                        }
                    }

                    buf.push(b);
                    state = match state {
                        FieldState::Outside => {
                            if b == b'"' {
                                FieldState::InQuoted
                            } else if b == self.sep {
                                FieldState::Outside
                            } else {
                                FieldState::InUnquoted
                            }
                        }
                        FieldState::InUnquoted => {
                            if b == self.sep {
                                FieldState::Outside
                            } else if b == b'"' && self.strict {
                                self.drain_rest_of_line(&mut buf);
                                self.last_line_text = String::from_utf8_lossy(&buf).into_owned();
                                return Err(CsvFixError::logic(
                                    "Unexpected quote inside unquoted field",
                                ));
                            } else {
                                FieldState::InUnquoted
                            }
                        }
                        FieldState::InQuoted => {
                            if b == b'"' {
                                FieldState::JustClosedQuote
                            } else {
                                FieldState::InQuoted
                            }
                        }
                        FieldState::JustClosedQuote => {
                            if b == b'"' {
                                FieldState::InQuoted
                            } else if b == self.sep {
                                FieldState::Outside
                            } else if self.strict {
                                self.drain_rest_of_line(&mut buf);
                                self.last_line_text = String::from_utf8_lossy(&buf).into_owned();
                                return Err(CsvFixError::logic(
                                    "Unexpected character after closing quote",
                                ));
                            } else {
                                FieldState::InUnquoted
                            }
                        }
                    };
                }
            }
        }
    }
}
