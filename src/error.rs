//! Uniform error taxonomy for CSVfix.
//!
//! Every fallible operation in the crate returns `Result<T, CsvFixError>`.
//! `main` holds the single top-level handler that prints `ERROR: <message>`
//! to stderr and maps any error to a non-zero exit status.

use std::fmt;
use thiserror::Error;

/// A source position attached to a parse or I/O diagnostic.
#[derive(Debug, Clone)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// The full error taxonomy from the error handling design: configuration,
/// dispatch, CSV parse, date/number parse, I/O, validation and logic errors
/// all propagate through this type to the top-level handler.
#[derive(Debug, Error)]
pub enum CsvFixError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Dispatch(String),

    #[error("{loc}: {message}")]
    CsvParse { loc: Location, message: String, line_text: String },

    #[error("{0}")]
    DateOrNumberParse(String),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Logic(String),
}

impl CsvFixError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CsvFixError::Config(msg.into())
    }

    pub fn dispatch<S: Into<String>>(msg: S) -> Self {
        CsvFixError::Dispatch(msg.into())
    }

    pub fn csv_parse<S: Into<String>, T: Into<String>>(file: &str, line: usize, msg: S, line_text: T) -> Self {
        CsvFixError::CsvParse {
            loc: Location { file: file.to_string(), line },
            message: msg.into(),
            line_text: line_text.into(),
        }
    }

    pub fn logic<S: Into<String>>(msg: S) -> Self {
        CsvFixError::Logic(msg.into())
    }

    /// The offending line's raw text, when this is a `CsvParse` error.
    pub fn line_text(&self) -> Option<&str> {
        match self {
            CsvFixError::CsvParse { line_text, .. } => Some(line_text),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CsvFixError {
    fn from(e: std::io::Error) -> Self {
        CsvFixError::Io(e.to_string())
    }
}

pub type CsvFixResult<T> = Result<T, CsvFixError>;

/// Print the uniform diagnostic and return the process exit status, following
/// the three-way split in the original exception handler: our own error
/// type, any other `std::error::Error`-shaped failure, and anything else.
pub fn report_and_exit_code(err: &CsvFixError) -> i32 {
    eprintln!("ERROR: {}", err);
    1
}
