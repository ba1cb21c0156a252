//! Diagnostic logging (A2): opt-in, timestamped tracing to stderr for
//! stream-open events, config file resolution, and alias expansion. A
//! named logger prints `tool: message (timestamp)` to stderr, by
//! convention bound to a variable named `log`. Unlike an always-on
//! logger, this one stays silent unless the user opts in with
//! `CSVFIX_DEBUG=1`, since csvfix's stderr is otherwise reserved for the
//! uniform `ERROR: ` contract and `check`'s diagnostic output.

use chrono::Local;

pub struct Log {
    tool: String,
    enabled: bool,
}

impl Log {
    /// Create a new Log instance for a given tool. By convention, Log
    /// objects are named `log`.
    pub fn new(tool: &str) -> Self {
        Log {
            tool: tool.to_string(),
            enabled: std::env::var("CSVFIX_DEBUG").map(|v| v != "0" && !v.is_empty()).unwrap_or(false),
        }
    }

    /// Print a time-stamped message to stderr, if diagnostic logging is
    /// enabled; a silent no-op otherwise.
    pub fn print(&self, msg: &str) {
        if self.enabled {
            eprintln!("{}: {} ({})", self.tool, msg, Local::now().to_rfc3339());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        std::env::remove_var("CSVFIX_DEBUG");
        let log = Log::new("csvfix");
        assert!(!log.enabled);
    }
}
