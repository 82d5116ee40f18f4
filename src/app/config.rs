//! Settings configuration: parse/write `userlist.conf`.
//!
//! The file uses the same `<key> = <value>` layout as the theme and keybinding
//! files. Comments (`#`) and blank lines are skipped, unknown keys are ignored.

use crate::error::{Context, Error, Result};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/members.json";
pub const DEFAULT_ROW_LIMIT: usize = 10;
pub const DEFAULT_TOAST_SECONDS: u64 = 4;

/// Runtime settings for the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// URL answering a GET with a JSON array of user records.
    pub endpoint: String,
    /// Rows shown per page.
    pub row_limit: usize,
    /// How long a notification stays on screen.
    pub toast_seconds: u64,
    /// Tracing filter directive, e.g. `info` or `userlist_tui=debug`.
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            row_limit: DEFAULT_ROW_LIMIT,
            toast_seconds: DEFAULT_TOAST_SECONDS,
            log_level: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or write defaults there when it does not exist yet.
    ///
    /// Problems (an unreadable file, malformed lines) come back alongside the
    /// settings so the caller can report them once logging is up.
    pub fn load_or_init(path: &str) -> (Self, Vec<Error>) {
        let p = std::path::Path::new(path);
        if p.exists() {
            return match Self::from_file(path) {
                Ok(loaded) => loaded,
                Err(err) => (Self::default(), vec![err]),
            };
        }
        let cfg = Self::default();
        if let Err(err) = cfg.write_file(path) {
            tracing::debug!(path, error = %err, "could not write default settings");
        }
        (cfg, Vec::new())
    }

    pub fn from_file(path: &str) -> Result<(Self, Vec<Error>)> {
        let contents =
            std::fs::read_to_string(path).with_ctx(|| format!("reading {path}"))?;
        Ok(Self::parse(&contents))
    }

    /// Parse settings text. A malformed value keeps the default for that key
    /// and is reported; the remaining lines still apply.
    pub fn parse(contents: &str) -> (Self, Vec<Error>) {
        let mut cfg = Self::default();
        let mut problems = Vec::new();
        for (lineno, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            match key {
                "endpoint" => cfg.endpoint = val.to_string(),
                "row_limit" => match parse_positive(val) {
                    Some(n) => cfg.row_limit = n,
                    None => problems.push(Error::config(format!(
                        "line {}: row_limit must be a positive integer, got '{val}'",
                        lineno + 1
                    ))),
                },
                "toast_seconds" => match val.parse::<u64>().ok().filter(|n| *n > 0) {
                    Some(n) => cfg.toast_seconds = n,
                    None => problems.push(Error::config(format!(
                        "line {}: toast_seconds must be a positive integer, got '{val}'",
                        lineno + 1
                    ))),
                },
                "log_level" => cfg.log_level = Some(val.to_string()),
                other => tracing::debug!(key = other, "ignoring unknown settings key"),
            }
        }
        (cfg, problems)
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-tui settings\n");
        buf.push_str("# endpoint must answer GET with a JSON array of {id, name, email, role}\n\n");
        let _ = writeln!(&mut buf, "endpoint = {}", self.endpoint);
        let _ = writeln!(&mut buf, "row_limit = {}", self.row_limit);
        let _ = writeln!(&mut buf, "toast_seconds = {}", self.toast_seconds);
        match &self.log_level {
            Some(level) => {
                let _ = writeln!(&mut buf, "log_level = {level}");
            }
            None => buf.push_str("# log_level = info\n"),
        }
        std::fs::write(path, buf)
    }
}

fn parse_positive(s: &str) -> Option<usize> {
    s.parse::<usize>().ok().filter(|n| *n > 0)
}
