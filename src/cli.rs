//! Command-line flags. Every flag overrides the matching `userlist.conf` key.

use std::path::PathBuf;

use clap::Parser;

use crate::app::config::Settings;

#[derive(Parser, Debug, Default)]
#[command(name = "userlist-tui", version, about = "Browse, search, edit and delete user records from an HTTP endpoint")]
pub struct Cli {
    /// URL returning a JSON array of {id, name, email, role}.
    #[arg(long, env = "USERLIST_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Rows per page.
    #[arg(long, value_parser = parse_rows)]
    pub rows: Option<usize>,

    /// Settings file to read (created with defaults if missing).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// File receiving log output.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Tracing filter, e.g. `debug` or `userlist_tui=trace`.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Apply the flags that were given on top of file settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(rows) = self.rows {
            settings.row_limit = rows;
        }
        if let Some(level) = &self.log_level {
            settings.log_level = Some(level.clone());
        }
    }
}

fn parse_rows(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a positive integer, got '{s}'")),
    }
}
