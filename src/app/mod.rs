//! Application state types and entry glue.
//!
//! [`AppState`] owns every piece of mutable state (record store, search query,
//! page window, selection, edit drafts, notifications) and exposes one method
//! per user intent. The event loop in [`update`] translates keys into those
//! intents; the renderer in `ui` only reads.
//!
pub mod config;
pub mod keymap;
pub mod update;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::style::Color;

use crate::edit::EditBuffer;
use crate::error::Result;
use crate::pagination::PageWindow;
use crate::records::{EditField, RecordId, RecordStore, UserRecord};
use crate::search::{self, SearchPattern};
use crate::selection::{HeaderCheck, SelectionSet};
use crate::source::RecordSource;

use config::Settings;
use keymap::Keymap;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search prompt.
    Search,
    /// Typing into one field of a row that is being edited.
    Edit { id: RecordId, field: EditField },
    Modal,
}

/// Modal dialogs drawn over the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Help { scroll: u16 },
}

/// Severity tag of a notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A short-lived message shown in the corner of the screen.
#[derive(Clone, Debug)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub created_at: Instant,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub checked_bg: Color,
    pub editing_fg: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            checked_bg: Color::Rgb(0x31, 0x32, 0x44),   // surface0
            editing_fg: Color::Rgb(0xa6, 0xe3, 0xa1),   // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
            warning: Color::Rgb(0xfa, 0xb3, 0x87),      // peach
            info: Color::Rgb(0x89, 0xdc, 0xeb),         // sky
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            let Some(color) = Self::parse_color(val) else {
                tracing::warn!(key, value = val, "ignoring unparsable theme color");
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "checked_bg" => theme.checked_bg = color,
                "editing_fg" => theme.editing_fg = color,
                "error" => theme.error = color,
                "warning" => theme.warning = color,
                "info" => theme.info = color,
                _ => {}
            }
        }
        theme
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-tui theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::White => "#FFFFFF".to_string(),
                // anything else has no faithful hex form
                _ => "reset".to_string(),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("checked_bg", self.checked_bg);
        kv("editing_fg", self.editing_fg);
        kv("error", self.error);
        kv("warning", self.warning);
        kv("info", self.info);

        std::fs::write(path, buf)
    }

    /// Load `path` if present, else the config dirs, else write `mocha` to `path`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(err) = t.write_file(path) {
            tracing::debug!(path, error = %err, "could not write default theme");
        }
        t
    }
}

/// Per-user configuration directory: `$XDG_CONFIG_HOME/userlist-tui` or `~/.config/userlist-tui`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join("userlist-tui"));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join("userlist-tui"))
}

/// Path of an existing config file named `name` in the config directory.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let candidate = config_dir()?.join(name);
    candidate
        .is_file()
        .then(|| candidate.to_string_lossy().into_owned())
}

/// Where to write a config file named `name`; falls back to the working directory.
pub fn config_file_write_path(name: &str) -> String {
    match config_dir() {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            dir.join(name).to_string_lossy().into_owned()
        }
        _ => name.to_string(),
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub settings: Settings,
    pub store: RecordStore,
    /// Filtered view; meaningful only while `search_query` is non-empty.
    pub found: Vec<UserRecord>,
    pub search_query: String,
    /// The query did not compile as a regex and is matched literally.
    pub search_literal: bool,
    pub page: PageWindow,
    /// Row index of the cursor within the current page.
    pub cursor: usize,
    pub selection: SelectionSet,
    pub edits: EditBuffer,
    pub notices: Vec<Notice>,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub show_keybinds: bool,
    /// Endpoint (or other origin) shown in the title bar.
    pub source_label: String,
    pub loading: bool,
}

impl AppState {
    pub fn new(settings: Settings, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            page: PageWindow::new(settings.row_limit),
            source_label: settings.endpoint.clone(),
            settings,
            store: RecordStore::default(),
            found: Vec::new(),
            search_query: String::new(),
            search_literal: false,
            cursor: 0,
            selection: SelectionSet::new(),
            edits: EditBuffer::new(),
            notices: Vec::new(),
            input_mode: InputMode::Normal,
            modal: None,
            theme,
            keymap,
            show_keybinds: false,
            loading: false,
        }
    }

    /// State preloaded with `records`, default theme and keymap.
    pub fn with_records(records: Vec<UserRecord>, row_limit: usize) -> Self {
        let settings = Settings {
            row_limit,
            ..Settings::default()
        };
        let mut app = Self::new(settings, Theme::mocha(), Keymap::default());
        app.store.replace_all(records);
        app
    }

    /// Fetch every record from `source`, replacing the store.
    ///
    /// On failure the store is emptied, the error is logged and shown as a
    /// notification, and then returned. Selection and drafts never survive a load.
    pub fn load(&mut self, source: &dyn RecordSource) -> Result<usize> {
        self.source_label = source.describe();
        let outcome = source.fetch();
        self.loading = false;
        self.selection.clear();
        self.edits.clear();
        if matches!(self.input_mode, InputMode::Edit { .. }) {
            self.input_mode = InputMode::Normal;
        }
        let result = match outcome {
            Ok(records) => {
                tracing::info!(count = records.len(), source = %self.source_label, "loaded user records");
                let count = records.len();
                self.store.replace_all(records);
                Ok(count)
            }
            Err(err) => {
                tracing::error!(error = %err, source = %self.source_label, "loading user records failed");
                self.store.clear();
                self.notify(Severity::Error, format!("Could not load users: {err}"));
                Err(err)
            }
        };
        self.refilter();
        self.page.reset();
        self.cursor = 0;
        result
    }

    pub fn is_searching(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// Full store, or the filtered view while a query is active.
    pub fn active_view(&self) -> &[UserRecord] {
        if self.is_searching() {
            &self.found
        } else {
            self.store.records()
        }
    }

    pub fn page_rows(&self) -> &[UserRecord] {
        self.page.slice(self.active_view())
    }

    pub fn page_ids(&self) -> Vec<RecordId> {
        self.page_rows().iter().map(|r| r.id).collect()
    }

    pub fn page_count(&self) -> usize {
        self.page.page_count(self.active_view().len())
    }

    pub fn cursor_record(&self) -> Option<&UserRecord> {
        self.page_rows().get(self.cursor)
    }

    pub fn header_check(&self) -> HeaderCheck {
        self.selection.header_state(&self.page_ids())
    }

    // ---- search ----

    /// Replace the query; the active view changes so paging starts over.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.search_query {
            return;
        }
        self.search_query = query;
        self.refilter();
        self.page.reset();
        self.cursor = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut q = self.search_query.clone();
        q.push(c);
        self.set_search_query(q);
    }

    pub fn pop_search_char(&mut self) {
        let mut q = self.search_query.clone();
        q.pop();
        self.set_search_query(q);
    }

    pub fn clear_search(&mut self) {
        self.set_search_query(String::new());
    }

    /// Recompute the filtered view from the store. Keeps the current page.
    pub fn refilter(&mut self) {
        if self.search_query.is_empty() {
            self.found.clear();
            self.search_literal = false;
        } else {
            let pattern = SearchPattern::compile(&self.search_query);
            self.search_literal = pattern.is_literal();
            self.found = search::filter_with(&pattern, self.store.records());
        }
        self.clamp_cursor();
    }

    // ---- paging and cursor ----

    pub fn next_page(&mut self) {
        let total = self.active_view().len();
        self.page.next(total);
        self.cursor = 0;
    }

    pub fn prev_page(&mut self) {
        let total = self.active_view().len();
        self.page.prev(total);
        self.cursor = 0;
    }

    pub fn first_page(&mut self) {
        self.page.first();
        self.cursor = 0;
    }

    pub fn last_page(&mut self) {
        let total = self.active_view().len();
        self.page.last(total);
        self.cursor = 0;
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.page_rows().len() {
            self.cursor += 1;
        }
    }

    fn clamp_cursor(&mut self) {
        let rows = self.page_rows().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    // ---- selection ----

    pub fn toggle_select(&mut self, id: RecordId) {
        self.selection.toggle(id);
    }

    pub fn toggle_select_cursor(&mut self) {
        if let Some(id) = self.cursor_record().map(|r| r.id) {
            self.toggle_select(id);
        }
    }

    /// Header checkbox click: fill the page unless it is already fully checked.
    pub fn toggle_select_page(&mut self) {
        let ids = self.page_ids();
        let checked = self.selection.header_state(&ids) != HeaderCheck::Checked;
        self.selection.select_page(&ids, checked);
    }

    // ---- deletion ----

    /// Delete one record everywhere it is referenced. Returns whether it existed.
    pub fn delete_record(&mut self, id: RecordId) -> bool {
        let removed = self.store.delete(id);
        self.selection.remove(id);
        self.edits.discard(id);
        if matches!(self.input_mode, InputMode::Edit { id: editing, .. } if editing == id) {
            self.input_mode = InputMode::Normal;
        }
        self.refilter();
        if removed {
            tracing::debug!(id, "deleted user record");
            self.notify(
                Severity::Error,
                format!("User record with id={id} has been deleted"),
            );
        }
        removed
    }

    pub fn delete_cursor(&mut self) -> bool {
        match self.cursor_record().map(|r| r.id) {
            Some(id) => self.delete_record(id),
            None => false,
        }
    }

    /// Delete every checked record, report how many existed, and clear the selection.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            self.notify(Severity::Info, "No rows are checked");
            return 0;
        }
        let ids = self.selection.ids().clone();
        let removed = self.store.delete_many(&ids);
        for id in &ids {
            self.edits.discard(*id);
        }
        if let InputMode::Edit { id, .. } = self.input_mode
            && ids.contains(&id)
        {
            self.input_mode = InputMode::Normal;
        }
        self.selection.clear();
        self.refilter();
        tracing::debug!(requested = ids.len(), removed, "deleted checked user records");
        self.notify(
            Severity::Error,
            format!("{removed} user records have been deleted"),
        );
        removed
    }

    // ---- inline edit ----

    /// The single edit control: open the row, or commit it if already open.
    pub fn toggle_edit(&mut self, id: RecordId) {
        if self.edits.is_editing(id) {
            self.commit_edit(id);
        } else {
            self.open_edit(id);
        }
    }

    pub fn toggle_edit_cursor(&mut self) {
        if let Some(id) = self.cursor_record().map(|r| r.id) {
            self.toggle_edit(id);
        }
    }

    /// Snapshot the record into the edit buffer and focus its first field.
    pub fn open_edit(&mut self, id: RecordId) -> bool {
        let Some(record) = self.store.get(id) else {
            return false;
        };
        self.edits.open(record);
        self.input_mode = InputMode::Edit {
            id,
            field: EditField::Name,
        };
        tracing::debug!(id, "editing user record");
        true
    }

    /// Write the draft back into the store. The draft is gone afterwards either way.
    pub fn commit_edit(&mut self, id: RecordId) -> bool {
        let draft = self.edits.take(id);
        if matches!(self.input_mode, InputMode::Edit { id: editing, .. } if editing == id) {
            self.input_mode = InputMode::Normal;
        }
        let applied = draft.is_some_and(|d| self.store.commit_edit(id, &d));
        self.refilter();
        if applied {
            self.notify(
                Severity::Warning,
                format!("User record with id={id} has been updated"),
            );
        } else {
            tracing::debug!(id, "nothing to commit for user record");
        }
        applied
    }

    /// Drop the draft without touching the store.
    pub fn cancel_edit(&mut self, id: RecordId) -> bool {
        let discarded = self.edits.discard(id);
        if matches!(self.input_mode, InputMode::Edit { id: editing, .. } if editing == id) {
            self.input_mode = InputMode::Normal;
        }
        if discarded {
            self.notify(Severity::Info, format!("Changes to id={id} discarded"));
        }
        discarded
    }

    pub fn edit_push_char(&mut self, c: char) {
        if let InputMode::Edit { id, field } = self.input_mode {
            self.edits.push_char(id, field, c);
        }
    }

    pub fn edit_pop_char(&mut self) {
        if let InputMode::Edit { id, field } = self.input_mode {
            self.edits.pop_char(id, field);
        }
    }

    pub fn edit_next_field(&mut self) {
        if let InputMode::Edit { id, field } = self.input_mode {
            self.input_mode = InputMode::Edit {
                id,
                field: field.next(),
            };
        }
    }

    pub fn edit_prev_field(&mut self) {
        if let InputMode::Edit { id, field } = self.input_mode {
            self.input_mode = InputMode::Edit {
                id,
                field: field.prev(),
            };
        }
    }

    // ---- notifications ----

    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notices.push(Notice {
            severity,
            message: message.into(),
            created_at: Instant::now(),
        });
    }

    /// Drop notifications older than the configured lifetime.
    pub fn expire_notices(&mut self, now: Instant) {
        let ttl = Duration::from_secs(self.settings.toast_seconds);
        self.notices
            .retain(|n| now.saturating_duration_since(n.created_at) < ttl);
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
