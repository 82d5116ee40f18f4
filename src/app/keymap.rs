//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only the normal (table) mode goes through the keymap. The search prompt and
//! the inline edit fields read raw characters.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic actions available from the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Show the help modal.
    OpenHelp,
    /// Open the search prompt.
    StartSearch,
    /// Check or uncheck the row under the cursor.
    ToggleSelect,
    /// Drive the header checkbox for the current page.
    ToggleSelectPage,
    /// Open the row for editing, or commit it when already editing.
    ToggleEdit,
    /// Drop the search query and show every record again.
    ClearSearch,
    /// Delete the row under the cursor.
    DeleteRecord,
    /// Delete every checked row.
    DeleteSelected,
    /// Fetch the records again.
    Reload,
    /// Show or hide the keybindings panel.
    ToggleKeybindsPane,
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    /// Bound keys that should do nothing.
    Ignore,
}

/// Mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::SHIFT, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char(' ')), KeyAction::ToggleSelect);
        bindings.insert((M::NONE, Char('a')), KeyAction::ToggleSelectPage);
        bindings.insert((M::NONE, Char('e')), KeyAction::ToggleEdit);
        bindings.insert((M::NONE, Enter), KeyAction::ToggleEdit);
        bindings.insert((M::NONE, Esc), KeyAction::ClearSearch);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteRecord);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteRecord);
        bindings.insert((M::NONE, Char('D')), KeyAction::DeleteSelected);
        bindings.insert((M::SHIFT, Char('D')), KeyAction::DeleteSelected);
        bindings.insert((M::NONE, Char('r')), KeyAction::Reload);
        // Shift+K arrives differently depending on the terminal
        bindings.insert((M::SHIFT, Char('K')), KeyAction::ToggleKeybindsPane);
        bindings.insert((M::NONE, Char('K')), KeyAction::ToggleKeybindsPane);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);
        bindings.insert((M::NONE, Char('g')), KeyAction::FirstPage);
        bindings.insert((M::NONE, Char('G')), KeyAction::LastPage);
        bindings.insert((M::SHIFT, Char('G')), KeyAction::LastPage);

        Self { bindings }
    }

    /// Load a keymap from `path`, or from the standard config locations, or
    /// write the defaults to `path` when nothing exists yet.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::debug!(path, error = %err, "could not write default keybindings");
        }
        km
    }

    /// Read `<Action> = <KeySpec>` lines on top of the defaults.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::warn!(line, "ignoring unrecognised keybinding"),
            }
        }
        map
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-tui keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Space, Up, Down, Left, Right, PageUp, PageDown, Home, End, Delete, /\n\n");

        let dump = [
            ("q", KeyAction::Quit),
            ("?", KeyAction::OpenHelp),
            ("/", KeyAction::StartSearch),
            ("Space", KeyAction::ToggleSelect),
            ("a", KeyAction::ToggleSelectPage),
            ("e", KeyAction::ToggleEdit),
            ("Enter", KeyAction::ToggleEdit),
            ("Esc", KeyAction::ClearSearch),
            ("Delete", KeyAction::DeleteRecord),
            ("d", KeyAction::DeleteRecord),
            ("D", KeyAction::DeleteSelected),
            ("r", KeyAction::Reload),
            ("K", KeyAction::ToggleKeybindsPane),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("Left", KeyAction::PrevPage),
            ("Right", KeyAction::NextPage),
            ("Home", KeyAction::FirstPage),
            ("End", KeyAction::LastPage),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Format a key into a spec like "Ctrl+c", "Space" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Home" => Home,
        "End" => End,
        "Space" => Char(' '),
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let action = match s.trim() {
        "Quit" => KeyAction::Quit,
        "OpenHelp" => KeyAction::OpenHelp,
        "StartSearch" => KeyAction::StartSearch,
        "ToggleSelect" => KeyAction::ToggleSelect,
        "ToggleSelectPage" => KeyAction::ToggleSelectPage,
        "ToggleEdit" => KeyAction::ToggleEdit,
        "ClearSearch" => KeyAction::ClearSearch,
        "DeleteRecord" => KeyAction::DeleteRecord,
        "DeleteSelected" => KeyAction::DeleteSelected,
        "Reload" => KeyAction::Reload,
        "ToggleKeybindsPane" => KeyAction::ToggleKeybindsPane,
        "MoveUp" => KeyAction::MoveUp,
        "MoveDown" => KeyAction::MoveDown,
        "PrevPage" => KeyAction::PrevPage,
        "NextPage" => KeyAction::NextPage,
        "FirstPage" => KeyAction::FirstPage,
        "LastPage" => KeyAction::LastPage,
        "Ignore" => KeyAction::Ignore,
        _ => return None,
    };
    Some(action)
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::ToggleSelect => "ToggleSelect",
        KeyAction::ToggleSelectPage => "ToggleSelectPage",
        KeyAction::ToggleEdit => "ToggleEdit",
        KeyAction::ClearSearch => "ClearSearch",
        KeyAction::DeleteRecord => "DeleteRecord",
        KeyAction::DeleteSelected => "DeleteSelected",
        KeyAction::Reload => "Reload",
        KeyAction::ToggleKeybindsPane => "ToggleKeybindsPane",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextPage => "NextPage",
        KeyAction::FirstPage => "FirstPage",
        KeyAction::LastPage => "LastPage",
        KeyAction::Ignore => "Ignore",
    }
}

/// Human label used by the keybindings panel.
pub fn describe_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "Help",
        KeyAction::StartSearch => "Search",
        KeyAction::ToggleSelect => "Check row",
        KeyAction::ToggleSelectPage => "Check page",
        KeyAction::ToggleEdit => "Edit / save row",
        KeyAction::ClearSearch => "Clear search",
        KeyAction::DeleteRecord => "Delete row",
        KeyAction::DeleteSelected => "Delete checked",
        KeyAction::Reload => "Reload",
        KeyAction::ToggleKeybindsPane => "Toggle keybindings",
        KeyAction::MoveUp => "Move up",
        KeyAction::MoveDown => "Move down",
        KeyAction::PrevPage => "Previous page",
        KeyAction::NextPage => "Next page",
        KeyAction::FirstPage => "First page",
        KeyAction::LastPage => "Last page",
        KeyAction::Ignore => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_core_actions() {
        let km = Keymap::default();
        let key = KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE);
        assert_eq!(km.resolve(&key), Some(KeyAction::StartSearch));
        let key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(km.resolve(&key), Some(KeyAction::ToggleSelect));
    }

    #[test]
    fn parse_overrides_and_adds_bindings() {
        let km = Keymap::parse("Reload = Ctrl+r\nNextPage = n\nnonsense = zz\n");
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(km.resolve(&ctrl_r), Some(KeyAction::Reload));
        let n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(km.resolve(&n), Some(KeyAction::NextPage));
        // defaults remain
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(km.resolve(&q), Some(KeyAction::Quit));
    }

    #[test]
    fn format_key_names_space_and_ctrl() {
        assert_eq!(Keymap::format_key(KeyModifiers::NONE, KeyCode::Char(' ')), "Space");
        assert_eq!(Keymap::format_key(KeyModifiers::CONTROL, KeyCode::Char('c')), "Ctrl+c");
    }
}
