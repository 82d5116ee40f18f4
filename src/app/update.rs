use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::records::RecordId;
use crate::source::RecordSource;
use crate::ui;

/// What the loop should do after a key was handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Fetch the records again; the loop draws the loading frame first.
    Reload,
    Quit,
}

/// Load the records, then draw and handle keys until the user quits.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    source: &dyn RecordSource,
) -> Result<()> {
    reload(terminal, app, source)?;

    loop {
        app.expire_notices(Instant::now());
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(app, key) {
                Flow::Quit => break,
                Flow::Reload => reload(terminal, app, source)?,
                Flow::Continue => {}
            }
        }
    }

    tracing::info!(uptime_secs = app.started_at.elapsed().as_secs(), "exiting");
    Ok(())
}

/// Draw the loading frame, then fetch synchronously.
pub fn reload<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    source: &dyn RecordSource,
) -> Result<()> {
    app.loading = true;
    terminal.draw(|f| ui::render(f, app))?;
    // failures are already logged and shown as a notification
    app.load(source).ok();
    Ok(())
}

/// Route one key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Edit { id, .. } => handle_edit_key(app, key, id),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::ClearSearch => app.clear_search(),
        KeyAction::ToggleSelect => app.toggle_select_cursor(),
        KeyAction::ToggleSelectPage => app.toggle_select_page(),
        KeyAction::ToggleEdit => app.toggle_edit_cursor(),
        KeyAction::DeleteRecord => {
            app.delete_cursor();
        }
        KeyAction::DeleteSelected => {
            app.delete_selected();
        }
        KeyAction::Reload => return Flow::Reload,
        KeyAction::ToggleKeybindsPane => app.show_keybinds = !app.show_keybinds,
        KeyAction::MoveUp => app.move_up(),
        KeyAction::MoveDown => app.move_down(),
        KeyAction::PrevPage => app.prev_page(),
        KeyAction::NextPage => app.next_page(),
        KeyAction::FirstPage => app.first_page(),
        KeyAction::LastPage => app.last_page(),
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_search_char(c)
        }
        _ => {}
    }
}

fn handle_edit_key(app: &mut AppState, key: KeyEvent, id: RecordId) {
    match key.code {
        KeyCode::Enter => {
            app.commit_edit(id);
        }
        KeyCode::Esc => {
            app.cancel_edit(id);
        }
        KeyCode::Tab => app.edit_next_field(),
        KeyCode::BackTab => app.edit_prev_field(),
        KeyCode::Backspace => app.edit_pop_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.edit_push_char(c)
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                app.modal = None;
                app.input_mode = InputMode::Normal;
            }
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as CrateResult;
    use crate::records::UserRecord;
    use ratatui::backend::TestBackend;

    struct Fixed(Vec<UserRecord>);

    impl RecordSource for Fixed {
        fn fetch(&self) -> CrateResult<Vec<UserRecord>> {
            Ok(self.0.clone())
        }
        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    fn press(app: &mut AppState, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn sample() -> Vec<UserRecord> {
        vec![
            UserRecord::new(1, "Ann", "ann@example.com", "admin"),
            UserRecord::new(2, "Ben", "ben@example.com", "member"),
        ]
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn search_prompt_filters_live_and_escape_clears() {
        let mut app = AppState::with_records(sample(), 10);
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.active_view().len(), 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.active_view().len(), 2);
    }

    #[test]
    fn edit_keys_type_into_focused_field_and_commit() {
        let mut app = AppState::with_records(sample(), 10);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        for _ in 0..5 {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "owner".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.store.get(1).unwrap().role, "admin");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.get(1).unwrap().role, "owner");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn reload_key_draws_loading_frame_then_replaces_store() {
        let src = Fixed(sample());
        let mut app = AppState::with_records(vec![UserRecord::new(9, "Xavier", "x@y", "z")], 10);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.selection.contains(9));
        assert_eq!(press(&mut app, KeyCode::Char('r')), Flow::Reload);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        reload(&mut terminal, &mut app, &src).unwrap();
        // the buffer still holds the frame drawn before the fetch
        let shown = screen(&terminal);
        assert!(shown.contains("Loading users..."));
        assert!(!shown.contains("Xavier"));

        assert!(!app.loading);
        assert_eq!(app.store.len(), 2);
        assert!(app.selection.is_empty());
    }

    #[test]
    fn help_modal_opens_and_closes() {
        let mut app = AppState::with_records(vec![], 10);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, InputMode::Modal);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.modal, Some(ModalState::Help { scroll: 1 }));
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }
}
