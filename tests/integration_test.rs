// Integration tests for userlist-tui

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use userlist_tui::app::update::{Flow, handle_key};
use userlist_tui::app::{AppState, InputMode, Severity, Theme};
use userlist_tui::app::config::Settings;
use userlist_tui::app::keymap::Keymap;
use userlist_tui::error::{Error, Result};
use userlist_tui::records::{EditField, UserRecord};
use userlist_tui::selection::HeaderCheck;
use userlist_tui::source::{HttpSource, RecordSource};

struct Fixed(Vec<UserRecord>);

impl RecordSource for Fixed {
    fn fetch(&self) -> Result<Vec<UserRecord>> {
        Ok(self.0.clone())
    }
    fn describe(&self) -> String {
        "fixed".into()
    }
}

struct Broken;

impl RecordSource for Broken {
    fn fetch(&self) -> Result<Vec<UserRecord>> {
        Err(Error::Status {
            url: "http://broken/".into(),
            status: 503,
        })
    }
    fn describe(&self) -> String {
        "http://broken/".into()
    }
}

fn people(n: u64) -> Vec<UserRecord> {
    (1..=n)
        .map(|i| {
            let role = if i % 5 == 0 { "admin" } else { "member" };
            UserRecord::new(i, format!("User {i}"), format!("user{i}@mail.com"), role)
        })
        .collect()
}

fn fresh_app(rows: usize) -> AppState {
    let settings = Settings {
        row_limit: rows,
        ..Settings::default()
    };
    AppState::new(settings, Theme::mocha(), Keymap::default())
}

fn press(app: &mut AppState, code: KeyCode) -> Flow {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
}

fn screen_of(app: &AppState, width: u16, height: u16) -> String {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|f| userlist_tui::ui::render(f, app))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

/// Serve exactly one HTTP response on a loopback port and return its URL.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let mut seen = Vec::new();
        while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
        }
        let resp = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(resp.as_bytes()).unwrap();
    });
    format!("http://{addr}/members.json")
}

// 1) Load, search, clear: page count and current page follow the view
#[test]
fn search_resets_paging_and_clearing_restores_it() {
    let mut app = fresh_app(10);
    app.load(&Fixed(people(25))).unwrap();
    assert_eq!(app.page_count(), 3);

    app.next_page();
    app.next_page();
    assert_eq!(app.page.current_page, 3);

    // ids 5, 10, 15, 20 are admins
    app.set_search_query("admin");
    assert_eq!(app.active_view().len(), 4);
    assert_eq!(app.page_count(), 1);
    assert_eq!(app.page.current_page, 1);

    app.next_page();
    app.clear_search();
    assert_eq!(app.page_count(), 3);
    assert_eq!(app.page.current_page, 1);
    assert_eq!(app.active_view().len(), 25);
}

// 2) A failing source leaves an empty table and a visible error
#[test]
fn failed_load_empties_store_and_notifies() {
    let mut app = AppState::with_records(people(3), 10);
    app.selection.toggle(2);
    let err = app.load(&Broken).unwrap_err();
    assert!(matches!(err, Error::Status { status: 503, .. }));
    assert!(app.store.is_empty());
    assert!(app.selection.is_empty());
    assert_eq!(app.page_count(), 1);
    assert_eq!(app.notices.len(), 1);
    assert_eq!(app.notices[0].severity, Severity::Error);
}

// 3) Checked rows survive page changes; header tracks the visible page
#[test]
fn selection_persists_across_pages() {
    let mut app = AppState::with_records(people(25), 10);
    app.toggle_select(3);
    assert_eq!(app.header_check(), HeaderCheck::Indeterminate);
    app.next_page();
    assert_eq!(app.header_check(), HeaderCheck::Unchecked);
    app.toggle_select_page();
    assert_eq!(app.header_check(), HeaderCheck::Checked);
    app.prev_page();
    assert!(app.selection.contains(3));
    assert_eq!(app.selection.len(), 11);

    app.next_page();
    app.toggle_select_page();
    assert_eq!(app.selection.len(), 1);
}

// 4) Deleting a record removes it from store, filtered view and selection
#[test]
fn delete_is_consistent_across_views() {
    let mut app = AppState::with_records(people(10), 10);
    app.set_search_query("user7|user8");
    app.toggle_select(7);
    assert!(app.delete_record(7));
    assert!(!app.store.contains(7));
    assert!(app.active_view().iter().all(|r| r.id != 7));
    assert!(!app.selection.contains(7));
    assert_eq!(app.notices.last().unwrap().severity, Severity::Error);

    app.clear_search();
    app.toggle_select(8);
    app.toggle_select(9);
    app.selection.toggle(7);
    assert_eq!(app.delete_selected(), 2);
    assert!(app.selection.is_empty());
    assert_eq!(app.store.len(), 7);
}

// 5) Edit, commit, and the identifier stays put
#[test]
fn edit_commit_updates_store_only_on_save() {
    let mut app = AppState::with_records(
        vec![UserRecord::new(5, "A", "a@mail.com", "member")],
        10,
    );
    app.toggle_edit(5);
    assert!(app.edits.is_editing(5));
    app.edit_pop_char();
    app.edit_push_char('B');
    assert_eq!(app.store.get(5).unwrap().name, "A");
    app.toggle_edit(5);
    let rec = app.store.get(5).unwrap();
    assert_eq!(rec.id, 5);
    assert_eq!(rec.name, "B");
    assert!(!app.edits.is_editing(5));
    assert_eq!(app.notices.last().unwrap().severity, Severity::Warning);
}

// 6) Keyboard flow: select with Space, delete checked with D, quit with q
#[test]
fn keyboard_drives_selection_and_bulk_delete() {
    let src = Fixed(people(4));
    let mut app = fresh_app(10);
    app.load(&src).unwrap();

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.selection.len(), 2);
    press(&mut app, KeyCode::Char('D'));
    assert_eq!(app.store.len(), 2);
    assert!(app.selection.is_empty());

    press(&mut app, KeyCode::Char('e'));
    assert!(matches!(app.input_mode, InputMode::Edit { .. }));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.edits.is_empty());

    assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
}

// 7) HTTP source against a loopback server
#[test]
fn http_source_fetches_json_array() {
    let url = serve_once(
        "200 OK",
        r#"[{"id":1,"name":"Aaron Miles","email":"aaron@mail.com","role":"member"},{"id":2,"name":"Arvind","email":"arvind@mail.com","role":"admin"}]"#,
    );
    let source = HttpSource::new(url.clone()).unwrap();
    assert_eq!(source.describe(), url);
    let records = source.fetch().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].role, "admin");
}

#[test]
fn http_source_reports_bad_status() {
    let url = serve_once("500 Internal Server Error", "oops");
    let source = HttpSource::new(url).unwrap();
    let err = source.fetch().unwrap_err();
    assert!(matches!(err, Error::Status { status: 500, .. }));
}

// 8) Rendering with a test backend shows rows, header and pager
#[test]
fn render_shows_table_and_pager() {
    let mut app = AppState::with_records(people(25), 10);
    app.toggle_select(1);
    let screen = screen_of(&app, 120, 30);
    assert!(screen.contains("page 1 / 3"));
    assert!(screen.contains("User 10"));
    assert!(!screen.contains("User 11"));
    assert!(screen.contains("[-]"));
    assert!(screen.contains("DELETE SELECTED (1)"));
}

// 9) A page taller than the screen scrolls to keep the cursor row visible
#[test]
fn cursor_row_stays_on_screen_when_page_overflows() {
    let mut app = AppState::with_records(people(25), 20);
    for _ in 0..19 {
        app.move_down();
    }
    assert_eq!(app.cursor_record().unwrap().id, 20);
    let screen = screen_of(&app, 120, 24);
    assert!(screen.contains("User 20"));
    assert!(!screen.contains("User 4 "));
}

// 10) Committing an edit during a search re-runs the filter
#[test]
fn commit_during_search_refilters_view() {
    let mut app = AppState::with_records(people(10), 10);
    app.set_search_query("admin");
    let ids: Vec<_> = app.active_view().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5, 10]);

    assert!(app.open_edit(5));
    app.edit_next_field();
    app.edit_next_field();
    for _ in 0.."admin".len() {
        app.edit_pop_char();
    }
    for c in "member".chars() {
        app.edit_push_char(c);
    }
    assert!(app.commit_edit(5));
    let ids: Vec<_> = app.active_view().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![10]);
    assert_eq!(app.store.get(5).unwrap().role, "member");
}

// 11) Deleting the only row of the last page leaves a past-end page you can leave
#[test]
fn deleting_last_row_of_last_page_allows_going_back() {
    let mut app = AppState::with_records(people(21), 10);
    app.last_page();
    assert_eq!(app.page.current_page, 3);
    assert!(app.delete_cursor());
    assert_eq!(app.page_count(), 2);
    assert_eq!(app.page.current_page, 3);
    assert!(app.page_rows().is_empty());
    assert!(screen_of(&app, 120, 30).contains("Page 3 is empty"));

    app.prev_page();
    assert_eq!(app.page.current_page, 2);
    assert_eq!(app.page_rows().len(), 10);
}

// 12) Several rows can hold drafts at once; each commits on its own
#[test]
fn drafts_for_several_rows_coexist() {
    let mut app = AppState::with_records(people(3), 10);
    assert!(app.open_edit(1));
    app.edit_push_char('!');
    assert!(app.open_edit(2));
    app.edit_push_char('?');
    assert_eq!(app.edits.len(), 2);
    assert_eq!(
        app.input_mode,
        InputMode::Edit {
            id: 2,
            field: EditField::Name
        }
    );

    assert!(app.commit_edit(2));
    assert_eq!(app.store.get(2).unwrap().name, "User 2?");
    assert_eq!(app.store.get(1).unwrap().name, "User 1");
    app.toggle_edit(1);
    assert_eq!(app.store.get(1).unwrap().name, "User 1!");
    assert!(app.edits.is_empty());
}
