pub mod components;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    render_title_bar(f, root[0], app);

    let table_area = if app.show_keybinds {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(44)].as_ref())
            .split(root[1]);
        components::render_keybinds_panel(f, body[1], app);
        body[0]
    } else {
        root[1]
    };

    table::render_records_table(f, table_area, app);
    components::render_action_bar(f, root[2], app);
    components::render_status_bar(f, root[3], app);
    components::render_notices(f, root[1], app);

    if let Some(modal) = &app.modal {
        render_modal(f, f.area(), app, modal);
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let prompt = match app.input_mode {
        InputMode::Search => format!("Search: {}▏", app.search_query),
        _ if app.is_searching() => format!("Search: {}", app.search_query),
        _ => "Press / to search".to_string(),
    };
    let literal = if app.search_literal { "  (literal match)" } else { "" };
    let p = Paragraph::new(format!("{prompt}{literal}"))
        .block(
            Block::default()
                .title(format!("userlist-tui  {}", app.source_label))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}
