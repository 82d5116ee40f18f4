use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{AppState, InputMode};
use crate::records::{EditField, UserRecord};

pub fn render_records_table(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let rows_on_page = app.page_rows();
    if app.loading || rows_on_page.is_empty() {
        let msg = empty_message(app);
        let p = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let focused = match app.input_mode {
        InputMode::Edit { id, field } => Some((id, field)),
        _ => None,
    };

    let rows = rows_on_page.iter().enumerate().map(|(i, record)| {
        let checked = app.selection.contains(record.id);
        let draft = app.edits.draft(record.id);
        let shown: &UserRecord = draft.unwrap_or(record);

        let field_cell = |field: EditField| {
            let mut text = shown.field(field).to_string();
            if focused == Some((record.id, field)) {
                text.push('▏');
                return Cell::from(text).style(
                    Style::default()
                        .fg(app.theme.editing_fg)
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
                );
            }
            if draft.is_some() {
                return Cell::from(text).style(Style::default().fg(app.theme.editing_fg));
            }
            Cell::from(text)
        };

        let action = if draft.is_some() { "[save]" } else { "[edit]" };
        let mut style = Style::default().fg(app.theme.text);
        if checked {
            style = style.bg(app.theme.checked_bg);
        }
        if i == app.cursor {
            style = style
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD);
        }
        Row::new(vec![
            Cell::from(if checked { "[x]" } else { "[ ]" }),
            Cell::from(record.id.to_string()),
            field_cell(EditField::Name),
            field_cell(EditField::Email),
            field_cell(EditField::Role),
            Cell::from(action),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(15),
        Constraint::Length(7),
    ];

    let header = Row::new(vec![
        app.header_check().glyph(),
        "ID",
        "NAME",
        "EMAIL",
        "ROLE",
        "ACTION",
    ])
    .style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    // offset is recomputed from the cursor every frame
    let mut state = TableState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn empty_message(app: &AppState) -> String {
    if app.loading {
        return "Loading users...".to_string();
    }
    let total = app.active_view().len();
    if total > 0 && app.page.is_past_end(total) {
        return format!(
            "Page {} is empty. Press Left or Home to go back.",
            app.page.current_page
        );
    }
    if app.is_searching() {
        format!("No users match '{}'", app.search_query)
    } else {
        "No users".to_string()
    }
}
