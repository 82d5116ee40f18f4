//! Shared UI components (status bar, action bar, notifications, modals).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::keymap::{KeyAction, Keymap, describe_action};
use crate::app::{AppState, InputMode, Severity};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL".to_string(),
        InputMode::Search => "SEARCH".to_string(),
        InputMode::Edit { id, field } => format!("EDIT id={id} {}", field.label()),
        InputMode::Modal => "MODAL".to_string(),
    };
    let hint = match app.input_mode {
        InputMode::Search => "Enter: keep  Esc: clear",
        InputMode::Edit { .. } => "Tab: next field  Enter: save  Esc: discard",
        _ => "?: help  K: keys  q: quit",
    };
    let msg = format!(
        "mode: {mode}  users:{}  shown:{}  rows/page:{}  {hint}",
        app.store.len(),
        app.active_view().len(),
        app.page.row_limit,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the delete-selected control and the pagination indicator.
pub fn render_action_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let delete_style = if app.selection.is_empty() {
        Style::default().fg(app.theme.muted)
    } else {
        Style::default()
            .fg(app.theme.error)
            .add_modifier(Modifier::BOLD)
    };
    let total = app.active_view().len();
    let page_style = if app.page.is_past_end(total) {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default().fg(app.theme.text)
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" DELETE SELECTED ({}) ", app.selection.len()),
            delete_style,
        ),
        Span::raw("   "),
        Span::styled(
            format!(
                "« ‹ page {} / {} › »",
                app.page.current_page,
                app.page_count()
            ),
            page_style,
        ),
        Span::styled(
            format!("   {total} rows"),
            Style::default().fg(app.theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Stack the live notifications in the lower right corner of `area`.
pub fn render_notices(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 48u16.min(area.width.saturating_sub(2));
    if width < 10 {
        return;
    }
    let mut bottom = area.y + area.height.saturating_sub(1);
    for notice in app.notices.iter().rev() {
        let height = 3u16;
        if bottom < area.y + height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: bottom - height,
            width,
            height,
        };
        let (title, color) = match notice.severity {
            Severity::Error => ("error", app.theme.error),
            Severity::Warning => ("warning", app.theme.warning),
            Severity::Info => ("info", app.theme.info),
        };
        let p = Paragraph::new(notice.message.clone())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        bottom -= height;
    }
}

/// Render the right-side keybinds viewer grouped by section.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let mut rows: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut navigation: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

    for ((mods, code), action) in app.keymap.all_bindings() {
        let key = Keymap::format_key(mods, code);
        let label = describe_action(action);
        match action {
            KeyAction::MoveUp
            | KeyAction::MoveDown
            | KeyAction::PrevPage
            | KeyAction::NextPage
            | KeyAction::FirstPage
            | KeyAction::LastPage => {
                navigation.entry(label).or_default().insert(key);
            }
            KeyAction::Ignore => {}
            _ => {
                rows.entry(label).or_default().insert(key);
            }
        }
    }

    let label_w = rows
        .keys()
        .chain(navigation.keys())
        .map(|k| k.len())
        .max()
        .unwrap_or(0)
        .min((inner.width as usize).saturating_sub(8));

    let mut lines: Vec<Line<'static>> = Vec::new();
    push_section(&mut lines, "Table:", &rows, label_w);
    lines.push(Line::raw(""));
    push_section(&mut lines, "Navigation:", &navigation, label_w);
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "While editing:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, value) in [
        ("Next / prev field", "Tab, Shift+Tab"),
        ("Save row", "Enter"),
        ("Discard changes", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label} │ ")),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

fn push_section(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    map: &BTreeMap<&'static str, BTreeSet<String>>,
    label_w: usize,
) {
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, keys) in map {
        let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
        let lbl: String = label.chars().take(label_w).collect();
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>width$} │ ", lbl, width = label_w)),
            Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal with usage notes.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let key = |s: &'static str| Span::styled(s, Style::default().add_modifier(Modifier::ITALIC));
    let lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Browsing",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw("Move: "), key("Up/Down, j/k")]),
        Line::from(vec![Span::raw("Pages: "), key("Left/Right, Home/End")]),
        Line::from(vec![
            Span::raw("Search: "),
            key("/"),
            Span::raw(" then type; regex, case-insensitive; Esc clears"),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            "Selecting and deleting",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw("Check row: "), key("Space")]),
        Line::from(vec![Span::raw("Check / uncheck page: "), key("a")]),
        Line::from(vec![Span::raw("Delete row: "), key("d, Delete")]),
        Line::from(vec![Span::raw("Delete checked rows: "), key("D")]),
        Line::raw(""),
        Line::from(Span::styled(
            "Editing",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw("Edit row: "), key("e, Enter")]),
        Line::from(vec![Span::raw("Switch field: "), key("Tab, Shift+Tab")]),
        Line::from(vec![Span::raw("Save: "), key("Enter"), Span::raw("  Discard: "), key("Esc")]),
        Line::raw(""),
        Line::from(vec![Span::raw("Reload from endpoint: "), key("r")]),
        Line::from(vec![Span::raw("Quit: "), key("q")]),
        Line::from(vec![Span::raw("Close help: "), key("Esc / Enter")]),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_rect(40, 4, area);
        assert_eq!(r.width, 20);
        assert_eq!(r.y, 3);
    }
}
