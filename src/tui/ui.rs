use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, InputMode, ViewMode};
use crate::theme::{hsl_to_rgb, parse_hsl, ColorSlot, ThemeColors};

/// Turns a theme slot into a terminal color. Resolution guarantees every
/// slot is present and valid, but fall back to the terminal default rather
/// than panic on anything unexpected in a hand-edited state file.
fn slot_color(colors: &ThemeColors, slot: ColorSlot) -> Color {
    colors
        .get(&slot)
        .and_then(|value| parse_hsl(value))
        .map(|(h, s, l)| {
            let (r, g, b) = hsl_to_rgb(h, s, l);
            Color::Rgb(r, g, b)
        })
        .unwrap_or(Color::Reset)
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let colors = app.state.active_theme_colors();
    let bg = slot_color(&colors, ColorSlot::Background);
    let fg = slot_color(&colors, ColorSlot::Foreground);
    let border = slot_color(&colors, ColorSlot::Border);
    let accent = slot_color(&colors, ColorSlot::Accent);
    let muted_fg = slot_color(&colors, ColorSlot::MutedForeground);
    let muted = slot_color(&colors, ColorSlot::Muted);
    let destructive = slot_color(&colors, ColorSlot::Destructive);
    let pending_bg = slot_color(&colors, ColorSlot::TaskPendingBackground);
    let completed_bg = slot_color(&colors, ColorSlot::TaskCompletedBackground);

    f.render_widget(Block::default().style(Style::default().bg(bg).fg(fg)), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    let record = app.state.day(app.date);
    let origin = match record {
        Some(r) if r.overrides_template => "customized",
        Some(_) => "template-derived",
        None => "empty",
    };
    let user = app
        .state
        .current_user
        .as_ref()
        .map(|u| u.name.clone())
        .unwrap_or_else(|| "guest".to_string());
    let mut header_text = format!(
        "{} | {} | user: {} | theme: {}",
        app.date.format("%A %Y-%m-%d"),
        origin,
        user,
        app.active_theme_name()
    );
    if app.degraded {
        header_text.push_str(" | NOT SAVED");
    }
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(if app.degraded { destructive } else { fg }))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title("Habitual"),
        );
    f.render_widget(header, chunks[0]);

    match app.view_mode {
        ViewMode::Day => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
                .split(chunks[1]);

            let rows: Vec<Row> = record
                .map(|r| r.tasks.as_slice())
                .unwrap_or(&[])
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let row_bg = if t.completed { completed_bg } else { pending_bg };
                    Row::new(vec![
                        Cell::from((i + 1).to_string()),
                        Cell::from(t.title.clone()),
                        Cell::from(if t.completed { "Done" } else { "Pending" }),
                    ])
                    .style(Style::default().bg(row_bg).fg(fg))
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(8),
            ];

            let table = Table::new(rows, widths)
                .header(
                    Row::new(vec!["#", "Title", "Status"])
                        .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
                        .bottom_margin(1),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border))
                        .title(format!("Tasks - {}", app.date)),
                )
                .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(muted))
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, body[0], &mut app.task_state);

            let note_text = record
                .and_then(|r| r.note.clone())
                .unwrap_or_default();
            let note = Paragraph::new(note_text)
                .style(Style::default().fg(muted_fg))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border))
                        .title("Note"),
                );
            f.render_widget(note, body[1]);
        }
        ViewMode::Templates => {
            let rows: Vec<Row> = app
                .state
                .templates
                .iter()
                .map(|t| {
                    let titles: Vec<&str> = t.tasks.iter().map(|s| s.title.as_str()).collect();
                    Row::new(vec![
                        Cell::from(t.name.clone()),
                        Cell::from(t.tasks.len().to_string()),
                        Cell::from(titles.join(", ")),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Min(16),
                Constraint::Length(6),
                Constraint::Min(20),
            ];

            let table = Table::new(rows, widths)
                .header(
                    Row::new(vec!["Name", "Tasks", "Titles"])
                        .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
                        .bottom_margin(1),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border))
                        .title("Templates"),
                )
                .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(muted))
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[1], &mut app.template_state);
        }
    }

    if let Some(status) = &app.status {
        let line = Paragraph::new(status.as_str()).style(Style::default().fg(accent));
        f.render_widget(line, chunks[2]);
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Day => {
                "q: Quit | Left/Right: Day | a: Add | Space: Toggle | e: Edit | d: Del | n: Note | t: Theme | v: Templates"
            }
            ViewMode::Templates => {
                "q: Quit | Enter: Apply to Day | F: Force Apply | t: Theme | v: Day View"
            }
        },
        _ => "Enter: Save | Esc: Cancel",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(muted_fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(help, chunks[3]);

    // Input popup
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);
        let title = match app.input_mode {
            InputMode::AddingTask => "Add Task: Enter Title",
            InputMode::EditingTitle => "Edit Title",
            InputMode::EditingNote => "Edit Day Note",
            InputMode::Normal => "",
        };
        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(accent).bg(bg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(title),
            );
        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
