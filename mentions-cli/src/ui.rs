//! Terminal UI rendering

use std::str::FromStr;

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use mentions_core::{AttributeSet, TextHost};

use crate::app::App;

// Catppuccin Mocha colors
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);
const TEAL: Color = Color::Rgb(148, 226, 213);

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_main_area(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.show_help {
        draw_help(frame);
    } else if app.picker_visible() {
        draw_picker(frame, app, chunks[1]);
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title_text = format!(
        " Mentions - {} [{} tracked]",
        app.title(),
        app.engine.mentions().len()
    );

    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));

    frame.render_widget(title_bar, area);
}

fn draw_main_area(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Editor
            Constraint::Length(32), // Sidebar
        ])
        .split(area);

    draw_editor(frame, app, chunks[0]);
    draw_sidebar(frame, app, chunks[1]);
}

/// Terminal style for a character's attributes
fn attribute_style(attributes: Option<&AttributeSet>) -> Style {
    let mut style = Style::default().fg(TEXT);
    let Some(attributes) = attributes else {
        return style;
    };

    if let Some(color) = attributes
        .get("foreground")
        .and_then(|v| Color::from_str(v.as_str()).ok())
    {
        style = match color {
            Color::Reset => style,
            color => style.fg(color),
        };
    }
    if attributes.get("weight").map(|v| v.as_str()) == Some("bold") {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Editor");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buffer = app.engine.host();
    let mut lines: Vec<Line> = Vec::new();
    let mut offset = 0;

    for line_text in buffer.text().split('\n') {
        let spans: Vec<Span> = line_text
            .chars()
            .enumerate()
            .map(|(col, ch)| {
                Span::styled(
                    ch.to_string(),
                    attribute_style(buffer.attributes_at(offset + col)),
                )
            })
            .collect();
        offset += line_text.chars().count() + 1; // +1 for newline
        lines.push(Line::from(spans));
    }

    // Calculate scroll offset based on cursor
    let (row, col) = buffer.cursor();
    let visible_height = inner.height as usize;
    let scroll_offset = if row >= visible_height {
        row - visible_height + 1
    } else {
        0
    };

    let paragraph = Paragraph::new(lines).scroll((scroll_offset as u16, 0));
    frame.render_widget(paragraph, inner);

    if !app.show_help {
        frame.set_cursor_position(Position::new(
            inner.x + (col as u16).min(inner.width.saturating_sub(1)),
            inner.y + (row - scroll_offset) as u16,
        ));
    }
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let mentions = app.engine.mentions();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUBTEXT0))
        .title(format!("Mentions ({})", mentions.len()));

    let items: Vec<ListItem> = mentions
        .iter()
        .map(|mention| {
            let line1 = format!(" {}", mention.display_name);
            let line2 = format!(
                "   {}..{}",
                mention.range.start,
                mention.range.end()
            );
            ListItem::new(vec![
                Line::from(Span::styled(line1, Style::default().fg(TEAL))),
                Line::from(Span::styled(line2, Style::default().fg(SUBTEXT0))),
            ])
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_str = if app.picker_visible() { "SEARCH" } else { "EDIT" };

    let status = app.status_message.as_deref().unwrap_or("");

    let help_hint = "type @ to mention | Tab/Enter pick | Ctrl-L clear | F1 help | Ctrl-Q quit";

    let status_text = format!(
        " {} | {}",
        mode_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));

    frame.render_widget(status_bar, area);
}

fn draw_picker(frame: &mut Frame, app: &App, area: Rect) {
    let matches = app.matches();
    let height = (matches.len() as u16 + 2).clamp(3, 10);
    let width = 34.min(area.width);
    let picker_area = Rect::new(
        area.x + 1,
        area.y + area.height.saturating_sub(height + 1),
        width,
        height.min(area.height),
    );
    frame.render_widget(Clear, picker_area);

    let title = format!(
        "{}{}",
        app.picker.trigger.get(),
        app.picker.query.borrow()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MAUVE))
        .title(title);

    let items: Vec<ListItem> = if matches.is_empty() {
        vec![ListItem::new("  no matches").style(Style::default().fg(SUBTEXT0))]
    } else {
        matches
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let selected = i == app.picker.selected.get();
                let marker = if selected { ">" } else { " " };
                let style = if selected {
                    Style::default().fg(TEXT).bg(SURFACE1)
                } else {
                    Style::default().fg(TEXT)
                };
                ListItem::new(format!("{} {}", marker, name)).style(style)
            })
            .collect()
    };

    let list = List::new(items).block(block);
    frame.render_widget(list, picker_area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(60, 16, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Help (press any key to close)");

    let heading = Style::default().fg(MAUVE).add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Editing", heading)),
        Line::from("  type       Insert text"),
        Line::from("  Backspace  Delete before caret"),
        Line::from("  arrows     Move caret"),
        Line::from("  Home/End   Line start/end"),
        Line::from(""),
        Line::from(Span::styled("Mentions", heading)),
        Line::from("  @ or #     Start a search"),
        Line::from("  Up/Down    Choose a name while searching"),
        Line::from("  Tab/Enter  Insert the chosen name"),
        Line::from("  Ctrl-L     Clear all mentions"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(SUBTEXT0))),
    ];

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
