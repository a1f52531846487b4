use super::app::{App, HistoryEntry};
use super::helpers::{format_with_spaces, highlight_tokens, wrap_text};
use crate::render_help::render_help;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const MIN_SIZE: (u16, u16) = (50, 10);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app)
            } else {
                ui(f, app)
            }
        })?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.show_help {
                    help_key(app, key.code);
                } else {
                    edit_key(app, key.code, key.modifiers.contains(KeyModifiers::CONTROL));
                }
            }
            Event::Mouse(mouse) => {
                let scroll = if app.show_help { &mut app.help_scroll } else { &mut app.history_scroll };
                match mouse.kind {
                    MouseEventKind::ScrollDown => *scroll = scroll.saturating_add(3),
                    MouseEventKind::ScrollUp => *scroll = scroll.saturating_sub(3),
                    _ => {}
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn help_key(app: &mut App, code: KeyCode) {
    let scroll = &mut app.help_scroll;
    match code {
        KeyCode::Down => *scroll = scroll.saturating_add(1),
        KeyCode::Up => *scroll = scroll.saturating_sub(1),
        KeyCode::PageDown => *scroll = scroll.saturating_add(10),
        KeyCode::PageUp => *scroll = scroll.saturating_sub(10),
        KeyCode::Esc | KeyCode::F(1) => {
            *scroll = 0;
            app.show_help = false;
        }
        _ => {}
    }
}

fn edit_key(app: &mut App, code: KeyCode, ctrl: bool) {
    match (code, ctrl) {
        (KeyCode::Char('u' | 'U'), true) => app.clear_input(),
        (KeyCode::Char('c'), true) => app.should_quit = true,
        (KeyCode::Char(c), false) => app.insert_char(c),
        (KeyCode::Backspace, _) => app.backspace(),
        (KeyCode::Delete, _) => app.delete_at_cursor(),
        (KeyCode::Left, true) => app.move_cursor_by_words(-1),
        (KeyCode::Right, true) => app.move_cursor_by_words(1),
        (KeyCode::Left, false) => app.move_cursor(-1),
        (KeyCode::Right, false) => app.move_cursor(1),
        (KeyCode::Home, _) => app.cursor_position = 0,
        (KeyCode::End, _) => app.cursor_position = app.input.chars().count(),
        (KeyCode::Up, _) => app.navigate_history(-1),
        (KeyCode::Down, _) => app.navigate_history(1),
        (KeyCode::PageUp, _) => app.scroll_history(-1),
        (KeyCode::PageDown, _) => app.scroll_history(1),
        (KeyCode::Enter, _) => app.submit(),
        (KeyCode::F(1), _) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let area = frame.size();
    app.terminal_too_small = area.width < MIN_SIZE.0 || area.height < MIN_SIZE.1;
    if app.terminal_too_small {
        let warning = Paragraph::new(format!(
            "Terminal is {}x{}; at least {}x{} is needed.",
            area.width, area.height, MIN_SIZE.0, MIN_SIZE.1
        ))
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(warning, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3), Constraint::Length(1), Constraint::Min(3)])
        .split(area);
    let (input_area, status_area, history_area) = (chunks[0], chunks[1], chunks[2]);

    render_input(frame, app, input_area);
    render_status(frame, status_area);
    render_history(frame, app, history_area);
    app.list_height = history_area.height as usize;
}

fn titled_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_alignment(Alignment::Center)
}

/// Indented detail lines under an entry, wrapped to the list width.
fn push_detail(items: &mut Vec<ListItem<'static>>, text: &str, width: usize, style: Style) {
    for (idx, line) in wrap_text(text, width).into_iter().enumerate() {
        let prefix = if idx == 0 { "    - " } else { "      " };
        items.push(ListItem::new(Line::from(Span::styled(format!("{}{}", prefix, line), style))));
    }
}

fn entry_items(entry: &HistoryEntry, base_style: Style, wrap_width: usize) -> Vec<ListItem<'static>> {
    let mut items = Vec::new();
    let input = format_with_spaces(&entry.input);

    for (line_idx, line) in wrap_text(&input, wrap_width).into_iter().enumerate() {
        let mut spans = vec![if line_idx == 0 {
            Span::styled("> ", Style::default().fg(Color::Green))
        } else {
            Span::raw("  ")
        }];
        spans.extend(highlight_tokens(&line, base_style));

        if line_idx == 0 {
            spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
            match &entry.calculation.result {
                Ok(val) => spans.push(Span::styled(
                    val.to_string(),
                    Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
                )),
                Err(e) => spans.push(Span::styled(
                    format!("Error ({}): {}", e.stage().label(), e),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
            }
        }

        items.push(ListItem::new(Line::from(spans)));
    }

    if let Some(postfix) = entry.calculation.rendered_postfix() {
        let mut spans = vec![Span::styled("  postfix: ", Style::default().fg(Color::DarkGray))];
        spans.extend(highlight_tokens(&postfix, Style::default().fg(Color::DarkGray)));
        items.push(ListItem::new(Line::from(spans)));
    }

    if entry.detailed_mode {
        for (j, step) in entry.detailed_steps.iter().enumerate() {
            let text = format!("Step {}: {} = {}", j + 1, step.operation, step.result);
            push_detail(&mut items, &text, wrap_width, Style::default().fg(Color::DarkGray));
        }
        let time = format!("Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0);
        push_detail(&mut items, &time, wrap_width, Style::default().fg(Color::Magenta));
    }

    items
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = titled_block(" History ");

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty_msg = Paragraph::new("No calculations yet. Enter an expression to see results here.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let mut items = Vec::new();
    app.item_start_indices.clear();

    let wrap_width = inner_area.width.saturating_sub(4) as usize;

    for (i, entry) in app.history.iter().enumerate() {
        app.item_start_indices.push(items.len());

        let base_style = Style::default()
            .fg(if i == app.cursor_history { Color::Yellow } else { Color::Cyan });
        items.extend(entry_items(entry, base_style, wrap_width));

        if i < app.history.len() - 1 {
            let separator = Span::styled(
                "-".repeat(inner_area.width as usize),
                Style::default().fg(Color::DarkGray)
            );
            items.push(ListItem::new(Line::from(separator)));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner_area.height as usize);
        app.scroll_to_bottom = false;
    }

    let selected_index = app.item_start_indices.get(app.cursor_history).copied();

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default()
        .with_selected(selected_index)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

fn render_status(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::DarkGray);
    let spans: Vec<Span> = [
        ("Enter", "Calculate"),
        ("Empty Enter", "Quit"),
        ("Up/Down PgUp/PgDn", "Navigate"),
        ("F1", "Help"),
        ("Ctrl+U", "Clear Input"),
    ]
    .into_iter()
    .flat_map(|(key, desc)| [Span::styled(key, key_style), Span::styled(format!(" {} ", desc), desc_style)])
    .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = titled_block(" Expression ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // two columns for the prompt
    let width = inner.width.saturating_sub(2) as usize;
    app.adjust_input_scroll(width);
    let shown: String = app.input.chars().skip(app.input_scroll).take(width).collect();
    let before_cursor: String = shown
        .chars()
        .take(app.cursor_position.saturating_sub(app.input_scroll))
        .collect();

    let mut spans = vec![Span::styled("> ", Style::default().fg(Color::Green))];
    spans.extend(highlight_tokens(&shown, Style::default()));
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    frame.set_cursor(inner.x + 2 + before_cursor.width() as u16, inner.y);

    let marker = Style::default().fg(Color::DarkGray);
    if app.input_scroll > 0 {
        frame.render_widget(Paragraph::new("<").style(marker), Rect::new(inner.x, inner.y, 1, 1));
    }
    if app.input.chars().count() > app.input_scroll + width {
        let right = Rect::new(inner.x + inner.width - 1, inner.y, 1, 1);
        frame.render_widget(Paragraph::new(">").style(marker), right);
    }
}
