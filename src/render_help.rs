use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" IntCalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled(
            "IntCalc - Integer Expression Calculator",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Operators (highest binding first):"),
        Line::from("  -x    : Negation, right-assoc   (e.g., -(3 + 4) = -7)"),
        Line::from("  ^     : Power, right-assoc      (e.g., 2 ^ 3 ^ 2 = 512)"),
        Line::from("  * / % : Multiply, divide, rem   (e.g., -7 / 2 = -3, -7 % 2 = -1)"),
        Line::from("  + -   : Add, subtract           (e.g., 10 - 4 - 3 = 3)"),
        Line::from("  ( )   : Grouping"),
        Line::from(""),
        heading("Rules:"),
        Line::from("  Values are 64-bit signed integers; division truncates toward zero."),
        Line::from("  Exponents must be non-negative; 0 ^ 0 = 1."),
        Line::from("  Each result line shows the postfix form; negation prints as ~."),
        Line::from(""),
        heading("Commands:"),
        Line::from("  details <expression> : Show every evaluation step and the time taken"),
        Line::from("  clear : Clear calculation history"),
        Line::from("  help  : Show this help screen"),
        Line::from("  quit  : Exit (an empty line also exits)"),
        Line::from("  Ctrl+U : Clear current input"),
        Line::from(""),
        heading("Navigation:"),
        Line::from("  ← → : Move cursor left/right"),
        Line::from("  Ctrl+←/→ : Move cursor by words"),
        Line::from("  Home/End : Move to start/end of line"),
        Line::from("  ↑ ↓ : Navigate calculation history"),
        Line::from("  PgUp/PgDn : Page through history"),
        Line::from("  Mouse wheel : Scroll through history"),
        Line::from(""),
        heading("Examples:"),
        Line::from("  -3 + 4*(2-1) ^ 3"),
        Line::from("  2*-5 + (7 - -(3))"),
        Line::from("  details (12 % 5) ^ 3"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
