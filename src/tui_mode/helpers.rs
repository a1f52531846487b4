use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '^' | '~')
}

/// Greedy word wrap by display width; words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let mut remaining = word;
        while remaining.width() > width {
            let mut chunk_width = 0;
            let split_at = remaining
                .char_indices()
                .find(|&(_, c)| {
                    chunk_width += UnicodeWidthChar::width(c).unwrap_or(1);
                    chunk_width > width
                })
                .map(|(i, _)| i)
                .unwrap_or(remaining.len())
                .max(remaining.chars().next().map_or(0, char::len_utf8));
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            lines.push(remaining[..split_at].to_string());
            remaining = &remaining[split_at..];
        }
        if remaining.is_empty() {
            continue;
        }

        if !current_line.is_empty() && current_line.width() + 1 + remaining.width() > width {
            lines.push(std::mem::take(&mut current_line));
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(remaining);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Normalizes spacing of an infix expression: binary operators get a space on
/// each side, unary minus sticks to its operand.
pub fn format_with_spaces(expr: &str) -> String {
    let mut result = String::new();
    let mut expect_operand = true;

    for c in expr.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '-' if expect_operand => {
                if result.ends_with(|p: char| p.is_ascii_digit() || p == ')') {
                    result.push(' ');
                }
                result.push(c);
            }
            c if is_operator(c) => {
                result.push(' ');
                result.push(c);
                result.push(' ');
                expect_operand = true;
            }
            '(' => {
                result.push(c);
                expect_operand = true;
            }
            _ => {
                result.push(c);
                expect_operand = false;
            }
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn highlight_tokens(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let number_style = Style::default()
        .fg(Color::LightGreen);

    let mut spans = Vec::new();
    let mut number = String::new();

    for c in expr.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            continue;
        }
        if !number.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut number), number_style));
        }
        if is_operator(c) {
            spans.push(Span::styled(c.to_string(), operator_style));
        } else if c == ' ' {
            spans.push(Span::raw(" "));
        } else {
            spans.push(Span::styled(c.to_string(), base_style));
        }
    }

    if !number.is_empty() {
        spans.push(Span::styled(number, number_style));
    }

    spans
}
