use std::io::{stdin, stdout, Write};

use anyhow::{anyhow, Result};
use intcalc::calc_engine::{calculate, Limits};
use intcalc::shell::{classify_line, write_line_too_long, write_report, LineKind, BANNER};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "> ";

// Функция для преобразования позиции символа в байтовую позицию
fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

fn remove_char_at(s: &mut String, char_index: usize) {
    let byte_idx = char_index_to_byte_index(s, char_index);
    if let Some(c) = s[byte_idx..].chars().next() {
        s.drain(byte_idx..byte_idx + c.len_utf8());
    }
}

/// Raw mode needs explicit carriage returns.
fn raw_lines(text: &str) -> String {
    text.replace('\n', "\r\n")
}

pub fn run_line(limits: Limits) -> Result<()> {
    println!("{}", BANNER);
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history\n");

    let mut stdout = stdout().into_raw_mode()?;
    let mut history: Vec<String> = Vec::new();
    let mut history_index = 0;
    let mut keys = stdin().keys();

    loop {
        write!(stdout, "{}{}", ClearLine, PROMPT)?;
        stdout.flush()?;

        let mut expression = String::new();
        let mut cursor_pos = 0; // позиция курсора в символах
        let (_, initial_y) = stdout.cursor_pos()?;

        loop {
            write!(
                stdout,
                "{}{}{}{}",
                Goto(1, initial_y),
                ClearLine,
                PROMPT,
                expression
            )?;

            let before_cursor: String = expression.chars().take(cursor_pos).collect();
            let column = 1 + PROMPT.len() + before_cursor.width();
            write!(stdout, "{}", Goto(column as u16, initial_y))?;
            stdout.flush()?;

            let key = keys
                .next()
                .ok_or_else(|| anyhow!("stdin closed"))??;
            match key {
                Key::Char('\n') => break,
                Key::Ctrl('d') if expression.is_empty() => break,
                Key::Char(c) => {
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    expression.insert(byte_idx, c);
                    cursor_pos += 1;
                }
                Key::Backspace if cursor_pos > 0 => {
                    cursor_pos -= 1;
                    remove_char_at(&mut expression, cursor_pos);
                }
                Key::Delete if cursor_pos < expression.chars().count() => {
                    remove_char_at(&mut expression, cursor_pos);
                }
                Key::Left if cursor_pos > 0 => cursor_pos -= 1,
                Key::Right if cursor_pos < expression.chars().count() => cursor_pos += 1,
                Key::Home => cursor_pos = 0,
                Key::End => cursor_pos = expression.chars().count(),
                Key::Up => {
                    if history_index > 0 {
                        history_index -= 1;
                        expression = history[history_index].clone();
                        cursor_pos = expression.chars().count();
                    }
                }
                Key::Down => {
                    if history_index < history.len().saturating_sub(1) {
                        history_index += 1;
                        expression = history[history_index].clone();
                        cursor_pos = expression.chars().count();
                    } else {
                        history_index = history.len();
                        expression.clear();
                        cursor_pos = 0;
                    }
                }
                _ => {}
            }
        }

        write!(stdout, "\r\n")?;

        let mut report = Vec::new();
        match classify_line(&expression, &limits) {
            LineKind::End => break,
            LineKind::TooLong => write_line_too_long(&mut report)?,
            LineKind::Expression(expr) => {
                history.push(expr.to_string());
                history_index = history.len();
                write_report(&mut report, &calculate(expr, &limits))?;
            }
        }
        write!(stdout, "{}", raw_lines(&String::from_utf8_lossy(&report)))?;
    }

    write!(stdout, "Goodbye!\r\n")?;
    stdout.flush()?;
    Ok(())
}
