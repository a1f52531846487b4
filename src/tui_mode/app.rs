use std::time::{Duration, Instant};

use intcalc::calc_engine::{calculate_traced, CalcError, Calculation, EvaluationTrace, Limits, Step};
use intcalc::shell::{classify_line, LineKind};

pub struct HistoryEntry {
    pub input: String,
    pub calculation: Calculation,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

pub struct App {
    pub input: String,
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
    limits: Limits,
}

/// Splits a leading or trailing `details` keyword off the input.
fn split_details(input: &str) -> (bool, &str) {
    const KEYWORD: &str = "details";
    let n = KEYWORD.len();
    if input.len() > n && input.is_char_boundary(n + 1) {
        let (head, rest) = input.split_at(n + 1);
        if head.eq_ignore_ascii_case("details ") {
            return (true, rest.trim());
        }
    }
    if input.len() > n && input.is_char_boundary(input.len() - n - 1) {
        let (rest, tail) = input.split_at(input.len() - n - 1);
        if tail.eq_ignore_ascii_case(" details") {
            return (true, rest.trim());
        }
    }
    (false, input)
}

impl App {
    pub fn new(limits: Limits) -> Self {
        App {
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            history: Vec::new(),
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
            limits,
        }
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total_chars = self.input.chars().count();
        let cursor_pos = self.cursor_position;

        if cursor_pos < self.input_scroll {
            self.input_scroll = cursor_pos;
        } else if cursor_pos >= self.input_scroll + visible_width {
            self.input_scroll = cursor_pos - visible_width + 1;
        }

        if self.input_scroll > total_chars.saturating_sub(visible_width) {
            self.input_scroll = total_chars.saturating_sub(visible_width);
        }
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.cursor_history = self.history.len().saturating_sub(1);
        self.clear_input();
        self.scroll_to_bottom = true;
    }

    pub fn submit(&mut self) {
        let line = self.input.clone();
        let input = match classify_line(&line, &self.limits) {
            LineKind::End => {
                self.should_quit = true;
                return;
            }
            LineKind::TooLong => {
                self.push_entry(HistoryEntry {
                    input: line.chars().take(40).collect::<String>() + "...",
                    calculation: Calculation {
                        postfix: None,
                        result: Err(CalcError::LineTooLong),
                    },
                    detailed_steps: Vec::new(),
                    detailed_mode: false,
                    duration: Duration::ZERO,
                });
                return;
            }
            LineKind::Expression(expr) => expr.trim(),
        };

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                self.should_quit = true;
                return;
            }
            "clear" | "reset" => {
                self.history.clear();
                self.cursor_history = 0;
                self.history_scroll = 0;
                self.clear_input();
                return;
            }
            "help" => {
                self.show_help = true;
                self.clear_input();
                return;
            }
            _ => {}
        }

        let (detailed_mode, expression) = split_details(input);

        let start_time = Instant::now();
        let mut trace = EvaluationTrace::new(detailed_mode);
        let calculation = calculate_traced(expression, &self.limits, &mut trace);
        let duration = start_time.elapsed();

        self.push_entry(HistoryEntry {
            input: expression.to_string(),
            calculation,
            detailed_steps: trace.steps,
            detailed_mode,
            duration,
        });
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let input_chars: Vec<char> = self.input.chars().collect();
        let len = input_chars.len();
        let mut pos = self.cursor_position.min(len);

        if direction < 0 {
            while pos > 0 && input_chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
            while pos > 0 && !input_chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
        } else {
            while pos < len && !input_chars[pos].is_whitespace() {
                pos += 1;
            }
            while pos < len && input_chars[pos].is_whitespace() {
                pos += 1;
            }
        }

        self.cursor_position = pos;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = App::char_index_to_byte_index(&self.input, self.cursor_position);
        self.input.insert(byte_idx, c);
        self.cursor_position += 1;
    }

    pub fn delete_at_cursor(&mut self) {
        let byte_idx = App::char_index_to_byte_index(&self.input, self.cursor_position);
        if let Some(c) = self.input[byte_idx..].chars().next() {
            self.input.drain(byte_idx..byte_idx + c.len_utf8());
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_at_cursor();
        }
    }

    fn recall(&mut self) {
        if let Some(entry) = self.history.get(self.cursor_history) {
            self.input = entry.input.clone();
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len().saturating_sub(1) {
            self.cursor_history += 1;
        }
        self.recall();
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.history.len().saturating_sub(1));
        }
        self.recall();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
        s.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or_else(|| s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(app: &mut App, text: &str) {
        app.input = text.to_string();
        app.cursor_position = app.input.chars().count();
        app.submit();
    }

    #[test]
    fn records_postfix_and_result() {
        let mut app = App::new(Limits::default());
        submit(&mut app, "2 ^ 3 ^ 2");
        let entry = &app.history[0];
        assert_eq!(entry.calculation.rendered_postfix().as_deref(), Some("2 3 2 ^ ^"));
        assert_eq!(entry.calculation.result, Ok(512));
        assert!(app.input.is_empty());
        assert!(!app.should_quit);
    }

    #[test]
    fn empty_submit_quits() {
        let mut app = App::new(Limits::default());
        submit(&mut app, "   ");
        assert!(app.should_quit);
        assert!(app.history.is_empty());
    }

    #[test]
    fn details_keeps_steps() {
        let mut app = App::new(Limits::default());
        submit(&mut app, "details 1 + 2 * 3");
        let entry = &app.history[0];
        assert!(entry.detailed_mode);
        assert_eq!(entry.input, "1 + 2 * 3");
        assert_eq!(entry.detailed_steps.len(), 2);

        submit(&mut app, "5 - 1 DETAILS");
        assert!(app.history[1].detailed_mode);
        assert_eq!(app.history[1].calculation.result, Ok(4));
    }

    #[test]
    fn clear_and_help_commands() {
        let mut app = App::new(Limits::default());
        submit(&mut app, "1");
        submit(&mut app, "clear");
        assert!(app.history.is_empty());
        submit(&mut app, "help");
        assert!(app.show_help);
    }

    #[test]
    fn errors_are_kept_in_history() {
        let mut app = App::new(Limits::default());
        submit(&mut app, "7 % 0");
        assert_eq!(app.history[0].calculation.result, Err(CalcError::ModuloByZero));
    }

    #[test]
    fn history_recall() {
        let mut app = App::new(Limits::default());
        submit(&mut app, "1 + 1");
        submit(&mut app, "2 + 2");
        app.navigate_history(-1);
        assert_eq!(app.input, "1 + 1");
        app.navigate_history(1);
        assert_eq!(app.input, "2 + 2");
    }

    #[test]
    fn word_motion() {
        let mut app = App::new(Limits::default());
        app.input = "12 + 34".to_string();
        app.cursor_position = 7;
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 5);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 3);
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 5);
    }

    #[test]
    fn editing_by_chars() {
        let mut app = App::new(Limits::default());
        app.insert_char('1');
        app.insert_char('2');
        app.move_cursor(-1);
        app.insert_char('+');
        assert_eq!(app.input, "1+2");
        app.backspace();
        assert_eq!(app.input, "12");
        app.delete_at_cursor();
        assert_eq!(app.input, "1");
    }
}
