//! Line-oriented front-end: one expression per line, empty line to quit.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::calc_engine::{calculate, CalcError, Calculation, Limits};

pub const BANNER: &str = "Expression Calculator (integers)
Supports: + - * / % ^, parentheses, unary minus
Examples:
  -3 + 4*(2-1) ^ 3
  2*-5 + (7 - -(3))
Enter expression (or empty line to quit):
";

#[derive(Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only: the session is over.
    End,
    TooLong,
    Expression(&'a str),
}

pub fn classify_line<'a>(line: &'a str, limits: &Limits) -> LineKind<'a> {
    let line = line.trim_end_matches(&['\n', '\r'][..]);
    if line.trim().is_empty() {
        LineKind::End
    } else if line.chars().count() > limits.max_line_len {
        LineKind::TooLong
    } else {
        LineKind::Expression(line)
    }
}

/// Writes the `Postfix:` / `Result:` / `Error (...)` lines for one calculation.
pub fn write_report<W: Write>(out: &mut W, calc: &Calculation) -> io::Result<()> {
    if let Some(postfix) = &calc.postfix {
        writeln!(out, "Postfix: {}", postfix)?;
    }
    match &calc.result {
        Ok(value) => writeln!(out, "Result: {}", value),
        Err(e) => writeln!(out, "Error ({}): {}", e.stage().label(), e),
    }
}

pub fn write_line_too_long<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Error: {}", CalcError::LineTooLong)
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    limits: Limits,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, limits: Limits) -> Self {
        Shell {
            input,
            output,
            limits,
        }
    }

    /// Reads and answers lines until end of input or an empty line.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", BANNER)?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            match classify_line(&line, &self.limits) {
                LineKind::End => break,
                LineKind::TooLong => write_line_too_long(&mut self.output)?,
                LineKind::Expression(expr) => {
                    let calc = calculate(expr, &self.limits);
                    write_report(&mut self.output, &calc)?;
                }
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
