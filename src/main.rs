#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Parser;
use intcalc::calc_engine::limits::{MAX_DIGITS, MAX_LINE_LEN, MAX_TOKENS};
use intcalc::calc_engine::{Limits, Overflow};
use intcalc::shell::Shell;

/// Integer expression calculator: infix in, postfix and result out.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Read expressions line by line from stdin instead of the interactive UI.
    #[arg(long)]
    plain: bool,

    /// Use the raw-mode line editor instead of the full-screen UI.
    #[cfg(feature = "line")]
    #[arg(long)]
    line: bool,

    /// Wrap on i64 overflow instead of reporting an error.
    #[arg(long)]
    wrapping: bool,

    #[arg(long, default_value_t = MAX_TOKENS)]
    max_tokens: usize,

    #[arg(long, default_value_t = MAX_DIGITS)]
    max_digits: usize,

    #[arg(long, default_value_t = MAX_LINE_LEN)]
    max_line_len: usize,
}

impl Args {
    fn limits(&self) -> Limits {
        let overflow = if self.wrapping {
            Overflow::Wrapping
        } else {
            Overflow::Checked
        };
        Limits {
            max_tokens: self.max_tokens,
            max_digits: self.max_digits,
            max_line_len: self.max_line_len,
            ..Limits::default()
        }
        .with_overflow(overflow)
    }
}

fn run_plain(limits: Limits) -> Result<()> {
    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout().lock(), limits);
    shell.run()
}

#[cfg(feature = "tui")]
#[cfg_attr(not(feature = "line"), allow(unused_variables))]
fn run_interactive(args: &Args, limits: Limits) -> Result<()> {
    #[cfg(feature = "line")]
    {
        if args.line {
            return line_mode::run_line(limits);
        }
    }
    tui_mode::run_tui(limits)
}

#[cfg(all(feature = "line", not(feature = "tui")))]
fn run_interactive(_args: &Args, limits: Limits) -> Result<()> {
    line_mode::run_line(limits)
}

#[cfg(not(any(feature = "tui", feature = "line")))]
fn run_interactive(_args: &Args, limits: Limits) -> Result<()> {
    run_plain(limits)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let limits = args.limits();

    if args.plain || !io::stdin().is_terminal() {
        return run_plain(limits);
    }
    run_interactive(&args, limits)
}
