pub const MAX_TOKENS: usize = 4096;
pub const MAX_STACK: usize = 4096;
pub const MAX_DIGITS: usize = 63;
pub const MAX_LINE_LEN: usize = 4095;

/// How `+ - * / %` and unary minus behave when the result leaves the i64 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Fail with `CalcError::ArithmeticOverflow`.
    #[default]
    Checked,
    /// Two's-complement wraparound.
    Wrapping,
}

/// Capacity bounds for one conversion and evaluation cycle.
///
/// A stack of capacity `max_stack` holds at most `max_stack - 1` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_tokens: usize,
    pub max_stack: usize,
    pub max_digits: usize,
    pub max_line_len: usize,
    pub overflow: Overflow,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_tokens: MAX_TOKENS,
            max_stack: MAX_STACK,
            max_digits: MAX_DIGITS,
            max_line_len: MAX_LINE_LEN,
            overflow: Overflow::Checked,
        }
    }
}

impl Limits {
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub(crate) fn stack_has_room(&self, depth: usize) -> bool {
        depth + 1 < self.max_stack
    }
}
