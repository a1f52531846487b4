use super::error::CalcError;
use super::limits::{Limits, Overflow};
use super::token::{Operator, Postfix, Token};

pub struct Step {
    pub operation: String,
    pub result: i64,
}

/// Record of every operator application, kept only in detailed mode.
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: i64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

struct ValueStack<'a> {
    values: Vec<i64>,
    limits: &'a Limits,
}

impl<'a> ValueStack<'a> {
    fn push(&mut self, value: i64) -> Result<(), CalcError> {
        if !self.limits.stack_has_room(self.values.len()) {
            return Err(CalcError::ValueStackOverflow);
        }
        self.values.push(value);
        Ok(())
    }
}

/// Integer power by repeated squaring.
///
/// Returns `None` for a negative exponent or when a multiplication could leave
/// the i64 range. The bound `|x| > i64::MAX / |base|` is checked before every
/// multiply, so some exact results such as `(-2) ^ 63` are rejected too.
pub fn pow_by_squaring(mut base: i64, mut exp: i64) -> Option<i64> {
    if exp < 0 {
        return None;
    }
    let max = i64::MAX as u64;
    let mut result: i64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            if base != 0 && result.unsigned_abs() > max / base.unsigned_abs() {
                return None;
            }
            result *= base;
        }
        exp >>= 1;
        if exp > 0 {
            if base != 0 && base.unsigned_abs() > max / base.unsigned_abs() {
                return None;
            }
            base *= base;
        }
    }
    Some(result)
}

fn settle((value, overflowed): (i64, bool), overflow: Overflow) -> Result<i64, CalcError> {
    if overflowed && overflow == Overflow::Checked {
        Err(CalcError::ArithmeticOverflow)
    } else {
        Ok(value)
    }
}

fn apply_binary(op: Operator, a: i64, b: i64, overflow: Overflow) -> Result<i64, CalcError> {
    match op {
        Operator::Add => settle(a.overflowing_add(b), overflow),
        Operator::Sub => settle(a.overflowing_sub(b), overflow),
        Operator::Mul => settle(a.overflowing_mul(b), overflow),
        Operator::Div => {
            if b == 0 {
                return Err(CalcError::DivisionByZero);
            }
            settle(a.overflowing_div(b), overflow)
        }
        Operator::Rem => {
            if b == 0 {
                return Err(CalcError::ModuloByZero);
            }
            settle(a.overflowing_rem(b), overflow)
        }
        Operator::Pow => pow_by_squaring(a, b).ok_or(CalcError::InvalidPower),
        Operator::Neg => unreachable!("unary minus is applied separately"),
    }
}

pub fn evaluate(postfix: &Postfix, limits: &Limits) -> Result<i64, CalcError> {
    evaluate_traced(postfix, limits, &mut EvaluationTrace::new(false))
}

/// Runs the postfix sequence on a value stack, recording each step in `trace`.
pub fn evaluate_traced(
    postfix: &Postfix,
    limits: &Limits,
    trace: &mut EvaluationTrace,
) -> Result<i64, CalcError> {
    let mut stack = ValueStack {
        values: Vec::new(),
        limits,
    };

    for token in postfix.tokens() {
        match token {
            Token::Integer(lit) => {
                let value = lit.value().ok_or(CalcError::InvalidNumber)?;
                stack.push(value)?;
            }
            Token::Op(Operator::Neg) => {
                let a = stack.values.pop().ok_or(CalcError::MissingUnaryOperand)?;
                let r = settle(a.overflowing_neg(), limits.overflow)?;
                trace.add_step(format!("-({})", a), r);
                stack.push(r)?;
            }
            Token::Op(op) => {
                let (Some(b), Some(a)) = (stack.values.pop(), stack.values.pop()) else {
                    return Err(CalcError::MissingBinaryOperand);
                };
                let r = apply_binary(*op, a, b, limits.overflow)?;
                trace.add_step(format!("{} {} {}", a, op, b), r);
                stack.push(r)?;
            }
        }
    }

    match stack.values.as_slice() {
        [value] => Ok(*value),
        _ => Err(CalcError::UnbalancedStack),
    }
}
