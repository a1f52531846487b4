use thiserror::Error;

/// Which half of the pipeline rejected an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Convert,
    Evaluate,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Convert => "infix->postfix",
            Stage::Evaluate => "evaluate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Invalid character: '{0}'")]
    InvalidCharacter(char),
    #[error("Number token too long")]
    NumberTooLong,
    #[error("Unexpected operator")]
    UnexpectedOperator,
    #[error("Expression ends unexpectedly")]
    UnexpectedEnd,
    #[error("Mismatched parentheses")]
    MismatchedParens,
    #[error("Too many tokens")]
    TooManyTokens,
    #[error("Operator stack overflow")]
    OperatorStackOverflow,
    #[error("Value stack overflow")]
    ValueStackOverflow,
    #[error("Not enough operands for unary minus")]
    MissingUnaryOperand,
    #[error("Not enough operands for binary operator")]
    MissingBinaryOperand,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulo by zero")]
    ModuloByZero,
    #[error("Invalid or overflow in exponentiation")]
    InvalidPower,
    #[error("Invalid number in postfix")]
    InvalidNumber,
    #[error("Extra operands or insufficient operators")]
    UnbalancedStack,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Line too long")]
    LineTooLong,
}

impl CalcError {
    pub fn stage(&self) -> Stage {
        match self {
            CalcError::InvalidCharacter(_)
            | CalcError::NumberTooLong
            | CalcError::UnexpectedOperator
            | CalcError::UnexpectedEnd
            | CalcError::MismatchedParens
            | CalcError::TooManyTokens
            | CalcError::OperatorStackOverflow
            | CalcError::LineTooLong => Stage::Convert,
            _ => Stage::Evaluate,
        }
    }
}
