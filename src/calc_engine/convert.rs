use std::iter::Peekable;
use std::str::Chars;

use super::error::CalcError;
use super::limits::Limits;
use super::token::{Assoc, Literal, Operator, Postfix, Token};

/// Entries of the operator stack. Parentheses live here only; they never
/// reach the postfix output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Paren,
    Op(Operator),
}

/// Shunting-yard state for a single line.
///
/// `expect_operand` is the only parser context: it is true at the start, after
/// `(`, after a binary operator and after unary minus.
struct Converter<'a> {
    limits: &'a Limits,
    output: Vec<Token>,
    ops: Vec<Pending>,
    expect_operand: bool,
}

impl<'a> Converter<'a> {
    fn new(limits: &'a Limits) -> Self {
        Converter {
            limits,
            output: Vec::new(),
            ops: Vec::new(),
            expect_operand: true,
        }
    }

    fn emit(&mut self, token: Token) -> Result<(), CalcError> {
        if self.output.len() >= self.limits.max_tokens {
            return Err(CalcError::TooManyTokens);
        }
        self.output.push(token);
        Ok(())
    }

    fn push_op(&mut self, entry: Pending) -> Result<(), CalcError> {
        if !self.limits.stack_has_room(self.ops.len()) {
            return Err(CalcError::OperatorStackOverflow);
        }
        self.ops.push(entry);
        Ok(())
    }

    fn number(&mut self, chars: &mut Peekable<Chars>) -> Result<(), CalcError> {
        let mut digits = String::new();
        while let Some(&c) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            if digits.len() >= self.limits.max_digits {
                return Err(CalcError::NumberTooLong);
            }
            digits.push(c);
            chars.next();
        }
        self.emit(Token::Integer(Literal::new(digits)))?;
        self.expect_operand = false;
        Ok(())
    }

    fn open_paren(&mut self) -> Result<(), CalcError> {
        self.push_op(Pending::Paren)?;
        self.expect_operand = true;
        Ok(())
    }

    fn close_paren(&mut self) -> Result<(), CalcError> {
        loop {
            match self.ops.pop() {
                Some(Pending::Paren) => break,
                Some(Pending::Op(op)) => self.emit(Token::Op(op))?,
                None => return Err(CalcError::MismatchedParens),
            }
        }
        self.expect_operand = false;
        Ok(())
    }

    fn operator(&mut self, op: Operator) -> Result<(), CalcError> {
        let op = match (self.expect_operand, op) {
            (true, Operator::Sub) => Operator::Neg,
            (true, _) => return Err(CalcError::UnexpectedOperator),
            (false, op) => op,
        };

        while let Some(&Pending::Op(top)) = self.ops.last() {
            let binds_tighter = top.precedence() > op.precedence()
                || (top.precedence() == op.precedence() && op.assoc() == Assoc::Left);
            if !binds_tighter {
                break;
            }
            self.ops.pop();
            self.emit(Token::Op(top))?;
        }

        self.push_op(Pending::Op(op))?;
        // Every operator, unary or binary, must be followed by an operand.
        self.expect_operand = true;
        Ok(())
    }

    fn finish(mut self) -> Result<Postfix, CalcError> {
        while let Some(entry) = self.ops.pop() {
            match entry {
                Pending::Paren => return Err(CalcError::MismatchedParens),
                Pending::Op(op) => self.emit(Token::Op(op))?,
            }
        }
        if self.expect_operand {
            return Err(CalcError::UnexpectedEnd);
        }
        Ok(Postfix::from_tokens(self.output))
    }
}

/// Converts one line of infix notation to postfix order.
pub fn to_postfix(input: &str, limits: &Limits) -> Result<Postfix, CalcError> {
    let mut converter = Converter::new(limits);
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => converter.number(&mut chars)?,
            '(' => {
                chars.next();
                converter.open_paren()?;
            }
            ')' => {
                chars.next();
                converter.close_paren()?;
            }
            _ => {
                let op = Operator::from_char(c).ok_or(CalcError::InvalidCharacter(c))?;
                chars.next();
                converter.operator(op)?;
            }
        }
    }

    converter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> Result<String, CalcError> {
        to_postfix(input, &Limits::default()).map(|p| p.to_string())
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(render("2 + 3 * 4").unwrap(), "2 3 4 * +");
        assert_eq!(render("2 * 3 + 4").unwrap(), "2 3 * 4 +");
        assert_eq!(render("10 - 4 - 3").unwrap(), "10 4 - 3 -");
        assert_eq!(render("2 ^ 3 ^ 2").unwrap(), "2 3 2 ^ ^");
        assert_eq!(render("8 / 4 % 3").unwrap(), "8 4 / 3 %");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(render("(2 + 3) * 4").unwrap(), "2 3 + 4 *");
        assert_eq!(render("((7))").unwrap(), "7");
    }

    #[test]
    fn unary_minus_is_detected_from_context() {
        assert_eq!(render("-3 + 4").unwrap(), "3 ~ 4 +");
        assert_eq!(render("2 * -5").unwrap(), "2 5 ~ *");
        assert_eq!(render("-(3+4)").unwrap(), "3 4 + ~");
        assert_eq!(render("--3").unwrap(), "3 ~ ~");
        assert_eq!(render("2 - -3").unwrap(), "2 3 ~ -");
        assert_eq!(render("-2 ^ 2").unwrap(), "2 ~ 2 ^");
        assert_eq!(render("2 ^ -1").unwrap(), "2 1 ~ ^");
    }

    #[test]
    fn unary_minus_after_each_binary_operator() {
        assert_eq!(render("7 + -3").unwrap(), "7 3 ~ +");
        assert_eq!(render("7 - -3").unwrap(), "7 3 ~ -");
        assert_eq!(render("7 * -3").unwrap(), "7 3 ~ *");
        assert_eq!(render("7 / -3").unwrap(), "7 3 ~ /");
        assert_eq!(render("7 % -3").unwrap(), "7 3 ~ %");
        assert_eq!(render("7 ^ -3").unwrap(), "7 3 ~ ^");
        assert_eq!(render("2 * - - 3").unwrap(), "2 3 ~ ~ *");
    }

    #[test]
    fn second_binary_operator_is_rejected() {
        assert_eq!(render("7 % * 3"), Err(CalcError::UnexpectedOperator));
        assert_eq!(render("7 - + 3"), Err(CalcError::UnexpectedOperator));
        assert_eq!(render("7 ^ ^ 3"), Err(CalcError::UnexpectedOperator));
    }

    #[test]
    fn mixed_scenario() {
        assert_eq!(render("-3 + 4*(2-1) ^ 3").unwrap(), "3 ~ 4 2 1 - 3 ^ * +");
    }

    #[test]
    fn whitespace_is_ignored_and_digits_kept_verbatim() {
        assert_eq!(render("  12\t+\r\n007 ").unwrap(), "12 007 +");
    }

    #[test]
    fn operator_where_operand_expected() {
        assert_eq!(render("* 3"), Err(CalcError::UnexpectedOperator));
        assert_eq!(render("3 + * 4"), Err(CalcError::UnexpectedOperator));
        assert_eq!(render("(+ 1)"), Err(CalcError::UnexpectedOperator));
    }

    #[test]
    fn dangling_operator() {
        assert_eq!(render("3 +"), Err(CalcError::UnexpectedEnd));
        assert_eq!(render("-"), Err(CalcError::UnexpectedEnd));
        assert_eq!(render(""), Err(CalcError::UnexpectedEnd));
    }

    #[test]
    fn mismatched_parentheses() {
        assert_eq!(render("(1 + 2"), Err(CalcError::MismatchedParens));
        assert_eq!(render("1 + 2)"), Err(CalcError::MismatchedParens));
        // the open paren is reported before the dangling operator
        assert_eq!(render("(1 +"), Err(CalcError::MismatchedParens));
    }

    #[test]
    fn invalid_characters() {
        assert_eq!(render("2 $ 3"), Err(CalcError::InvalidCharacter('$')));
        assert_eq!(render("u3"), Err(CalcError::InvalidCharacter('u')));
        assert_eq!(render("1.5"), Err(CalcError::InvalidCharacter('.')));
    }

    #[test]
    fn structurally_odd_input_is_left_to_the_evaluator() {
        assert_eq!(render("3 4").unwrap(), "3 4");
        assert_eq!(render("()").unwrap(), "");
    }

    #[test]
    fn digit_limit() {
        let ok = "9".repeat(63);
        assert_eq!(render(&ok).unwrap(), ok);
        assert_eq!(render(&"9".repeat(64)), Err(CalcError::NumberTooLong));
    }

    #[test]
    fn token_limit() {
        let limits = Limits {
            max_tokens: 3,
            ..Limits::default()
        };
        assert!(to_postfix("1 + 2", &limits).is_ok());
        assert_eq!(to_postfix("1 + 2 + 3", &limits), Err(CalcError::TooManyTokens));
    }

    #[test]
    fn operator_stack_limit() {
        let limits = Limits {
            max_stack: 4,
            ..Limits::default()
        };
        assert!(to_postfix("(((1)))", &limits).is_ok());
        assert_eq!(to_postfix("((((1))))", &limits), Err(CalcError::OperatorStackOverflow));
    }

    #[test]
    fn conversion_is_repeatable() {
        let input = "-(12 % 5) ^ 2 - 3 * (4 - -1)";
        assert_eq!(render(input).unwrap(), render(input).unwrap());
    }
}
