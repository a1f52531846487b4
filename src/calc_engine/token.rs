use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Arithmetic operators understood by the converter and the evaluator.
///
/// Unary minus is its own variant: the converter decides between `Neg` and
/// `Sub` from parser context, so the two never share an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Neg,
}

impl Operator {
    /// Maps a binary operator character. `-` always maps to `Sub` here.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Rem),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div | Operator::Rem => 2,
            Operator::Pow => 3,
            Operator::Neg => 4,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            Operator::Pow | Operator::Neg => Assoc::Right,
            _ => Assoc::Left,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Rem => '%',
            Operator::Pow => '^',
            Operator::Neg => '~',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A run of decimal digits exactly as it appeared in the input.
///
/// The value is parsed lazily by the evaluator, which is where an
/// out-of-range literal is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(String);

impl Literal {
    pub fn new(digits: impl Into<String>) -> Self {
        Literal(digits.into())
    }

    pub fn value(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Integer(Literal),
    Op(Operator),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(lit) => write!(f, "{}", lit),
            Token::Op(op) => write!(f, "{}", op),
        }
    }
}

/// Postfix token sequence produced by [`to_postfix`](super::to_postfix).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postfix(Vec<Token>);

impl Postfix {
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        Postfix(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|t| t.to_string()).collect();
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_table() {
        assert!(Operator::Neg.precedence() > Operator::Pow.precedence());
        assert!(Operator::Pow.precedence() > Operator::Mul.precedence());
        assert_eq!(Operator::Mul.precedence(), Operator::Rem.precedence());
        assert!(Operator::Div.precedence() > Operator::Add.precedence());
        assert_eq!(Operator::Add.precedence(), Operator::Sub.precedence());
    }

    #[test]
    fn only_pow_and_neg_are_right_assoc() {
        for c in "+-*/%".chars() {
            assert_eq!(Operator::from_char(c).map(Operator::assoc), Some(Assoc::Left));
        }
        assert_eq!(Operator::Pow.assoc(), Assoc::Right);
        assert_eq!(Operator::Neg.assoc(), Assoc::Right);
    }

    #[test]
    fn minus_char_is_never_unary() {
        assert_eq!(Operator::from_char('-'), Some(Operator::Sub));
        assert_eq!(Operator::from_char('u'), None);
        assert_eq!(Operator::from_char('~'), None);
    }

    #[test]
    fn renders_space_separated_with_tilde_for_negation() {
        let postfix = Postfix::from_tokens(vec![
            Token::Integer(Literal::new("3")),
            Token::Op(Operator::Neg),
            Token::Integer(Literal::new("4")),
            Token::Op(Operator::Sub),
        ]);
        assert_eq!(postfix.to_string(), "3 ~ 4 -");
        assert_eq!(Postfix::default().to_string(), "");
    }

    #[test]
    fn literal_keeps_text_and_parses_lazily() {
        assert_eq!(Literal::new("007").to_string(), "007");
        assert_eq!(Literal::new("007").value(), Some(7));
        assert_eq!(Literal::new("9223372036854775807").value(), Some(i64::MAX));
        assert_eq!(Literal::new("9223372036854775808").value(), None);
    }
}
