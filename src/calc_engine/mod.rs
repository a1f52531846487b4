//! Integer expression engine.
//!
//! - token.rs    : tokens, operators, postfix rendering
//! - limits.rs   : capacity bounds and overflow policy
//! - error.rs    : failure taxonomy
//! - convert.rs  : infix -> postfix (shunting-yard)
//! - evaluate.rs : postfix -> i64 (value stack)

pub mod convert;
pub mod error;
pub mod evaluate;
pub mod limits;
pub mod token;

pub use convert::to_postfix;
pub use error::{CalcError, Stage};
pub use evaluate::{evaluate, evaluate_traced, pow_by_squaring, EvaluationTrace, Step};
pub use limits::{Limits, Overflow};
pub use token::{Assoc, Literal, Operator, Postfix, Token};

/// Outcome of one conversion and evaluation cycle.
///
/// `postfix` is present whenever conversion succeeded, even if evaluation
/// then failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub postfix: Option<Postfix>,
    pub result: Result<i64, CalcError>,
}

impl Calculation {
    pub fn rendered_postfix(&self) -> Option<String> {
        self.postfix.as_ref().map(|p| p.to_string())
    }
}

pub fn calculate(input: &str, limits: &Limits) -> Calculation {
    calculate_traced(input, limits, &mut EvaluationTrace::new(false))
}

pub fn calculate_traced(input: &str, limits: &Limits, trace: &mut EvaluationTrace) -> Calculation {
    match to_postfix(input, limits) {
        Ok(postfix) => {
            let result = evaluate_traced(&postfix, limits, trace);
            Calculation {
                postfix: Some(postfix),
                result,
            }
        }
        Err(e) => Calculation {
            postfix: None,
            result: Err(e),
        },
    }
}
