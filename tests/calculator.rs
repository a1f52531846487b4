use std::io::Cursor;

use intcalc::calc_engine::{calculate, CalcError, Limits, Overflow};
use intcalc::shell::{Shell, BANNER};

fn result_of(input: &str) -> Result<i64, CalcError> {
    calculate(input, &Limits::default()).result
}

fn postfix_of(input: &str) -> String {
    calculate(input, &Limits::default())
        .rendered_postfix()
        .unwrap_or_else(|| panic!("{input:?} did not convert"))
}

fn run_shell(input: &str) -> String {
    let mut shell = Shell::new(Cursor::new(input.to_string()), Vec::new(), Limits::default());
    shell.run().expect("shell failed");
    String::from_utf8(shell.into_output()).expect("non-utf8 output")
}

#[test]
fn precedence_and_associativity_laws() {
    assert_eq!(postfix_of("2 + 3 * 4"), "2 3 4 * +");
    assert_eq!(result_of("2 + 3 * 4"), Ok(14));
    assert_eq!(result_of("2 ^ 3 ^ 2"), Ok(512));
    assert_eq!(result_of("(2 ^ 3) ^ 2"), Ok(64));
    assert_eq!(result_of("100 / 10 / 5"), Ok(2));
}

#[test]
fn unary_minus() {
    assert_eq!(result_of("-3 + 4"), Ok(1));
    assert_eq!(result_of("2 * -5"), Ok(-10));
    assert_eq!(result_of("-(3+4)"), Ok(-7));
    assert_eq!(postfix_of("7 % -3"), "7 3 ~ %");
    assert_eq!(result_of("7 % -3"), Ok(1));
    assert_eq!(result_of("2 * - - 3"), Ok(6));
    assert_eq!(result_of("2 ^ -(1)").unwrap_err(), CalcError::InvalidPower);
}

#[test]
fn operator_sequences() {
    assert_eq!(result_of("3 +"), Err(CalcError::UnexpectedEnd));
    assert_eq!(result_of("3 * / 4"), Err(CalcError::UnexpectedOperator));
}

#[test]
fn documented_scenario() {
    assert_eq!(postfix_of("-3 + 4*(2-1) ^ 3"), "3 ~ 4 2 1 - 3 ^ * +");
    assert_eq!(result_of("-3 + 4*(2-1) ^ 3"), Ok(1));
}

#[test]
fn named_failures() {
    assert_eq!(result_of("5 / 0").unwrap_err().to_string(), "Division by zero");
    assert_eq!(result_of("5 % 0").unwrap_err().to_string(), "Modulo by zero");
    assert_eq!(result_of("(1 + 2").unwrap_err().to_string(), "Mismatched parentheses");
    assert_eq!(result_of("1 + 2)").unwrap_err().to_string(), "Mismatched parentheses");
    assert_eq!(
        result_of("2 ^ -1").unwrap_err().to_string(),
        "Invalid or overflow in exponentiation"
    );
}

#[test]
fn zero_to_the_zero_is_one() {
    assert_eq!(result_of("0 ^ 0"), Ok(1));
}

#[test]
fn deterministic_rendering() {
    let input = "-(7 % 4) * 2 ^ 2 ^ 2 - -1";
    let first = calculate(input, &Limits::default());
    let second = calculate(input, &Limits::default());
    assert_eq!(first, second);
    assert_eq!(first.rendered_postfix().as_deref(), Some("7 4 % ~ 2 2 2 ^ ^ * 1 ~ -"));
    assert_eq!(first.result, Ok(-47));
}

#[test]
fn overflow_policy_is_configurable() {
    let wrapping = Limits::default().with_overflow(Overflow::Wrapping);
    assert_eq!(
        calculate("9223372036854775807 * 2", &wrapping).result,
        Ok(-2)
    );
    assert_eq!(
        result_of("9223372036854775807 * 2"),
        Err(CalcError::ArithmeticOverflow)
    );
}

#[test]
fn shell_session() {
    let out = run_shell("-3 + 4*(2-1) ^ 3\n5 / 0\n(1 + 2\n\n2 + 2\n");
    let expected = format!(
        "{BANNER}\n\
         > Postfix: 3 ~ 4 2 1 - 3 ^ * +\n\
         Result: 1\n\
         > Postfix: 5 0 /\n\
         Error (evaluate): Division by zero\n\
         > Error (infix->postfix): Mismatched parentheses\n\
         > Goodbye!\n"
    );
    assert_eq!(out, expected);
}

#[test]
fn whitespace_line_ends_session_without_evaluating() {
    let out = run_shell("   \t\n1 + 1\n");
    assert!(out.ends_with("> Goodbye!\n"));
    assert!(!out.contains("Postfix"));
    assert!(!out.contains("Result"));
}

#[test]
fn end_of_input_ends_session() {
    let out = run_shell("6 * 7");
    assert!(out.ends_with("> Postfix: 6 7 *\nResult: 42\n> Goodbye!\n"));
}

#[test]
fn bad_line_does_not_poison_the_next() {
    let out = run_shell("2 $ 3\n9223372036854775808\n1 - 1\n");
    assert!(out.contains("Error (infix->postfix): Invalid character: '$'\n"));
    assert!(out.contains("Postfix: 9223372036854775808\nError (evaluate): Invalid number in postfix\n"));
    assert!(out.contains("Postfix: 1 1 -\nResult: 0\n"));
}

#[test]
fn over_long_line_is_rejected() {
    let limits = Limits {
        max_line_len: 8,
        ..Limits::default()
    };
    let mut shell = Shell::new(Cursor::new("1 + 2 + 3 + 4\n1 + 2\n"), Vec::new(), limits);
    shell.run().unwrap();
    let out = String::from_utf8(shell.into_output()).unwrap();
    assert!(out.contains("> Error: Line too long\n> Postfix: 1 2 +\nResult: 3\n"));
}
