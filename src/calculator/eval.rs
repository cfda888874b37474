//! Closed-grammar arithmetic evaluator
//!
//! Input comes from untrusted users, so this is a plain tokenizer plus a
//! bounded recursive-descent parser over numbers, `+ - * / % ^ ( )` and the
//! `**` exponent alias. Nothing else is accepted.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | '(' expr ')'
//! number  := mantissa ('e' ('+' | '-')? digits)?
//! ```
//!
//! Very large and very small results are displayed in exponent form, which
//! the tokenizer reads back, so any result can be used in the next
//! expression.

use thiserror::Error;

/// Longest expression the evaluator will look at
pub const MAX_EXPRESSION_LEN: usize = 256;

/// Deepest nesting of parentheses and unary/exponent chains
pub const MAX_DEPTH: usize = 32;

/// Display text shown in place of a failed evaluation
pub const ERROR_DISPLAY: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("expression is empty")]
    Empty,
    #[error("expression longer than {MAX_EXPRESSION_LEN} characters")]
    TooLong,
    #[error("nesting deeper than {MAX_DEPTH} levels")]
    TooDeep,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NotFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
}

impl Token {
    fn describe(self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Percent => "%".to_string(),
            Token::Caret => "^".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

/// Evaluate an expression and format the result for display.
pub fn evaluate(expression: &str) -> Result<String, EvalError> {
    let value = evaluate_value(expression)?;
    Ok(format_number(value))
}

fn evaluate_value(expression: &str) -> Result<f64, EvalError> {
    if expression.chars().count() > MAX_EXPRESSION_LEN {
        return Err(EvalError::TooLong);
    }
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(EvalError::UnexpectedToken(tok.describe()));
    }
    finite(value)
}

/// Magnitudes at or above this are shown in exponent form
const EXPONENT_ABOVE: f64 = 1e16;

/// Non-zero magnitudes below this are shown in exponent form
const EXPONENT_BELOW: f64 = 1e-4;

/// Format a value the way the calculator displays it: integral values carry
/// no fractional part, negative zero prints as `0`, and magnitudes outside
/// `[1e-4, 1e16)` use the shortest exponent form (`1e300`, `2.5e-7`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(EXPONENT_BELOW..EXPONENT_ABOVE).contains(&magnitude) {
        format!("{value:e}")
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if chars.peek() == Some(&'e') {
                    literal.push('e');
                    chars.next();
                    if let Some(&sign @ ('+' | '-')) = chars.peek() {
                        literal.push(sign);
                        chars.next();
                    }
                    while let Some(&d) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        literal.push(d);
                        chars.next();
                    }
                }
                tokens.push(Token::Number(parse_number(&literal)?));
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Caret);
                } else {
                    tokens.push(Token::Star);
                }
            }
            _ => {
                let tok = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    other => return Err(EvalError::UnexpectedChar(other)),
                };
                chars.next();
                tokens.push(tok);
            }
        }
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> Result<f64, EvalError> {
    let invalid = || EvalError::InvalidNumber(literal.to_string());

    let (mantissa, exponent) = match literal.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (literal, None),
    };

    let dots = mantissa.matches('.').count();
    if dots > 1 || mantissa == "." {
        return Err(invalid());
    }
    // `05` is rejected but `00`, `0.5` and `007.5` are fine
    if dots == 0
        && mantissa.len() > 1
        && mantissa.starts_with('0')
        && mantissa.contains(|c| c != '0')
    {
        return Err(invalid());
    }
    if let Some(exponent) = exponent {
        let digits = exponent.trim_start_matches(['+', '-']);
        if digits.is_empty()
            || exponent.len() - digits.len() > 1
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
    }

    let value = literal.parse::<f64>().map_err(|_| invalid())?;
    finite(value)
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NotFinite)
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(EvalError::TooDeep)
        } else {
            Ok(())
        }
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.next();
                    value = finite(value + self.term()?)?;
                }
                Some(Token::Minus) => {
                    self.next();
                    value = finite(value - self.term()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next();
                    value = finite(value * self.unary()?)?;
                }
                Some(Token::Slash) => {
                    self.next();
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value = finite(value / rhs)?;
                }
                Some(Token::Percent) => {
                    self.next();
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value = finite(value - rhs * (value / rhs).floor())?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next();
                self.descend()?;
                let value = self.unary();
                self.ascend();
                Ok(-value?)
            }
            Some(Token::Plus) => {
                self.next();
                self.descend()?;
                let value = self.unary();
                self.ascend();
                value
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Caret) {
            self.next();
            self.descend()?;
            let exponent = self.unary();
            self.ascend();
            return finite(base.powf(exponent?));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr();
                self.ascend();
                let value = value?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(tok) => Err(EvalError::UnexpectedToken(tok.describe())),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(tok) => Err(EvalError::UnexpectedToken(tok.describe())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(evaluate("2+2").unwrap(), "4");
        assert_eq!(evaluate("7-10").unwrap(), "-3");
        assert_eq!(evaluate("6*7").unwrap(), "42");
        assert_eq!(evaluate("5/2").unwrap(), "2.5");
        assert_eq!(evaluate("4/2").unwrap(), "2");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2+3*4").unwrap(), "14");
        assert_eq!(evaluate("(2+3)*4").unwrap(), "20");
        assert_eq!(evaluate("2*3^2").unwrap(), "18");
        assert_eq!(evaluate("10-4-3").unwrap(), "3");
        assert_eq!(evaluate("64/4/2").unwrap(), "8");
    }

    #[test]
    fn test_exponent() {
        assert_eq!(evaluate("2^3").unwrap(), "8");
        assert_eq!(evaluate("2**3").unwrap(), "8");
        // right-associative: 2^(3^2)
        assert_eq!(evaluate("2^3^2").unwrap(), "512");
        assert_eq!(evaluate("2^-1").unwrap(), "0.5");
        assert_eq!(evaluate("-2^2").unwrap(), "-4");
        assert_eq!(evaluate("(-2)^2").unwrap(), "4");
    }

    #[test]
    fn test_modulo_is_floored() {
        assert_eq!(evaluate("7%3").unwrap(), "1");
        assert_eq!(evaluate("-7%3").unwrap(), "2");
        assert_eq!(evaluate("7%-3").unwrap(), "-2");
        assert_eq!(evaluate("7%0"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_decimals() {
        assert_eq!(evaluate("0.5+0.25").unwrap(), "0.75");
        assert_eq!(evaluate(".5*2").unwrap(), "1");
        assert_eq!(evaluate("5.+1").unwrap(), "6");
        assert_eq!(evaluate("007.5").unwrap(), "7.5");
        assert_eq!(evaluate("0.1+0.2").unwrap(), "0.30000000000000004");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("5/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("5/(2-2)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(evaluate(""), Err(EvalError::Empty));
        assert_eq!(evaluate("2+"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("(2+3"), Err(EvalError::UnexpectedEnd));
        assert!(matches!(evaluate("2+3)"), Err(EvalError::UnexpectedToken(_))));
        assert!(matches!(evaluate("2(3)"), Err(EvalError::UnexpectedToken(_))));
        assert!(matches!(evaluate("1.2.3"), Err(EvalError::InvalidNumber(_))));
        assert!(matches!(evaluate("05"), Err(EvalError::InvalidNumber(_))));
        assert!(matches!(evaluate("Error5"), Err(EvalError::UnexpectedChar('E'))));
        assert!(matches!(evaluate("2*/3"), Err(EvalError::UnexpectedToken(_))));
    }

    #[test]
    fn test_rejects_code() {
        assert!(evaluate("__import__('os')").is_err());
        assert!(evaluate("1;2").is_err());
        assert!(evaluate("x=1").is_err());
    }

    #[test]
    fn test_overflow_is_error() {
        assert_eq!(evaluate("10^400"), Err(EvalError::NotFinite));
        assert_eq!(evaluate("(-8)^0.5"), Err(EvalError::NotFinite));
    }

    #[test]
    fn test_bounds() {
        let long = "1+".repeat(MAX_EXPRESSION_LEN) + "1";
        assert_eq!(evaluate(&long), Err(EvalError::TooLong));

        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&deep), Err(EvalError::TooDeep));

        let ok = format!("{}1{}", "(".repeat(8), ")".repeat(8));
        assert_eq!(evaluate(&ok).unwrap(), "1");
    }

    #[test]
    fn test_unary() {
        assert_eq!(evaluate("-3+5").unwrap(), "2");
        assert_eq!(evaluate("--3").unwrap(), "3");
        assert_eq!(evaluate("+4").unwrap(), "4");
        assert_eq!(evaluate("0-0").unwrap(), "0");
        assert_eq!(evaluate("-0").unwrap(), "0");
    }

    #[test]
    fn test_whitespace_ignored() {
        assert_eq!(evaluate(" 1 + 2 ").unwrap(), "3");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1e20), "1e20");
        assert_eq!(format_number(-1e16), "-1e16");
        assert_eq!(format_number(9_999_999_999_999_998.0), "9999999999999998");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(0.000_025), "2.5e-5");
    }

    #[test]
    fn test_exponent_literals() {
        assert_eq!(evaluate("1e300").unwrap(), "1e300");
        assert_eq!(evaluate("2.5e-7*2").unwrap(), "5e-7");
        assert_eq!(evaluate("1e+3+1").unwrap(), "1001");
        assert!(matches!(evaluate("1e"), Err(EvalError::InvalidNumber(_))));
        assert!(matches!(evaluate("1e+-3"), Err(EvalError::InvalidNumber(_))));
        assert!(matches!(evaluate("05e3"), Err(EvalError::InvalidNumber(_))));
        assert_eq!(evaluate("1e400"), Err(EvalError::NotFinite));
        assert!(matches!(evaluate("e5"), Err(EvalError::UnexpectedChar('e'))));
    }

    #[test]
    fn test_extreme_results_evaluate_again() {
        let big = evaluate("10^300").unwrap();
        assert!(big.contains("e300"), "{big}");
        assert!(big.chars().count() < 32);
        assert_eq!(evaluate(&format!("{big}+1")).unwrap(), big);

        let tiny = evaluate("1/10^300").unwrap();
        assert!(tiny.contains("e-30"), "{tiny}");
        assert_eq!(evaluate(&tiny).unwrap(), tiny);
        assert_eq!(evaluate(&format!("{tiny}+1")).unwrap(), "1");

        let negative = evaluate("-2^70").unwrap();
        assert_eq!(evaluate(&negative).unwrap(), negative);
    }
}
