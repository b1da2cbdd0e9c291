//! Arithmetic operations

use super::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operation awaiting a second operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (×)
    Multiply,
    /// Division (÷)
    Divide,
}

impl Operation {
    /// All operations in keypad order
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Display symbol
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Parse a display symbol or its ASCII keyboard equivalent
    #[must_use]
    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '×' | '*' => Some(Self::Multiply),
            '÷' | '/' => Some(Self::Divide),
            _ => None,
        }
    }

    /// Apply to two operands
    pub fn apply(self, a: f64, b: f64) -> CalcResult<f64> {
        let result = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                a / b
            }
        };
        if result.is_finite() {
            Ok(result)
        } else {
            Err(CalcError::NonFinite(result))
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Parse operand text as entered on the keypad.
///
/// Accepts an optional leading `-`, digits and at most one `.` with at least
/// one digit somewhere (`"5."` and `".5"` are fine, `"."` is not).
pub fn parse_operand(text: &str) -> CalcResult<f64> {
    let invalid = || CalcError::InvalidOperand(text.to_string());
    let body = text.strip_prefix('-').unwrap_or(text);
    let digits = body.chars().filter(char::is_ascii_digit).count();
    let dots = body.chars().filter(|&c| c == '.').count();
    if digits == 0 || dots > 1 || digits + dots != body.chars().count() {
        return Err(invalid());
    }
    text.parse::<f64>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        let symbols: String = Operation::ALL.iter().map(|op| op.symbol()).collect();
        assert_eq!(symbols, "+-×÷");
    }

    #[test]
    fn test_from_symbol_accepts_keyboard_aliases() {
        assert_eq!(Operation::from_symbol('*'), Some(Operation::Multiply));
        assert_eq!(Operation::from_symbol('/'), Some(Operation::Divide));
        assert_eq!(Operation::from_symbol('÷'), Some(Operation::Divide));
        assert_eq!(Operation::from_symbol('^'), None);
    }

    #[test]
    fn test_symbol_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_symbol(op.symbol()), Some(op));
        }
    }

    #[test]
    fn test_apply() {
        assert_eq!(Operation::Add.apply(5.0, 3.0), Ok(8.0));
        assert_eq!(Operation::Subtract.apply(5.0, 8.0), Ok(-3.0));
        assert_eq!(Operation::Multiply.apply(8.0, 2.0), Ok(16.0));
        assert_eq!(Operation::Divide.apply(9.0, 4.0), Ok(2.25));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(Operation::Divide.apply(5.0, 0.0), Err(CalcError::DivisionByZero));
        assert_eq!(Operation::Divide.apply(0.0, -0.0), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_overflow_is_non_finite() {
        assert!(matches!(
            Operation::Multiply.apply(f64::MAX, 2.0),
            Err(CalcError::NonFinite(_))
        ));
    }

    #[test]
    fn test_parse_operand() {
        assert_eq!(parse_operand("42"), Ok(42.0));
        assert_eq!(parse_operand("5."), Ok(5.0));
        assert_eq!(parse_operand(".5"), Ok(0.5));
        assert_eq!(parse_operand("-2.5"), Ok(-2.5));
    }

    #[test]
    fn test_parse_operand_rejects() {
        for text in ["", ".", "-", "1.2.3", "inf", "NaN", "1e5", "Error", "--1"] {
            assert!(parse_operand(text).is_err(), "{text} should be rejected");
        }
    }
}
