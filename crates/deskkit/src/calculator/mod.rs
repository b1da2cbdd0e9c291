//! Calculator engine
//!
//! Two-operand calculator with chained evaluation, a bounded history and an
//! Error state that clears itself after a delay.

mod engine;
pub mod history;
mod keymap;
mod operation;

pub use engine::{CalculatorEngine, CalculatorView, Phase};
pub use history::{History, HistoryEntry};
pub use keymap::{action_for_key, CalcAction};
pub use operation::{parse_operand, Operation};

use thiserror::Error;

/// Result type for arithmetic
pub type CalcResult<T> = Result<T, CalcError>;

/// Arithmetic failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Division by zero attempted
    #[error("Cannot divide by zero!")]
    DivisionByZero,
    /// Operand text is not a number
    #[error("Invalid operand: {0:?}")]
    InvalidOperand(String),
    /// Equals pressed without a pending operation
    #[error("No pending operation")]
    NoPendingOperation,
    /// Result is NaN or infinite
    #[error("Result is not finite: {0}")]
    NonFinite(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_error_display() {
        assert_eq!(CalcError::DivisionByZero.to_string(), "Cannot divide by zero!");
        assert_eq!(
            CalcError::InvalidOperand(".".into()).to_string(),
            "Invalid operand: \".\""
        );
        assert_eq!(CalcError::NoPendingOperation.to_string(), "No pending operation");
        assert!(CalcError::NonFinite(f64::INFINITY).to_string().contains("inf"));
    }

    #[test]
    fn test_calc_error_is_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(CalcError::DivisionByZero);
        assert!(err.to_string().contains("divide"));
    }
}
