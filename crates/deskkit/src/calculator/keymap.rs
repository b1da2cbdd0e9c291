//! Calculator buttons and keyboard mapping

use super::Operation;

/// Input accepted by the calculator, from a button or a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcAction {
    /// Insert a digit (0-9)
    Digit(u8),
    /// Insert a decimal point
    Decimal,
    /// Choose an operation
    Operator(Operation),
    /// Compute the pending operation
    Equals,
    /// Reset operands
    Clear,
    /// Remove the last character
    Delete,
}

impl CalcAction {
    /// Character appended to the operand, for digit and decimal actions
    #[must_use]
    pub fn to_char(self) -> Option<char> {
        match self {
            Self::Digit(d) => char::from_digit(u32::from(d), 10),
            Self::Decimal => Some('.'),
            Self::Operator(_) | Self::Equals | Self::Clear | Self::Delete => None,
        }
    }

    /// Button label
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::Equals => "=".to_string(),
            Self::Clear => "AC".to_string(),
            Self::Delete => "DEL".to_string(),
        }
    }
}

/// Map a keyboard key name to a calculator action.
///
/// Recognises `0`-`9`, `.`, `+ - * /`, `Enter` and `=`, `Escape` and
/// `Backspace`. Everything else is `None`.
#[must_use]
pub fn action_for_key(key: &str) -> Option<CalcAction> {
    match key {
        "Enter" | "=" => return Some(CalcAction::Equals),
        "Escape" => return Some(CalcAction::Clear),
        "Backspace" => return Some(CalcAction::Delete),
        _ => {}
    }

    let mut chars = key.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    match c {
        '0'..='9' => c.to_digit(10).map(|d| CalcAction::Digit(d as u8)),
        '.' => Some(CalcAction::Decimal),
        '+' | '-' | '*' | '/' => Operation::from_symbol(c).map(CalcAction::Operator),
        _ => None,
    }
}
