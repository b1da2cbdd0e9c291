//! Calculation history
//!
//! Bounded, newest first. Entries persist as display strings
//! (`"5 + 3 = 8"`) and parse back from the same form.

use super::Operation;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// One completed computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HistoryEntry {
    /// Left operand as entered
    pub left: String,
    /// Operation applied
    pub operation: Operation,
    /// Right operand as entered
    pub right: String,
    /// Formatted result
    pub result: String,
}

impl HistoryEntry {
    /// Creates a new history entry
    #[must_use]
    pub fn new(left: &str, operation: Operation, right: &str, result: &str) -> Self {
        Self {
            left: left.to_string(),
            operation,
            right: right.to_string(),
            result: result.to_string(),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.left, self.operation, self.right, self.result
        )
    }
}

impl FromStr for HistoryEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || format!("malformed history entry: {s:?}");
        let (expression, result) = s.split_once(" = ").ok_or_else(malformed)?;
        let mut parts = expression.split(' ');
        let (Some(left), Some(symbol), Some(right), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let mut symbol_chars = symbol.chars();
        let operation = match (symbol_chars.next(), symbol_chars.next()) {
            (Some(c), None) => Operation::from_symbol(c).ok_or_else(malformed)?,
            _ => return Err(malformed()),
        };

        let result = result.trim();
        if left.is_empty() || right.is_empty() || result.is_empty() {
            return Err(malformed());
        }
        Ok(Self::new(left, operation, right, result))
    }
}

impl TryFrom<String> for HistoryEntry {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HistoryEntry> for String {
    fn from(entry: HistoryEntry) -> Self {
        entry.to_string()
    }
}

/// Bounded history, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Default maximum history size
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Creates a history with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a history holding at most `capacity` entries
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild from entries listed newest first, dropping any beyond capacity
    #[must_use]
    pub fn from_newest_first(capacity: usize, entries: Vec<HistoryEntry>) -> Self {
        let mut history = Self::with_capacity(capacity);
        history.entries.extend(entries.into_iter().take(capacity));
        history
    }

    /// Record a new entry at the front, evicting the oldest past capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clears all history entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Entries as owned values, newest first
    #[must_use]
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Display strings, newest first
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u32) -> HistoryEntry {
        HistoryEntry::new(&n.to_string(), Operation::Add, "0", &n.to_string())
    }

    #[test]
    fn test_entry_display() {
        let e = HistoryEntry::new("5", Operation::Multiply, "3", "15");
        assert_eq!(e.to_string(), "5 × 3 = 15");
    }

    #[test]
    fn test_entry_parse() {
        let e: HistoryEntry = "-2 - 3.5 = -5.5".parse().unwrap();
        assert_eq!(e, HistoryEntry::new("-2", Operation::Subtract, "3.5", "-5.5"));
    }

    #[test]
    fn test_entry_parse_ascii_operator() {
        let e: HistoryEntry = "8 / 2 = 4".parse().unwrap();
        assert_eq!(e.operation, Operation::Divide);
        assert_eq!(e.to_string(), "8 ÷ 2 = 4");
    }

    #[test]
    fn test_entry_parse_rejects_garbage() {
        for text in ["", "5 + 3", "5 + = 8", "5 ^ 3 = 125", "5 + 3 + 1 = 9", "5 ++ 3 = 8"] {
            assert!(text.parse::<HistoryEntry>().is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_entry_serializes_as_string() {
        let e = HistoryEntry::new("1", Operation::Add, "1", "2");
        assert_eq!(serde_json::to_string(&e).unwrap(), "\"1 + 1 = 2\"");
        let back: HistoryEntry = serde_json::from_str("\"1 + 1 = 2\"").unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_entry_deserialize_rejects_non_string() {
        assert!(serde_json::from_str::<HistoryEntry>("42").is_err());
    }

    #[test]
    fn test_history_new() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), History::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_history_newest_first() {
        let mut history = History::new();
        history.push(entry(1));
        history.push(entry(2));
        assert_eq!(history.to_vec(), vec![entry(2), entry(1)]);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = History::with_capacity(3);
        for n in 1..=5 {
            history.push(entry(n));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.to_vec(), vec![entry(5), entry(4), entry(3)]);
    }

    #[test]
    fn test_history_from_newest_first_truncates() {
        let history = History::from_newest_first(2, vec![entry(9), entry(8), entry(7)]);
        assert_eq!(history.to_vec(), vec![entry(9), entry(8)]);
    }

    #[test]
    fn test_history_lines_and_clear() {
        let mut history = History::new();
        history.push(HistoryEntry::new("2", Operation::Divide, "4", "0.5"));
        assert_eq!(history.lines(), vec!["2 ÷ 4 = 0.5".to_string()]);
        history.clear();
        assert!(history.is_empty());
    }
}
