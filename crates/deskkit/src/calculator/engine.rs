//! Calculator state machine
//!
//! ```text
//! Idle --digit--> EnteringFirstOperand --op--> OperatorChosen
//!   ^                                             | digit
//!   +-----------equals------- EnteringSecondOperand
//!
//! any --divide by zero--> Error --timeout/clear--> Idle
//! ```

use super::history::{History, HistoryEntry};
use super::keymap::{action_for_key, CalcAction};
use super::operation::{parse_operand, Operation};
use super::{CalcError, CalcResult};
use crate::config::CalculatorConfig;
use crate::display::{DisplayUpdate, ThemeScope};
use crate::format::format_result;
use crate::ports::Ports;
use crate::scheduler::TaskHandle;
use crate::storage::{self, CALCULATOR_HISTORY_KEY, CALCULATOR_THEME_KEY};
use crate::theme::{Theme, ThemePreference};
use std::cell::RefCell;
use std::rc::Rc;

const ERROR_TEXT: &str = "Error";

/// Where the calculator is in its input cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing `0` or the last result
    Idle,
    /// Typing the left operand
    EnteringFirstOperand,
    /// Operation chosen, right operand still empty
    OperatorChosen,
    /// Typing the right operand
    EnteringSecondOperand,
    /// Showing `Error` until the recovery delay elapses
    Error,
}

/// What the calculator display shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorView {
    /// Main line: the operand being typed, the result, or `Error`
    pub current: String,
    /// Upper line: `"<previous> <symbol>"` while an operation is pending
    pub previous: String,
    /// Current phase
    pub phase: Phase,
}

#[derive(Debug)]
struct CalcState {
    current: String,
    previous: String,
    pending: Option<Operation>,
    phase: Phase,
    history: History,
    theme: ThemePreference,
    recovery: Option<TaskHandle>,
}

impl CalcState {
    fn reset(&mut self) {
        self.current = "0".to_string();
        self.previous.clear();
        self.pending = None;
        self.phase = Phase::Idle;
    }

    fn view(&self) -> CalculatorView {
        let previous = match self.pending {
            Some(op) => format!("{} {}", self.previous, op.symbol()),
            None => String::new(),
        };
        CalculatorView {
            current: self.current.clone(),
            previous,
            phase: self.phase,
        }
    }

    fn evaluate(&self) -> CalcResult<(Operation, f64)> {
        let op = self.pending.ok_or(CalcError::NoPendingOperation)?;
        let left = parse_operand(&self.previous)?;
        let right = parse_operand(&self.current)?;
        Ok((op, op.apply(left, right)?))
    }
}

enum Resolution {
    Computed,
    Ignored,
    Failed,
}

#[derive(Debug)]
struct Inner {
    state: RefCell<CalcState>,
    ports: Ports,
    config: CalculatorConfig,
}

impl Inner {
    fn publish(&self) {
        let view = self.state.borrow().view();
        self.ports.render(DisplayUpdate::Calculator(view));
    }

    fn publish_history(&self) {
        let lines = self.state.borrow().history.lines();
        self.ports.render(DisplayUpdate::History(lines));
    }

    fn save_history(&self, history: &History) {
        storage::save_json(
            self.ports.storage.as_ref(),
            CALCULATOR_HISTORY_KEY,
            &history.to_vec(),
        );
    }

    /// Compute the pending operation in place
    fn resolve(self: &Rc<Self>, state: &mut CalcState) -> Resolution {
        match state.evaluate() {
            Ok((op, value)) => {
                let result = format_result(value);
                let entry = HistoryEntry::new(&state.previous, op, &state.current, &result);
                tracing::debug!(%entry, "Computed");
                state.history.push(entry);
                self.save_history(&state.history);

                state.current = result;
                state.previous.clear();
                state.pending = None;
                state.phase = Phase::Idle;
                Resolution::Computed
            }
            Err(e @ (CalcError::DivisionByZero | CalcError::NonFinite(_))) => {
                tracing::debug!(error = %e, "Entering error state");
                self.enter_error(state);
                Resolution::Failed
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring compute request");
                Resolution::Ignored
            }
        }
    }

    fn enter_error(self: &Rc<Self>, state: &mut CalcState) {
        self.ports.cancel(&mut state.recovery);
        state.current = ERROR_TEXT.to_string();
        state.previous.clear();
        state.pending = None;
        state.phase = Phase::Error;

        let weak = Rc::downgrade(self);
        state.recovery = Some(self.ports.after(
            self.config.error_recovery(),
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.recover();
                }
            }),
        ));
    }

    fn recover(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.recovery = None;
            if state.phase != Phase::Error {
                return;
            }
            state.reset();
        }
        tracing::debug!("Recovered from error state");
        self.publish();
    }
}

/// Calculator engine handle. Clones share the same calculator.
#[derive(Debug, Clone)]
pub struct CalculatorEngine {
    inner: Rc<Inner>,
}

impl CalculatorEngine {
    /// Create a calculator, restoring history and theme from storage
    #[must_use]
    pub fn new(ports: Ports, config: CalculatorConfig) -> Self {
        let store = ports.storage.as_ref();
        let history = storage::load_json::<Vec<HistoryEntry>>(store, CALCULATOR_HISTORY_KEY)
            .map(|entries| History::from_newest_first(config.history_capacity, entries))
            .unwrap_or_else(|| History::with_capacity(config.history_capacity));
        let theme = ThemePreference::load(store, CALCULATOR_THEME_KEY);
        tracing::debug!(
            history = history.len(),
            capacity = history.capacity(),
            theme = %theme.theme(),
            "Calculator restored"
        );

        let state = CalcState {
            current: "0".to_string(),
            previous: String::new(),
            pending: None,
            phase: Phase::Idle,
            history,
            theme,
            recovery: None,
        };
        let engine = Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                ports,
                config,
            }),
        };

        engine.inner.publish();
        engine.inner.publish_history();
        engine.publish_theme();
        engine
    }

    /// Append a digit or `.` to the current operand.
    ///
    /// A second `.` is ignored and a lone `0` is replaced by a digit.
    pub fn append_digit(&self, digit: char) {
        if !(digit.is_ascii_digit() || digit == '.') {
            return;
        }
        {
            let mut state = self.inner.state.borrow_mut();
            if state.phase == Phase::Error {
                return;
            }
            if digit == '.' && state.current.contains('.') {
                return;
            }
            if state.current == "0" && digit != '.' {
                state.current = digit.to_string();
            } else {
                state.current.push(digit);
            }
            state.phase = if state.pending.is_some() {
                Phase::EnteringSecondOperand
            } else {
                Phase::EnteringFirstOperand
            };
        }
        self.inner.publish();
    }

    /// Choose the next operation, resolving a pending one first.
    ///
    /// With no right operand yet, the new operation replaces the pending one.
    pub fn choose_operation(&self, op: Operation) {
        let mut computed = false;
        {
            let mut state = self.inner.state.borrow_mut();
            if state.phase == Phase::Error {
                return;
            }
            if state.current.is_empty() {
                if state.pending.is_none() {
                    return;
                }
                state.pending = Some(op);
            } else {
                if state.pending.is_some() {
                    match self.inner.resolve(&mut state) {
                        Resolution::Computed => computed = true,
                        Resolution::Ignored => return,
                        Resolution::Failed => {
                            drop(state);
                            self.inner.publish();
                            return;
                        }
                    }
                }
                state.pending = Some(op);
                state.previous = std::mem::take(&mut state.current);
                state.phase = Phase::OperatorChosen;
            }
        }
        self.inner.publish();
        if computed {
            self.inner.publish_history();
        }
    }

    /// Compute the pending operation.
    ///
    /// Unparseable operands or a missing operation leave the state untouched.
    /// Division by zero shows `Error`, which clears itself after the
    /// configured delay.
    pub fn compute_result(&self) {
        let resolution = {
            let mut state = self.inner.state.borrow_mut();
            if state.phase == Phase::Error {
                return;
            }
            self.inner.resolve(&mut state)
        };
        match resolution {
            Resolution::Computed => {
                self.inner.publish();
                self.inner.publish_history();
            }
            Resolution::Failed => self.inner.publish(),
            Resolution::Ignored => {}
        }
    }

    /// Remove the last character; an emptied operand becomes `0`
    pub fn delete_last_char(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.phase == Phase::Error {
                return;
            }
            state.current.pop();
            if state.current.is_empty() {
                state.current = "0".to_string();
            }
            state.phase = if state.pending.is_some() {
                Phase::EnteringSecondOperand
            } else if state.current == "0" {
                Phase::Idle
            } else {
                Phase::EnteringFirstOperand
            };
        }
        self.inner.publish();
    }

    /// Reset to `0` with nothing pending. Also leaves the Error state early.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            let state = &mut *state;
            self.inner.ports.cancel(&mut state.recovery);
            state.reset();
        }
        self.inner.publish();
    }

    /// Forget and persist an empty history
    pub fn clear_history(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.history.clear();
            self.inner.save_history(&state.history);
        }
        self.inner.publish_history();
    }

    /// Flip and persist the calculator theme
    pub fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut state = self.inner.state.borrow_mut();
            state.theme.toggle(self.inner.ports.storage.as_ref())
        };
        self.publish_theme();
        theme
    }

    /// Apply a button or key action
    pub fn dispatch(&self, action: CalcAction) {
        match action {
            CalcAction::Digit(_) | CalcAction::Decimal => {
                if let Some(c) = action.to_char() {
                    self.append_digit(c);
                }
            }
            CalcAction::Operator(op) => self.choose_operation(op),
            CalcAction::Equals => self.compute_result(),
            CalcAction::Clear => self.clear(),
            CalcAction::Delete => self.delete_last_char(),
        }
    }

    /// Apply a keyboard key. Returns whether the key is a calculator key.
    pub fn handle_key(&self, key: &str) -> bool {
        match action_for_key(key) {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Current display
    #[must_use]
    pub fn view(&self) -> CalculatorView {
        self.inner.state.borrow().view()
    }

    /// Operand being typed, or the last result
    #[must_use]
    pub fn current_operand(&self) -> String {
        self.inner.state.borrow().current.clone()
    }

    /// Left operand while an operation is pending
    #[must_use]
    pub fn previous_operand(&self) -> String {
        self.inner.state.borrow().previous.clone()
    }

    /// Pending operation
    #[must_use]
    pub fn pending_operation(&self) -> Option<Operation> {
        self.inner.state.borrow().pending
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    /// History, newest first
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.state.borrow().history.to_vec()
    }

    /// Current theme
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.inner.state.borrow().theme.theme()
    }

    fn publish_theme(&self) {
        let theme = self.theme();
        self.inner.ports.render(DisplayUpdate::Theme {
            scope: ThemeScope::Calculator,
            theme,
        });
    }
}
