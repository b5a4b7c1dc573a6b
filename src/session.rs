use log::debug;
use std::fmt;

use crate::config::*;
use crate::engine::*;
use crate::errors::*;
use crate::ops::*;
use crate::value::*;

/// Digits accepted in a single entry
pub const MAX_ENTRY_DIGITS: usize = 15;
/// Oldest history entries are dropped beyond this
pub const MAX_HISTORY_ENTRIES: usize = 100;
/// Shown instead of the entry after a failed calculation
pub const ERROR_DISPLAY: &str = "Error";

/// One completed calculation, e.g. `12 + 3 = 15` or `√(9) = 3`
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: Value,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.expression, self.result)
    }
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Keypad-level calculator: the text being typed, the error indicator,
/// memory register, and history around an `Engine`.
/// Every method corresponds to a key of the calculator
pub struct Session {
    engine: Engine,
    entry: String,
    error: Option<CalcError>,
    memory: Value,
    history: Vec<HistoryEntry>,
    // e.g. "12 +" while an operator is pending
    expression: String,
    // set after a function result or memory key: next digit starts a new number
    fresh_entry: bool,
}

impl Default for Session {
    fn default() -> Session {
        Session::with_config(EngineConfig::default())
    }
}

impl Session {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Session {
            engine: Engine::with_config(config),
            entry: "0".to_string(),
            error: None,
            memory: Value::new(),
            history: Vec::new(),
            expression: String::new(),
            fresh_entry: false,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        let mut config = self.engine.config().clone();
        config.angle_mode = mode;
        self.engine.set_config(config);
    }

    /// Text of the main display
    pub fn display(&self) -> &str {
        if self.error.is_some() {
            ERROR_DISPLAY
        } else {
            &self.entry
        }
    }

    /// Text of the secondary display line: the pending part of a calculation
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The failure currently shown on the display
    pub fn error(&self) -> Option<&CalcError> {
        self.error.as_ref()
    }

    pub fn memory(&self) -> &Value {
        &self.memory
    }

    /// True when the memory indicator should be lit
    pub fn has_memory(&self) -> bool {
        !self.memory.is_zero()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Value currently on the display
    pub fn current_value(&self) -> CalcResult {
        if let Some(ref e) = self.error {
            return Err(e.clone());
        }
        self.entry.parse()
    }

    fn format(&self, v: &Value) -> String {
        format!("{:.*}", self.engine.config().precision, v)
    }

    fn show(&mut self, v: &Value) {
        self.entry = self.format(v);
    }

    // returns true if typing must replace the displayed text
    fn begin_entry(&mut self) -> bool {
        let fresh = self.error.is_some() || self.fresh_entry || self.engine.reset_display();
        if fresh {
            self.error = None;
            self.fresh_entry = false;
            self.engine.clear_reset_display();
        }
        fresh
    }

    fn fail(&mut self, e: CalcError) -> CalcErrorResult {
        debug!("display error: {}", e);
        self.error = Some(e.clone());
        Err(e)
    }

    fn record(&mut self, expression: String, result: Value) {
        if self.history.len() >= MAX_HISTORY_ENTRIES {
            self.history.remove(0);
        }
        self.history.push(HistoryEntry { expression, result });
    }

    // ------------ ENTRY -----------------

    pub fn digit(&mut self, d: char) -> CalcErrorResult {
        if !d.is_ascii_digit() {
            return Err(CalcError::InvalidOperation(d.to_string()));
        }
        if self.begin_entry() || self.entry == "0" {
            self.entry = d.to_string();
        } else if self.entry == "-0" {
            self.entry = format!("-{}", d);
        } else if digit_count(&self.entry) < MAX_ENTRY_DIGITS {
            self.entry.push(d);
        }
        Ok(())
    }

    pub fn decimal_point(&mut self) {
        if self.begin_entry() {
            self.entry = "0.".to_string();
        } else if !self.entry.contains('.') {
            self.entry.push('.');
        }
    }

    pub fn backspace(&mut self) {
        if self.error.take().is_some() {
            self.entry = "0".to_string();
            return;
        }
        self.entry.pop();
        if self.entry.is_empty() || self.entry == "-" {
            self.entry = "0".to_string();
        }
    }

    pub fn toggle_sign(&mut self) {
        if self.error.is_some() {
            return;
        }
        if self.entry.starts_with('-') {
            self.entry.remove(0);
        } else if self.current_value().map(|v| !v.is_zero()).unwrap_or(false) {
            self.entry.insert(0, '-');
        }
    }

    /// Clears the typed number only
    pub fn clear_entry(&mut self) {
        self.entry = "0".to_string();
        self.error = None;
    }

    /// Clears the display and the engine. Memory and history are kept
    pub fn clear(&mut self) {
        self.clear_entry();
        self.expression.clear();
        self.fresh_entry = false;
        self.engine.clear();
    }

    // ------------ CALCULATION -----------------

    pub fn operator(&mut self, op: Operator) -> CalcErrorResult {
        let current = match self.current_value() {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };
        match self.engine.submit_operator(op, current) {
            Ok(v) => {
                self.show(&v);
                self.expression = format!("{} {}", self.format(self.engine.accumulator()), op);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn equals(&mut self) -> CalcErrorResult {
        let current = match self.current_value() {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };
        let pending = self.engine.pending_operation();
        match self.engine.submit_equals(current.clone()) {
            Ok(v) => {
                let expression = match (pending, self.engine.last_operand()) {
                    (Some(op), Some(lhs)) => Some(format!("{} {} {}", self.format(lhs), op, self.format(&current))),
                    _ => None,
                };
                if let Some(expression) = expression {
                    self.record(expression, v.clone());
                }
                self.show(&v);
                self.expression.clear();
                Ok(())
            }
            // the operator is still pending, so is its line
            Err(e) => self.fail(e),
        }
    }

    pub fn function(&mut self, func: Function) -> CalcErrorResult {
        let current = match self.current_value() {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };
        match self.engine.submit_function(func, current.clone()) {
            Ok(v) => {
                let expression = format!("{}({})", func.label(), self.format(&current));
                self.record(expression, v.clone());
                self.show(&v);
                self.fresh_entry = true;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    // ------------ MEMORY -----------------

    pub fn memory_clear(&mut self) {
        self.memory = Value::new();
    }

    pub fn memory_recall(&mut self) {
        let v = self.memory.clone();
        self.show(&v);
        self.error = None;
        self.fresh_entry = true;
    }

    pub fn memory_add(&mut self) -> CalcErrorResult {
        self.update_memory(Operator::Add)
    }

    pub fn memory_subtract(&mut self) -> CalcErrorResult {
        self.update_memory(Operator::Subtract)
    }

    fn update_memory(&mut self, op: Operator) -> CalcErrorResult {
        let current = match self.current_value() {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };
        let precision = self.engine.config().precision;
        match op.apply(self.memory.clone(), current).and_then(|v| v.normalize(precision)) {
            Ok(v) => {
                debug!("memory {}", v);
                self.memory = v;
                self.fresh_entry = true;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }
}
