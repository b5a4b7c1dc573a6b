use log::debug;

use crate::config::*;
use crate::errors::*;
use crate::ops::*;
use crate::value::*;

/// Engine state as seen by the input layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Nothing waits for a second operand
    Idle,
    /// The operator waits for its right operand
    Pending(Operator),
}

/// Chained arithmetic of a pocket calculator.
///
/// Operators are applied strictly left to right: `3 + 4 × 2 =` gives `14`.
/// Every result is normalized: integral values become integers, others are
/// rounded to `EngineConfig::precision` fractional digits.
///
/// A failed call never changes the engine state.
pub struct Engine {
    config: EngineConfig,
    accumulator: Value,
    pending: Option<Operator>,
    last_operation: Option<Operator>,
    last_operand: Option<Value>,
    reset_display: bool,
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::with_config(EngineConfig::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            config,
            accumulator: Value::new(),
            pending: None,
            last_operation: None,
            last_operand: None,
            reset_display: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces settings, e.g. after the user switches angle mode.
    /// Values already computed are not rounded again
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn accumulator(&self) -> &Value {
        &self.accumulator
    }

    pub fn pending_operation(&self) -> Option<Operator> {
        self.pending
    }

    /// Operator of the last completed `submit_equals`
    pub fn last_operation(&self) -> Option<Operator> {
        self.last_operation
    }

    /// Left operand of the last completed `submit_equals`
    pub fn last_operand(&self) -> Option<&Value> {
        self.last_operand.as_ref()
    }

    pub fn state(&self) -> State {
        match self.pending {
            Some(op) => State::Pending(op),
            None => State::Idle,
        }
    }

    /// True if the next digit must start a new number instead of
    /// being appended to the displayed one
    pub fn reset_display(&self) -> bool {
        self.reset_display
    }

    /// The input layer calls it after starting a new number
    pub fn clear_reset_display(&mut self) {
        self.reset_display = false;
    }

    fn evaluate(&self, op: Operator, lhs: Value, rhs: Value) -> CalcResult {
        let v = op.apply(lhs, rhs)?;
        v.normalize(self.config.precision)
    }

    /// Handles an operator key. If another operator is pending, it is
    /// evaluated first and its result becomes the new left operand.
    /// Returns `current` unchanged: pressing an operator does not change the display
    pub fn submit_operator(&mut self, op: Operator, current: Value) -> CalcResult {
        let acc = match self.pending {
            Some(pending) => {
                let res = self.evaluate(pending, self.accumulator.clone(), current.clone());
                match res {
                    Ok(v) => v,
                    Err(e) => {
                        debug!("{} {} {} failed: {}", self.accumulator, pending, current, e);
                        return Err(e);
                    }
                }
            }
            None => current.clone(),
        };

        self.accumulator = acc;
        self.pending = Some(op);
        self.reset_display = true;
        debug!("pending {} {}", self.accumulator, op);
        Ok(current)
    }

    /// Handles the equals key. Without a pending operator it returns
    /// `current` and changes nothing. Pressing equals twice does not
    /// repeat the last operation
    pub fn submit_equals(&mut self, current: Value) -> CalcResult {
        let pending = match self.pending {
            Some(op) => op,
            None => return Ok(current),
        };

        let res = match self.evaluate(pending, self.accumulator.clone(), current.clone()) {
            Ok(v) => v,
            Err(e) => {
                debug!("{} {} {} failed: {}", self.accumulator, pending, current, e);
                return Err(e);
            }
        };
        debug!("{} {} {} = {}", self.accumulator, pending, current, res);

        self.last_operation = Some(pending);
        self.last_operand = Some(std::mem::replace(&mut self.accumulator, res.clone()));
        self.pending = None;
        self.reset_display = true;
        Ok(res)
    }

    /// Applies a unary function to `value`. The pending operator and
    /// the accumulator are not touched
    pub fn submit_function(&self, func: Function, value: Value) -> CalcResult {
        let res = func.apply(value, self.config.angle_mode);
        let res = res.and_then(|v| v.normalize(self.config.precision));
        if let Err(ref e) = res {
            debug!("{} failed: {}", func, e);
        }
        res
    }

    /// Returns `base` raised to `exponent`
    pub fn power(&self, base: Value, exponent: Value) -> CalcResult {
        let v = base.power(exponent)?;
        v.normalize(self.config.precision)
    }

    /// Returns `percent` percents of `base`
    pub fn percentage(&self, base: Value, percent: Value) -> CalcResult {
        let v = base.percentage_of(percent)?;
        v.normalize(self.config.precision)
    }

    /// Returns the engine to its initial state. Settings are kept
    pub fn clear(&mut self) {
        debug!("clear");
        self.accumulator = Value::new();
        self.pending = None;
        self.last_operation = None;
        self.last_operand = None;
        self.reset_display = false;
    }
}
