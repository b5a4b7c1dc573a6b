//! # Pocket calculator engine
//!
//! The engine implements the arithmetic of a desktop calculator keypad:
//! digits are typed into an entry, operators are applied strictly from
//! left to right, and the equals key completes the pending operation.
//! `3 + 4 × 2 =` gives `14`, not `11`.
//!
//! All arithmetic is exact: numbers typed in decimal notation are stored as
//! big integers or rational numbers, so `0.1 + 0.2` is exactly `0.3`.
//! Only transcendental functions (roots of non-square numbers, trigonometry,
//! logarithms, exponent) go through `f64`. After every operation the result
//! is normalized:
//! * integral results become integers: `1.5 × 2` -> `3`
//! * other results are rounded to 10 fractional digits: `1 ÷ 3` -> `0.3333333333`
//! * results outside `f64` range are rejected as overflow
//!
//! Binary operators: `+`, `-`, `×`, `÷`.
//!
//! The list of supported functions:
//! * square root and square: sqrt, square
//! * reciprocal: 1/x
//! * trigonometric functions: sin, cos, tan. Degrees by default, radians on request
//! * logarithms: log (base 10), ln
//! * exponent: exp
//! * factorial of non-negative integers up to 170
//! * absolute value: abs
//! * percent: `x / 100`
//!
//! `engine::Engine` is the state machine itself. `session::Session` wraps it
//! with everything a keypad needs: the typed entry, an error indicator,
//! memory register (MC, MR, M+, M-), and calculation history.
//!
//! Failures never panic. Every operation returns `Result` with one of
//! `errors::CalcError` kinds: division by zero, invalid input of a function,
//! invalid operation, overflow, or unreadable display text.

#[macro_use]
extern crate pest_derive;

pub mod config;
pub mod engine;
pub mod errors;
pub mod ops;
pub mod parse;
pub mod session;
pub mod value;
