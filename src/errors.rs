use std::error;
use std::fmt;

#[derive(Clone, PartialEq)]
pub enum CalcError {
    DivisionByZero(String),
    InvalidInput(String, String),
    InvalidOperation(String),
    Overflow,

    ParseFailed(String),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::DivisionByZero(s) => write!(f, "Cannot divide '{}' by zero", s),
            CalcError::InvalidInput(func, val) => match func.as_str() {
                "sqrt" => write!(f, "Cannot calculate square root of negative number {}", val),
                "log" | "ln" => write!(f, "Logarithm undefined for non-positive number {}", val),
                "factorial" => write!(f, "Factorial only defined for non-negative integers, got {}", val),
                _ => write!(f, "Invalid argument {} for function '{}'", val, func),
            },
            CalcError::InvalidOperation(s) => write!(f, "Invalid operation '{}'", s),
            CalcError::Overflow => write!(f, "Number too large"),

            CalcError::ParseFailed(s) => write!(f, "Failed to read '{}' as a number", s),
        }
    }
}

impl fmt::Debug for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::DivisionByZero(s) => write!(f, "DivisionByZero({:?})", s),
            CalcError::InvalidInput(func, val) => write!(f, "InvalidInput({:?}, {:?})", func, val),
            CalcError::InvalidOperation(s) => write!(f, "InvalidOperation({:?})", s),
            CalcError::Overflow => write!(f, "Overflow"),
            CalcError::ParseFailed(s) => write!(f, "ParseFailed({:?})", s),
        }
    }
}

impl error::Error for CalcError {}
