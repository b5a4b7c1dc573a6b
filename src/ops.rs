use std::fmt;
use std::str;

use crate::config::*;
use crate::errors::*;
use crate::value::*;

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Binary operators that can wait for their second operand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Symbol used in the pending expression and in history
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    /// Evaluates `lhs op rhs` without normalizing the result
    pub fn apply(self, lhs: Value, rhs: Value) -> CalcResult {
        match self {
            Operator::Add => lhs.addition(rhs),
            Operator::Subtract => lhs.subtract(rhs),
            Operator::Multiply => lhs.multiply(rhs),
            Operator::Divide => lhs.divide(rhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl str::FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" | "−" => Ok(Operator::Subtract),
            "*" | "×" | "x" | "X" => Ok(Operator::Multiply),
            "/" | "÷" | ":" => Ok(Operator::Divide),
            _ => Err(CalcError::InvalidOperation(s.to_string())),
        }
    }
}

/// Unary functions applied to the displayed value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    Square,
    Reciprocal,
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
    Exp,
    Factorial,
    Abs,
    Percent,
}

const FUNCTIONS: [Function; 12] = [
    Function::Sqrt,
    Function::Square,
    Function::Reciprocal,
    Function::Sin,
    Function::Cos,
    Function::Tan,
    Function::Log,
    Function::Ln,
    Function::Exp,
    Function::Factorial,
    Function::Abs,
    Function::Percent,
];

lazy_static! {
    // lowercase names and button labels
    static ref FUNCTION_NAMES: HashMap<&'static str, Function> = {
        let mut names = HashMap::new();
        for func in FUNCTIONS.iter() {
            names.insert(func.name(), *func);
            names.insert(func.label(), *func);
        }
        names
    };
}

impl Function {
    /// All supported functions in keypad order
    pub fn all() -> &'static [Function] {
        &FUNCTIONS
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sqrt => "sqrt",
            Function::Square => "square",
            Function::Reciprocal => "reciprocal",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Log => "log",
            Function::Ln => "ln",
            Function::Exp => "exp",
            Function::Factorial => "factorial",
            Function::Abs => "abs",
            Function::Percent => "percent",
        }
    }

    /// Short label for a keypad button
    pub fn label(self) -> &'static str {
        match self {
            Function::Sqrt => "√",
            Function::Square => "x²",
            Function::Reciprocal => "1/x",
            Function::Factorial => "n!",
            Function::Abs => "|x|",
            Function::Percent => "%",
            _ => self.name(),
        }
    }

    /// Evaluates the function without normalizing the result
    pub fn apply(self, v: Value, mode: AngleMode) -> CalcResult {
        match self {
            Function::Sqrt => v.sqrt(),
            Function::Square => v.sqr(),
            Function::Reciprocal => v.reciprocal(),
            Function::Sin => v.sin(mode),
            Function::Cos => v.cos(mode),
            Function::Tan => v.tan(mode),
            Function::Log => v.log(),
            Function::Ln => v.ln(),
            Function::Exp => v.exp(),
            Function::Factorial => v.fact(),
            Function::Abs => v.abs(),
            Function::Percent => v.percent(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl str::FromStr for Function {
    type Err = CalcError;

    /// Accepts both function names and button labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let low = s.trim().to_lowercase();
        match FUNCTION_NAMES.get(low.as_str()) {
            Some(func) => Ok(*func),
            None => Err(CalcError::InvalidOperation(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_operator_str() {
        assert_eq!("+".parse::<Operator>(), Ok(Operator::Add));
        assert_eq!("-".parse::<Operator>(), Ok(Operator::Subtract));
        assert_eq!("×".parse::<Operator>(), Ok(Operator::Multiply));
        assert_eq!("*".parse::<Operator>(), Ok(Operator::Multiply));
        assert_eq!(" / ".parse::<Operator>(), Ok(Operator::Divide));
        assert_eq!("%%".parse::<Operator>(), Err(CalcError::InvalidOperation("%%".to_string())));
        assert_eq!(format!("{}", Operator::Divide), "÷");
    }

    #[test]
    fn test_operator_apply() {
        let v = Operator::Subtract.apply(Value::from(3i64), Value::from(10i64));
        assert_eq!(v, Ok(Value::Int(BigInt::from(-7))));
        let v = Operator::Divide.apply(Value::from(3i64), Value::from(0i64));
        assert_eq!(v, Err(CalcError::DivisionByZero("3".to_string())));
    }

    #[test]
    fn test_function_str() {
        assert_eq!("sqrt".parse::<Function>(), Ok(Function::Sqrt));
        assert_eq!("√".parse::<Function>(), Ok(Function::Sqrt));
        assert_eq!("FACTORIAL".parse::<Function>(), Ok(Function::Factorial));
        assert_eq!("n!".parse::<Function>(), Ok(Function::Factorial));
        assert_eq!("1/x".parse::<Function>(), Ok(Function::Reciprocal));
        assert_eq!("cot".parse::<Function>(), Err(CalcError::InvalidOperation("cot".to_string())));
        assert_eq!(Function::all().len(), 12);
        for func in Function::all() {
            assert_eq!(func.name().parse::<Function>(), Ok(*func));
            assert_eq!(func.label().parse::<Function>(), Ok(*func));
        }
        assert_eq!(" Tan ".parse::<Function>(), Ok(Function::Tan));
        assert_eq!("X²".parse::<Function>(), Ok(Function::Square));
    }

    #[test]
    fn test_function_apply() {
        let v = Function::Factorial.apply(Value::from(5i64), AngleMode::Degrees);
        assert_eq!(v, Ok(Value::Int(BigInt::from(120))));
        let v = Function::Sin.apply(Value::from(0i64), AngleMode::Radians);
        assert_eq!(v, Ok(Value::Float(0.0)));
    }
}
