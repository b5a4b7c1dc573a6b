use dtoa;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::str;

use crate::config::*;
use crate::errors::*;
use crate::parse;

/// Calculation result: either value or error
pub type CalcResult = Result<Value, CalcError>;
pub type CalcErrorResult = Result<(), CalcError>;

/// The largest argument of `fact`: 171! does not fit f64 range
pub const MAX_FACTORIAL: u32 = 170;
// beyond this the result is infinite or zero for any base except -1, 0, and 1
const MAX_EXACT_EXPONENT: i64 = 1100;

/// Supported value types
#[derive(Clone)]
pub enum Value {
    /// Big integer number
    Int(BigInt),
    /// Rational number. Decimal input is stored here exactly
    Ratio(BigRational),
    /// Raw result of a transcendental function. `normalize` turns it into `Int` or `Ratio`
    Float(f64),
}

const F64_BUF_LEN: usize = 48;
pub(crate) fn format_f64(g: f64) -> String {
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

pub(crate) fn pow10(n: usize) -> BigInt {
    num_traits::pow(BigInt::from(10), n)
}

fn round_ratio(r: &BigRational, precision: usize) -> BigRational {
    let scale = BigRational::from_integer(pow10(precision));
    (r * &scale).round() / scale
}

// plain decimal notation, rounded to `precision` digits, no trailing zeros
fn format_ratio(r: &BigRational, precision: usize) -> String {
    let scaled = (r * BigRational::from_integer(pow10(precision))).round().to_integer();
    let sign = if scaled.is_negative() { "-" } else { "" };
    let mut digits = scaled.abs().to_string();
    if digits.len() <= precision {
        digits = format!("{}{}", "0".repeat(precision + 1 - digits.len()), digits);
    }
    let (int_part, frac_part) = digits.split_at(digits.len() - precision);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        format!("{}{}", sign, int_part)
    } else {
        format!("{}{}.{}", sign, int_part, frac_part)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Int(ref i) => write!(f, "{}", i),
            Value::Ratio(ref r) => {
                let precision = f.precision().unwrap_or(DEFAULT_PRECISION);
                write!(f, "{}", format_ratio(r, precision))
            }
            Value::Float(ref g) => write!(f, "{}", format_f64(*g)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Int(ref i) => write!(f, "Int({:?})", i),
            Value::Ratio(ref r) => write!(f, "Ratio({:?})", r),
            Value::Float(ref g) => write!(f, "Float({:?})", g),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, &other) {
            (Value::Int(ref i1), Value::Int(ref i2)) => i1 == i2,
            (Value::Ratio(ref r1), Value::Ratio(ref r2)) => r1 == r2,
            (Value::Float(ref f1), Value::Float(ref f2)) => f1 == f2,
            (_, _) => false,
        }
    }
}

impl Default for Value {
    fn default() -> Value {
        Value::Int(BigInt::zero())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(BigInt::from(i))
    }
}

impl From<BigRational> for Value {
    fn from(r: BigRational) -> Value {
        Value::Ratio(r).simplify()
    }
}

fn int_to_f64(i: &BigInt) -> Result<f64, CalcError> {
    match i.to_f64() {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(CalcError::Overflow),
    }
}

fn f64_to_int(f: f64) -> Result<BigInt, CalcError> {
    if let Some(i) = BigInt::from_f64(f) {
        Ok(i)
    } else {
        Err(CalcError::Overflow)
    }
}

fn f64_to_ratio(f: f64) -> Result<BigRational, CalcError> {
    if let Some(r) = BigRational::from_float(f) {
        Ok(r)
    } else {
        Err(CalcError::Overflow)
    }
}

fn ratio_to_f64(r: &BigRational) -> Result<f64, CalcError> {
    if r.is_zero() {
        return Ok(0.0);
    }
    // extract the integer part first to avoid float overflow
    // in case of very long numer and denom
    let i = int_to_f64(&r.to_integer())?;
    let r = r.fract();
    let n = r.numer().to_f64().unwrap_or(f64::INFINITY);
    let d = r.denom().to_f64().unwrap_or(f64::INFINITY);
    let f = if n.is_finite() { i + n / d } else { i };
    if f.is_finite() {
        Ok(f)
    } else {
        Err(CalcError::Overflow)
    }
}

macro_rules! basic_op {
    ($id:ident, $op:tt) => {
        pub fn $id(self, rhs: Value) -> CalcResult {
            match (&self, &rhs) {
                (Value::Int(i1), Value::Int(i2)) => Ok(Value::Int(i1 $op i2)),
                _ => {
                    let r1 = self.into_raw_ratio()?;
                    let r2 = rhs.into_raw_ratio()?;
                    Ok(Value::Ratio(r1 $op r2).simplify())
                }
            }
        }
    };
}

macro_rules! trig_op {
    ($id:ident) => {
        pub fn $id(self, mode: AngleMode) -> CalcResult {
            let f = self.into_raw_f64()?;
            Ok(Value::Float(mode.to_radians(f).$id()))
        }
    };
}

macro_rules! log_op {
    ($id:ident, $name:expr, $f64fn:ident) => {
        pub fn $id(self) -> CalcResult {
            if !self.is_positive() {
                return Err(self.invalid($name));
            }
            let f = self.into_raw_f64()?;
            Ok(Value::Float(f.$f64fn()))
        }
    };
}

impl Value {
    pub fn new() -> Self {
        Default::default()
    }

    /// Converts a binary float through its shortest decimal form,
    /// so `0.1` becomes exactly one tenth
    pub fn from_f64(f: f64) -> CalcResult {
        if f.is_nan() {
            return Err(CalcError::ParseFailed(format!("{}", f)));
        }
        if f.is_infinite() {
            return Err(CalcError::Overflow);
        }
        parse::parse_number(&format_f64(f))
    }

    // --------------------------------

    fn simplify(self) -> Value {
        match self {
            Value::Ratio(r) => {
                if r.is_integer() {
                    Value::Int(r.to_integer())
                } else {
                    Value::Ratio(r)
                }
            }
            other => other,
        }
    }

    pub(crate) fn into_raw_f64(self) -> Result<f64, CalcError> {
        match self {
            Value::Int(i) => int_to_f64(&i),
            Value::Ratio(r) => ratio_to_f64(&r),
            Value::Float(f) => Ok(f),
        }
    }

    pub(crate) fn into_raw_ratio(self) -> Result<BigRational, CalcError> {
        match self {
            Value::Int(i) => Ok(BigRational::from_integer(i)),
            Value::Ratio(r) => Ok(r),
            Value::Float(f) => match Value::from_f64(f)? {
                Value::Int(i) => Ok(BigRational::from_integer(i)),
                Value::Ratio(r) => Ok(r),
                Value::Float(..) => Err(CalcError::ParseFailed(format_f64(f))), // unreachable
            },
        }
    }

    fn invalid(&self, func: &str) -> CalcError {
        CalcError::InvalidInput(func.to_string(), format!("{}", self))
    }

    //---------------------------------------------

    /// Returns true if the value is zero
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(ref i) => i.is_zero(),
            Value::Ratio(ref r) => r.is_zero(),
            Value::Float(ref f) => *f == 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Value::Int(ref i) => i.is_negative(),
            Value::Ratio(ref r) => r.is_negative(),
            Value::Float(ref f) => *f < 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Value::Int(ref i) => i.is_positive(),
            Value::Ratio(ref r) => r.is_positive(),
            Value::Float(ref f) => *f > 0.0,
        }
    }

    /// Prepares a result for display: an integral value becomes `Int`,
    /// anything else is rounded to `precision` fractional digits.
    /// Values outside f64 range are rejected with `Overflow`
    pub fn normalize(self, precision: usize) -> CalcResult {
        let v = match self {
            Value::Int(..) => self,
            Value::Ratio(r) => Value::Ratio(round_ratio(&r, precision)).simplify(),
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(CalcError::Overflow);
                }
                if f.fract() == 0.0 {
                    Value::Int(f64_to_int(f)?)
                } else {
                    let r = f64_to_ratio(f)?;
                    Value::Ratio(round_ratio(&r, precision)).simplify()
                }
            }
        };
        v.check_range()?;
        Ok(v)
    }

    fn check_range(&self) -> CalcErrorResult {
        match self {
            Value::Int(i) => int_to_f64(i).map(|_| ()),
            Value::Ratio(r) => ratio_to_f64(r).map(|_| ()),
            Value::Float(f) => {
                if f.is_finite() {
                    Ok(())
                } else {
                    Err(CalcError::Overflow)
                }
            }
        }
    }

    basic_op!(addition, +);
    basic_op!(subtract, -);
    basic_op!(multiply, *);

    /// Exact division: integers and decimals produce a rational number
    pub fn divide(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero(format!("{}", self)));
        }
        let r1 = self.into_raw_ratio()?;
        let r2 = rhs.into_raw_ratio()?;
        Ok(Value::Ratio(r1 / r2).simplify())
    }

    /// Returns absolute value of a number
    pub fn abs(self) -> CalcResult {
        match &self {
            Value::Int(i) => Ok(Value::Int(i.abs())),
            Value::Ratio(r) => Ok(Value::Ratio(r.abs())),
            Value::Float(f) => Ok(Value::Float(f.abs())),
        }
    }

    /// Squares the value
    pub fn sqr(self) -> CalcResult {
        match &self {
            Value::Int(i) => Ok(Value::Int(i * i)),
            Value::Ratio(r) => Ok(Value::Ratio(r * r)),
            Value::Float(f) => Ok(Value::Float(f * f)),
        }
    }

    /// Returns square root of a number. Perfect squares (including
    /// fractions like `0.25`) stay exact
    pub fn sqrt(self) -> CalcResult {
        if self.is_negative() {
            return Err(self.invalid("sqrt"));
        }
        match &self {
            Value::Int(i) => {
                let sq = i.sqrt();
                if &sq * &sq == *i {
                    Ok(Value::Int(sq))
                } else {
                    let f = int_to_f64(i)?;
                    Ok(Value::Float(f.sqrt()))
                }
            }
            Value::Ratio(r) => {
                let n = r.numer().sqrt();
                let d = r.denom().sqrt();
                if &n * &n == *r.numer() && &d * &d == *r.denom() {
                    Ok(Value::Ratio(BigRational::new(n, d)).simplify())
                } else {
                    let f = ratio_to_f64(r)?;
                    Ok(Value::Float(f.sqrt()))
                }
            }
            Value::Float(f) => Ok(Value::Float(f.sqrt())),
        }
    }

    /// Returns `1 / value`
    pub fn reciprocal(self) -> CalcResult {
        Value::Int(BigInt::one()).divide(self)
    }

    /// Returns `value / 100`
    pub fn percent(self) -> CalcResult {
        self.divide(Value::Int(BigInt::from(100)))
    }

    /// Returns `percent` percents of the value
    pub fn percentage_of(self, percent: Value) -> CalcResult {
        let v = self.multiply(percent)?;
        v.divide(Value::Int(BigInt::from(100)))
    }

    /// Returns factorial of a non-negative integer number.
    /// Float and rational numbers are accepted only if they are integral
    pub fn fact(self) -> CalcResult {
        let n = match &self {
            Value::Int(i) => i.clone(),
            Value::Ratio(r) if r.is_integer() => r.to_integer(),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => f64_to_int(*f)?,
            _ => return Err(self.invalid("factorial")),
        };
        if n.is_negative() {
            return Err(self.invalid("factorial"));
        }
        if n > BigInt::from(MAX_FACTORIAL) {
            return Err(CalcError::Overflow);
        }

        let mut res = BigInt::one();
        let mut cnt = BigInt::from(1);
        while cnt <= n {
            res *= cnt.clone();
            cnt += BigInt::one();
        }
        Ok(Value::Int(res))
    }

    /// Returns `e` raised to the power of the value
    pub fn exp(self) -> CalcResult {
        let f = self.into_raw_f64()?;
        let e = f.exp();
        if e.is_infinite() {
            return Err(CalcError::Overflow);
        }
        Ok(Value::Float(e))
    }

    log_op!(ln, "ln", ln);
    log_op!(log, "log", log10);

    trig_op!(sin);
    trig_op!(cos);
    trig_op!(tan);

    fn fast_power(self, pow: i64) -> CalcResult {
        if pow == 0 {
            return Ok(Value::Int(BigInt::one()));
        }
        let inv = pow < 0;
        let mut pow = pow.abs();

        let mut res = Value::Int(BigInt::one());
        let mut base = self;
        while pow > 0 {
            if pow % 2 == 0 {
                pow /= 2;
                base = base.clone().multiply(base)?;
            } else {
                pow -= 1;
                res = res.multiply(base.clone())?;
            }
        }
        if inv {
            return Value::Int(BigInt::one()).divide(res);
        }
        Ok(res)
    }

    /// Raises a number into arbitrary power.
    /// Integer powers are calculated exactly, any other power goes through f64
    pub fn power(self, rhs: Value) -> CalcResult {
        let exact = match &rhs {
            Value::Int(i) => i.to_i64(),
            Value::Float(f) if f.fract() == 0.0 => f.to_i64(),
            _ => None,
        };
        match exact {
            Some(pow) if pow.abs() <= MAX_EXACT_EXPONENT => {
                if pow < 0 && self.is_zero() {
                    return Err(CalcError::DivisionByZero(format!("{}", self)));
                }
                let approx = self.clone().into_raw_f64()?;
                if approx.powi(pow as i32).is_infinite() {
                    return Err(CalcError::Overflow);
                }
                self.fast_power(pow)
            }
            _ => {
                let base = self.clone().into_raw_f64()?;
                let pow = rhs.into_raw_f64()?;
                if base == 0.0 && pow < 0.0 {
                    return Err(CalcError::DivisionByZero(format!("{}", self)));
                }
                let f = base.powf(pow);
                if f.is_nan() {
                    return Err(self.invalid("power"));
                }
                if f.is_infinite() {
                    return Err(CalcError::Overflow);
                }
                Ok(Value::Float(f))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Value {
        Value::Int(BigInt::from(i))
    }
    fn ratio(n: i64, d: i64) -> Value {
        Value::Ratio(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    #[test]
    fn test_add() {
        let r = int(3).addition(int(4));
        assert_eq!(r, Ok(int(7)));
        let r = ratio(1, 10).addition(ratio(2, 10));
        assert_eq!(r, Ok(ratio(3, 10)));
        let r = ratio(1, 2).addition(ratio(1, 2));
        assert_eq!(r, Ok(int(1)));
        let r = Value::Float(0.1).addition(Value::Float(0.2));
        assert_eq!(r, Ok(ratio(3, 10)));
        let r = int(3).addition(Value::Float(4.5));
        assert_eq!(r, Ok(ratio(15, 2)));
    }
    #[test]
    fn test_sub() {
        let r = int(3).subtract(int(4));
        assert_eq!(r, Ok(int(-1)));
        let r = ratio(3, 10).subtract(ratio(1, 10));
        assert_eq!(r, Ok(ratio(1, 5)));
        let r = Value::Float(1.5).subtract(ratio(1, 2));
        assert_eq!(r, Ok(int(1)));
    }
    #[test]
    fn test_mul() {
        let r = int(3).multiply(int(4));
        assert_eq!(r, Ok(int(12)));
        let r = Value::Float(0.1).multiply(int(3));
        assert_eq!(r, Ok(ratio(3, 10)));
        let r = ratio(4, 5).multiply(ratio(5, 2));
        assert_eq!(r, Ok(int(2)));
    }
    #[test]
    fn test_div() {
        let r = int(12).divide(int(4));
        assert_eq!(r, Ok(int(3)));
        let r = int(10).divide(int(4));
        assert_eq!(r, Ok(ratio(5, 2)));
        let r = ratio(3, 10).divide(ratio(1, 10));
        assert_eq!(r, Ok(int(3)));
        let r = int(5).divide(int(0));
        assert_eq!(r, Err(CalcError::DivisionByZero("5".to_string())));
        let r = ratio(1, 10).divide(Value::Float(0.0));
        assert_eq!(r, Err(CalcError::DivisionByZero("0.1".to_string())));
    }
    #[test]
    fn test_normalize() {
        assert_eq!(Value::Float(2.0).normalize(10), Ok(int(2)));
        assert_eq!(Value::Float(0.1 + 0.2).normalize(10), Ok(ratio(3, 10)));
        assert_eq!(ratio(1, 3).normalize(10), Ok(ratio(3_333_333_333, 10_000_000_000)));
        assert_eq!(ratio(2, 3).normalize(2), Ok(ratio(67, 100)));
        assert_eq!(ratio(1, 3).normalize(0), Ok(int(0)));
        assert_eq!(Value::Float(-0.0).normalize(10), Ok(int(0)));
        assert_eq!(Value::Float(f64::INFINITY).normalize(10), Err(CalcError::Overflow));
        assert_eq!(Value::Int(pow10(400)).normalize(10), Err(CalcError::Overflow));
        assert_eq!(int(7).normalize(10), Ok(int(7)));
    }
    #[test]
    fn test_to_str() {
        assert_eq!(format!("{}", int(-7)), "-7");
        assert_eq!(format!("{}", ratio(1, 10)), "0.1");
        assert_eq!(format!("{}", ratio(-5, 2)), "-2.5");
        assert_eq!(format!("{}", ratio(1, 3)), "0.3333333333");
        assert_eq!(format!("{:.3}", ratio(2, 3)), "0.667");
        assert_eq!(format!("{}", ratio(-1, 1_000_000_000_000)), "0");
        assert_eq!(format!("{}", Value::Float(2.5)), "2.5");
    }
    #[test]
    fn test_from_f64() {
        assert_eq!(Value::from_f64(0.1), Ok(ratio(1, 10)));
        assert_eq!(Value::from_f64(2.0), Ok(int(2)));
        assert_eq!(Value::from_f64(-12.75), Ok(ratio(-51, 4)));
        assert_eq!(Value::from_f64(f64::INFINITY), Err(CalcError::Overflow));
        assert!(Value::from_f64(f64::NAN).is_err());
    }
    #[test]
    fn test_abs() {
        assert_eq!(int(-3).abs(), Ok(int(3)));
        assert_eq!(ratio(-1, 2).abs(), Ok(ratio(1, 2)));
        assert_eq!(Value::Float(-2.5).abs(), Ok(Value::Float(2.5)));
    }
    #[test]
    fn test_sqr() {
        assert_eq!(int(-3).sqr(), Ok(int(9)));
        assert_eq!(ratio(1, 2).sqr(), Ok(ratio(1, 4)));
    }
    #[test]
    fn test_sqrt() {
        assert_eq!(int(4).sqrt(), Ok(int(2)));
        assert_eq!(ratio(1, 4).sqrt(), Ok(ratio(1, 2)));
        assert_eq!(int(2).sqrt(), Ok(Value::Float(2.0f64.sqrt())));
        let r = int(-1).sqrt();
        assert_eq!(r, Err(CalcError::InvalidInput("sqrt".to_string(), "-1".to_string())));
        let r = int(2).sqrt().and_then(|v| v.normalize(10));
        assert_eq!(r.map(|v| format!("{}", v)), Ok("1.4142135624".to_string()));
    }
    #[test]
    fn test_reciprocal_percent() {
        assert_eq!(int(4).reciprocal(), Ok(ratio(1, 4)));
        assert_eq!(int(0).reciprocal(), Err(CalcError::DivisionByZero("1".to_string())));
        assert_eq!(int(50).percent(), Ok(ratio(1, 2)));
        assert_eq!(int(200).percentage_of(int(15)), Ok(int(30)));
    }
    #[test]
    fn test_factorial() {
        assert_eq!(int(5).fact(), Ok(int(120)));
        assert_eq!(int(0).fact(), Ok(int(1)));
        assert_eq!(Value::Float(3.0).fact(), Ok(int(6)));
        assert_eq!(int(-1).fact(), Err(CalcError::InvalidInput("factorial".to_string(), "-1".to_string())));
        assert_eq!(ratio(5, 2).fact(), Err(CalcError::InvalidInput("factorial".to_string(), "2.5".to_string())));
        assert_eq!(int(171).fact(), Err(CalcError::Overflow));
        assert!(int(170).fact().and_then(|v| v.normalize(10)).is_ok());
    }
    #[test]
    fn test_power() {
        assert_eq!(int(2).power(int(10)), Ok(int(1024)));
        assert_eq!(int(2).power(int(-2)), Ok(ratio(1, 4)));
        assert_eq!(ratio(1, 10).power(int(3)), Ok(ratio(1, 1000)));
        assert_eq!(int(0).power(int(-1)), Err(CalcError::DivisionByZero("0".to_string())));
        assert_eq!(int(10).power(int(400)), Err(CalcError::Overflow));
        assert!(int(-8).power(ratio(1, 3)).is_err());
        let r = int(4).power(ratio(1, 2)).and_then(|v| v.normalize(10));
        assert_eq!(r, Ok(int(2)));
    }
    #[test]
    fn test_logarithm() {
        assert_eq!(int(0).ln(), Err(CalcError::InvalidInput("ln".to_string(), "0".to_string())));
        assert_eq!(int(-5).log(), Err(CalcError::InvalidInput("log".to_string(), "-5".to_string())));
        assert_eq!(int(100).log().and_then(|v| v.normalize(10)), Ok(int(2)));
        assert_eq!(int(1).ln().and_then(|v| v.normalize(10)), Ok(int(0)));
    }
    #[test]
    fn test_exp() {
        assert_eq!(int(0).exp(), Ok(Value::Float(1.0)));
        assert_eq!(int(1000).exp(), Err(CalcError::Overflow));
        let r = int(1).exp().and_then(|v| v.normalize(10));
        assert_eq!(r.map(|v| format!("{}", v)), Ok("2.7182818285".to_string()));
    }
    #[test]
    fn test_trigonometry() {
        let r = int(30).sin(AngleMode::Degrees).and_then(|v| v.normalize(10));
        assert_eq!(r, Ok(ratio(1, 2)));
        let r = int(90).cos(AngleMode::Degrees).and_then(|v| v.normalize(10));
        assert_eq!(r, Ok(int(0)));
        let r = int(45).tan(AngleMode::Degrees).and_then(|v| v.normalize(10));
        assert_eq!(r, Ok(int(1)));
        assert_eq!(int(0).sin(AngleMode::Radians), Ok(Value::Float(0.0)));
    }
}
