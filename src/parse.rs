use num_bigint::BigInt;
use num_rational::BigRational;
use pest::iterators::Pair;
use pest::Parser;
use std::str;

use crate::errors::*;
use crate::value::*;

#[derive(Parser)]
#[grammar = "entry.pest"]
pub struct EntryParser;

/// Numbers with more integer digits than this are rejected with `Overflow`.
/// Numbers below `10^-MAX_EXPONENT` are read as zero
pub const MAX_EXPONENT: i64 = 4000;
// keeps scale arithmetic far from i64 limits
const EXPONENT_CAP: i64 = i64::MAX / 4;

fn parse_exponent(pair: Pair<Rule>) -> i64 {
    let mut negative = false;
    let mut pow: i64 = 0;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::sign => negative = p.as_str() == "-",
            // too many digits to fit i64
            Rule::exp_digits => pow = p.as_str().parse().unwrap_or(EXPONENT_CAP).min(EXPONENT_CAP),
            _ => {}
        }
    }
    if negative {
        -pow
    } else {
        pow
    }
}

/// Converts display text to an exact value.
/// Supported formats:
/// * Integer number - `1234`, `-12`
/// * Decimal number - `0.25`, `.25`, `3.`
/// * Number with exponent - `1.5e-3`, `2E10`
///
/// Comma(,) can be used instead of decimal point(.), and digits
/// can be separated with underscores or spaces: `1 000_000,5`
pub fn parse_number(s: &str) -> CalcResult {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let number = match EntryParser::parse(Rule::number, &cleaned) {
        Ok(mut pairs) => match pairs.next() {
            Some(p) => p,
            None => return Err(CalcError::ParseFailed(s.to_string())),
        },
        Err(..) => return Err(CalcError::ParseFailed(s.to_string())),
    };

    let mut negative = false;
    let mut digits = String::new();
    // number = digits * 10^-scale
    let mut scale: i64 = 0;
    for pair in number.into_inner() {
        match pair.as_rule() {
            Rule::sign => negative = pair.as_str() == "-",
            Rule::int_part => digits.push_str(pair.as_str()),
            Rule::frac_part => {
                digits.push_str(pair.as_str());
                scale += pair.as_str().len() as i64;
            }
            Rule::exponent => scale -= parse_exponent(pair),
            _ => {}
        }
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(Value::new());
    }
    // digits before the decimal point
    let magnitude = significant.len() as i64 - scale;
    if magnitude > MAX_EXPONENT {
        return Err(CalcError::Overflow);
    }
    if magnitude < -MAX_EXPONENT {
        return Ok(Value::new());
    }

    let mut n: BigInt = match significant.parse() {
        Ok(n) => n,
        Err(..) => return Err(CalcError::ParseFailed(s.to_string())),
    };
    if negative {
        n = -n;
    }
    if scale > 0 {
        Ok(Value::from(BigRational::new(n, pow10(scale as usize))))
    } else {
        Ok(Value::Int(n * pow10((-scale) as usize)))
    }
}

impl str::FromStr for Value {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_number(s)
    }
}
