use std::f64::consts;
use std::str;

use crate::errors::*;

/// Number of fractional digits kept after every evaluation
pub const DEFAULT_PRECISION: usize = 10;

/// How trigonometric functions interpret their argument
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleMode {
    Degrees,
    Radians,
}

impl Default for AngleMode {
    fn default() -> AngleMode {
        AngleMode::Degrees
    }
}

impl AngleMode {
    pub fn to_radians(self, f: f64) -> f64 {
        match self {
            AngleMode::Degrees => f * consts::PI / 180.0,
            AngleMode::Radians => f,
        }
    }
}

impl str::FromStr for AngleMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "degrees" | "deg" | "d" => Ok(AngleMode::Degrees),
            "radians" | "rad" | "r" => Ok(AngleMode::Radians),
            _ => Err(CalcError::InvalidOperation(s.to_string())),
        }
    }
}

/// Engine settings. Loading and saving them is up to the application
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub precision: usize,
    pub angle_mode: AngleMode,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            precision: DEFAULT_PRECISION,
            angle_mode: AngleMode::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Default::default()
    }
}
