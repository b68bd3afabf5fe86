use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete space-weather condition, ordered from calmest to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Quiet,
    Moderate,
    Storm,
    Extreme,
    SuperExtreme,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Quiet => "quiet",
            Condition::Moderate => "moderate",
            Condition::Storm => "storm",
            Condition::Extreme => "extreme",
            Condition::SuperExtreme => "super_extreme",
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Quiet
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NOAA X-ray flare class letter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlareClass {
    A,
    B,
    C,
    M,
    X,
}

impl FlareClass {
    pub fn as_char(&self) -> char {
        match self {
            FlareClass::A => 'A',
            FlareClass::B => 'B',
            FlareClass::C => 'C',
            FlareClass::M => 'M',
            FlareClass::X => 'X',
        }
    }

    /// Parse a letter, or the leading letter of a designation such as `"M2.4"`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().chars().next()?.to_ascii_uppercase() {
            'A' => Some(FlareClass::A),
            'B' => Some(FlareClass::B),
            'C' => Some(FlareClass::C),
            'M' => Some(FlareClass::M),
            'X' => Some(FlareClass::X),
            _ => None,
        }
    }
}

impl fmt::Display for FlareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

macro_rules! noaa_scale {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u8);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

noaa_scale!(
    /// Radio blackout scale, R0..R5.
    RScale,
    "R"
);
noaa_scale!(
    /// Solar radiation storm scale, S0..S5.
    SScale,
    "S"
);
noaa_scale!(
    /// Geomagnetic storm scale, G0..G5.
    GScale,
    "G"
);
