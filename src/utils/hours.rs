use std::{fmt::Display, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::humanize;

/// Non negative, finite amount of hours. Estimates and actual durations are stored using it.
///
/// Always written as a JSON number, but older documents kept typed in values as strings
/// (`"estimate": "2"`, `"actual": "1.67"`), so those are read too.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "StoredHours", into = "f64")]
pub struct Hours(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHours {
    Number(f64),
    Text(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum HoursParseError {
    #[error("{0:?} is not a number of hours")]
    NotANumber(String),
    #[error("amount of hours should be a finite non negative number, got {0}")]
    OutOfRange(f64),
}

impl Hours {
    pub fn new_opt(value: f64) -> Option<Hours> {
        if value.is_finite() && value >= 0. {
            Some(Hours(value))
        } else {
            None
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.
    }
}

impl Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", humanize(self.0))
    }
}

impl FromStr for Hours {
    type Err = HoursParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let v = s
            .parse::<f64>()
            .map_err(|_| HoursParseError::NotANumber(s.to_string()))?;
        Hours::try_from(v)
    }
}

impl TryFrom<f64> for Hours {
    type Error = HoursParseError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Hours::new_opt(value).ok_or(HoursParseError::OutOfRange(value))
    }
}

impl TryFrom<StoredHours> for Hours {
    type Error = HoursParseError;

    fn try_from(value: StoredHours) -> Result<Self, Self::Error> {
        match value {
            StoredHours::Number(v) => Hours::try_from(v),
            StoredHours::Text(s) => s.parse(),
        }
    }
}

impl From<Hours> for f64 {
    fn from(value: Hours) -> Self {
        value.0
    }
}

impl Deref for Hours {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
