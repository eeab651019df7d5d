//! Declarative value validators
//!
//! Each validator checks one scalar and returns a human readable reason on
//! failure. Validators that do not apply to a value's type pass it.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// Constraint attached to an attribute
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// String length in characters
    LengthBetween {
        /// Minimum length, inclusive
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<u32>,
        /// Maximum length, inclusive
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<u32>,
    },
    /// String must match a regular expression
    RegexMatches {
        /// Source pattern
        pattern: String,
        /// Compiled pattern
        #[serde(skip)]
        regex: Regex,
    },
    /// Number range
    Between {
        /// Minimum, inclusive
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Maximum, inclusive
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// String must be one of a fixed set
    OneOf {
        /// Allowed values
        values: Vec<String>,
    },
}

impl Validator {
    /// Compile a regex validator
    pub fn regex(pattern: impl Into<String>) -> Result<Self, Error> {
        let pattern = pattern.into();
        let regex = Regex::new(&pattern)
            .map_err(|e| Error::schema("pattern", format!("{pattern}: {e}")))?;
        Ok(Self::RegexMatches { pattern, regex })
    }

    /// Human readable description of the constraint
    pub fn description(&self) -> String {
        match self {
            Self::LengthBetween { min: Some(min), max: Some(max) } => {
                format!("string length must be between {min} and {max}")
            }
            Self::LengthBetween { min: Some(min), max: None } => {
                format!("string length must be at least {min}")
            }
            Self::LengthBetween { min: None, max: Some(max) } => {
                format!("string length must be at most {max}")
            }
            Self::LengthBetween { .. } => "string length is unconstrained".to_string(),
            Self::RegexMatches { pattern, .. } => {
                format!("value must match regular expression '{pattern}'")
            }
            Self::Between { min: Some(min), max: Some(max) } => {
                format!("value must be between {min} and {max}")
            }
            Self::Between { min: Some(min), max: None } => format!("value must be at least {min}"),
            Self::Between { min: None, max: Some(max) } => format!("value must be at most {max}"),
            Self::Between { .. } => "value is unconstrained".to_string(),
            Self::OneOf { values } => format!("value must be one of: {}", quoted(values)),
        }
    }

    /// Check a value; `Err` carries the reason it was rejected
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match (self, value) {
            (Self::LengthBetween { min, max }, Value::String(s)) => {
                let len = s.chars().count() as u64;
                let too_short = min.is_some_and(|m| len < u64::from(m));
                let too_long = max.is_some_and(|m| len > u64::from(m));
                if too_short || too_long {
                    return Err(format!("{}, got: {len}", self.description()));
                }
                Ok(())
            }
            (Self::RegexMatches { regex, .. }, Value::String(s)) => {
                if regex.is_match(s) {
                    Ok(())
                } else {
                    Err(format!("{}, got: {s}", self.description()))
                }
            }
            (Self::Between { min, max }, Value::Number(n)) => {
                let Some(n) = n.as_f64() else {
                    return Ok(());
                };
                if min.is_some_and(|m| n < m) || max.is_some_and(|m| n > m) {
                    return Err(format!("{}, got: {n}", self.description()));
                }
                Ok(())
            }
            (Self::OneOf { values }, Value::String(s)) => {
                if values.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(format!("{}, got: {s:?}", self.description()))
                }
            }
            _ => Ok(()),
        }
    }
}

fn quoted(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
    format!("[{}]", items.join(" "))
}
