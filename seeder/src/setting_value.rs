//! Setting values as loaded, before they are parsed into typed fields.
//!
//! The environment layer hands `1` over as a number and `true` as a boolean,
//! while the command line always yields text. Values are therefore kept as
//! whichever scalar their source produced and parsed field by field later, so
//! every malformed value can be reported instead of only the first.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use user_generation::FieldFailure;

/// Reason recorded for a flag that is not one of the accepted spellings.
const FLAG_REASON: &str = "must be 1, 0, true, false, yes or no";

/// A raw setting value from any configuration source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// A boolean literal.
    Flag(bool),
    /// A whole number.
    Integer(i64),
    /// A whole number above `i64::MAX`.
    Unsigned(u64),
    /// A number with a fractional part.
    Decimal(f64),
    /// Anything else, verbatim.
    Text(String),
}

impl SettingValue {
    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl FromStr for SettingValue {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::Text(value.to_owned()))
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Parses raw values into typed ones, recording a failure for each value
/// that does not fit its field.
///
/// Blank text counts as unset for typed fields.
#[derive(Debug, Default)]
pub(crate) struct SettingParser {
    failures: Vec<FieldFailure>,
}

impl SettingParser {
    /// Parses a flag spelled `1`/`0`, `true`/`false`, `yes`/`no` or `on`/`off`.
    pub(crate) fn flag(
        &mut self,
        field: &'static str,
        value: Option<&SettingValue>,
    ) -> Option<bool> {
        self.parse(field, value, FLAG_REASON, parse_flag)
    }

    pub(crate) fn integer(
        &mut self,
        field: &'static str,
        value: Option<&SettingValue>,
    ) -> Option<i64> {
        self.parse(field, value, "must be an integer", |raw| match raw {
            SettingValue::Integer(number) => Some(*number),
            SettingValue::Unsigned(number) => i64::try_from(*number).ok(),
            SettingValue::Text(text) => text.trim().parse().ok(),
            SettingValue::Flag(_) | SettingValue::Decimal(_) => None,
        })
    }

    pub(crate) fn unsigned(
        &mut self,
        field: &'static str,
        value: Option<&SettingValue>,
    ) -> Option<u64> {
        self.parse(field, value, "must be a non-negative integer", |raw| match raw {
            SettingValue::Integer(number) => u64::try_from(*number).ok(),
            SettingValue::Unsigned(number) => Some(*number),
            SettingValue::Text(text) => text.trim().parse().ok(),
            SettingValue::Flag(_) | SettingValue::Decimal(_) => None,
        })
    }

    /// Renders any value as text; blank text is kept for later validation.
    pub(crate) fn text(value: Option<&SettingValue>) -> Option<String> {
        value.map(ToString::to_string)
    }

    pub(crate) fn into_failures(self) -> Vec<FieldFailure> {
        self.failures
    }

    fn parse<T>(
        &mut self,
        field: &'static str,
        value: Option<&SettingValue>,
        reason: &str,
        parse: impl FnOnce(&SettingValue) -> Option<T>,
    ) -> Option<T> {
        let raw = value.filter(|raw| !raw.is_blank())?;
        let parsed = parse(raw);
        if parsed.is_none() {
            self.failures.push(FieldFailure {
                field,
                reason: reason.to_owned(),
            });
        }
        parsed
    }
}

fn parse_flag(value: &SettingValue) -> Option<bool> {
    match value {
        SettingValue::Flag(flag) => Some(*flag),
        SettingValue::Integer(1) | SettingValue::Unsigned(1) => Some(true),
        SettingValue::Integer(0) | SettingValue::Unsigned(0) => Some(false),
        SettingValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
        SettingValue::Integer(_) | SettingValue::Unsigned(_) | SettingValue::Decimal(_) => None,
    }
}
