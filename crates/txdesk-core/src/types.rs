//! Shared value types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use txdesk_config::{FieldKind, FormLayoutKind};

/// Sort direction of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

/// A single field value read from or written to a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent (null) value
    Empty,
    Text(String),
    Number(Decimal),
    Integer(i64),
    Flag(bool),
}

impl FieldValue {
    /// Null check used by sorting; an empty string is still a value
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Missing for the purpose of a required check
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Parse a raw form input according to the field kind
    ///
    /// Returns the message suffix on failure (`"must be a number"`); the
    /// caller prefixes the field label.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<FieldValue, String> {
        let trimmed = raw.trim();
        match kind {
            FieldKind::Toggle => match trimmed.to_lowercase().as_str() {
                "on" | "true" | "1" | "yes" => Ok(FieldValue::Flag(true)),
                "" | "off" | "false" | "0" | "no" => Ok(FieldValue::Flag(false)),
                _ => Err("must be on or off".to_string()),
            },
            FieldKind::Number => {
                if trimmed.is_empty() {
                    return Ok(FieldValue::Empty);
                }
                Decimal::from_str(trimmed)
                    .map(FieldValue::Number)
                    .map_err(|_| "must be a number".to_string())
            }
            FieldKind::Date => {
                if trimmed.is_empty() {
                    Ok(FieldValue::Empty)
                } else {
                    Ok(FieldValue::Text(trimmed.to_string()))
                }
            }
            FieldKind::Text | FieldKind::Choice => Ok(FieldValue::Text(raw.to_string())),
        }
    }

    /// Text as placed into an input's `value` attribute
    pub fn as_input(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.normalize().to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(true) => write!(f, "Yes"),
            FieldValue::Flag(false) => write!(f, "No"),
            other => write!(f, "{}", other.as_input()),
        }
    }
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Success,
    Error,
}

impl fmt::Display for NoticeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeSeverity::Success => write!(f, "success"),
            NoticeSeverity::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::default(), SortDirection::Asc);
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(
            FieldValue::parse(FieldKind::Number, " 12.50 "),
            Ok(FieldValue::Number(Decimal::new(1250, 2)))
        );
        assert_eq!(FieldValue::parse(FieldKind::Number, ""), Ok(FieldValue::Empty));
        assert_eq!(
            FieldValue::parse(FieldKind::Number, "12abc"),
            Err("must be a number".to_string())
        );
    }

    #[test]
    fn test_parse_toggle() {
        assert_eq!(FieldValue::parse(FieldKind::Toggle, "on"), Ok(FieldValue::Flag(true)));
        assert_eq!(FieldValue::parse(FieldKind::Toggle, ""), Ok(FieldValue::Flag(false)));
        assert!(FieldValue::parse(FieldKind::Toggle, "maybe").is_err());
    }

    #[test]
    fn test_parse_text_keeps_raw() {
        assert_eq!(
            FieldValue::parse(FieldKind::Text, " a b "),
            Ok(FieldValue::Text(" a b ".to_string()))
        );
        assert_eq!(FieldValue::parse(FieldKind::Date, " "), Ok(FieldValue::Empty));
    }

    #[test]
    fn test_blank_and_empty() {
        assert!(FieldValue::Empty.is_empty());
        assert!(!FieldValue::Text(String::new()).is_empty());
        assert!(FieldValue::Text("  ".to_string()).is_blank());
        assert!(!FieldValue::Flag(false).is_blank());
        assert!(!FieldValue::Number(Decimal::ZERO).is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Number(Decimal::new(1500, 2)).as_input(), "15");
        assert_eq!(FieldValue::Flag(true).to_string(), "Yes");
        assert_eq!(FieldValue::Empty.to_string(), "");
    }
}
