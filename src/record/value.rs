use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The value of one record field as seen by the list engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Date(DateTime<Utc>),
    /// Multi-value field; filters match by membership
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Canonical string form used for filtering, searching and text output
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Decimal(d) => d.normalize().to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.to_rfc3339(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    /// Exact equality against a filter value, or membership for list fields
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::List(items) => items.iter().any(|item| item == expected),
            FieldValue::Int(_) | FieldValue::Decimal(_) => match (self.as_decimal(), Decimal::from_str(expected.trim())) {
                (Some(actual), Ok(wanted)) => actual == wanted,
                _ => self.to_text() == expected,
            },
            FieldValue::Date(d) => match DateTime::parse_from_rfc3339(expected) {
                Ok(wanted) => *d == wanted.with_timezone(&Utc),
                Err(_) => self.to_text() == expected,
            },
            _ => self.to_text() == expected,
        }
    }

    /// Case-insensitive substring test; `needle` must already be lower-cased
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::List(items) => items.iter().any(|item| item.to_lowercase().contains(needle)),
            other => other.to_text().to_lowercase().contains(needle),
        }
    }

    fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Int(i) => Some(Decimal::from(*i)),
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Int(_) | FieldValue::Decimal(_) => 1,
            FieldValue::Date(_) => 2,
            FieldValue::Text(_) => 3,
            FieldValue::List(_) => 4,
            FieldValue::Null => 5,
        }
    }

    /// Ascending order between two field values.
    ///
    /// Values of the same kind use their native ordering, integers and
    /// decimals compare numerically, and anything else falls back to a fixed
    /// kind rank so the order stays total. `Null` ranks after everything.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::List(a), FieldValue::List(b)) => a.cmp(b),
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            _ => match (self.as_decimal(), other.as_decimal()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.kind_rank().cmp(&other.kind_rank()),
            },
        }
    }

    /// Map a JSON value onto a field value.
    /// RFC3339 strings become dates; arrays keep their string elements.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else {
                    Decimal::from_str(&n.to_string())
                        .map(FieldValue::Decimal)
                        .unwrap_or_else(|_| FieldValue::Text(n.to_string()))
                }
            }
            Value::String(s) => match DateTime::parse_from_rfc3339(s) {
                Ok(d) => FieldValue::Date(d.with_timezone(&Utc)),
                Err(_) => FieldValue::Text(s.clone()),
            },
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::Object(_) => FieldValue::Text(value.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Text(s.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        FieldValue::Decimal(d)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

impl From<&Vec<String>> for FieldValue {
    fn from(items: &Vec<String>) -> Self {
        FieldValue::List(items.clone())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_across_int_and_decimal() {
        let int = FieldValue::Int(10);
        let dec = FieldValue::Decimal(Decimal::new(95, 1));
        assert_eq!(int.compare(&dec), Ordering::Greater);
        assert_eq!(dec.compare(&int), Ordering::Less);
    }

    #[test]
    fn mismatched_kinds_use_fixed_rank() {
        let text = FieldValue::from("abc");
        let num = FieldValue::Int(1);
        assert_eq!(num.compare(&text), Ordering::Less);
        assert_eq!(text.compare(&num), Ordering::Greater);
        assert_eq!(text.compare(&FieldValue::Null), Ordering::Less);
    }

    #[test]
    fn filter_matching_uses_canonical_text() {
        assert!(FieldValue::Int(10).matches("10"));
        assert!(FieldValue::Decimal(Decimal::new(1050, 2)).matches("10.5"));
        assert!(FieldValue::Bool(true).matches("true"));
        assert!(!FieldValue::from("Active").matches("active"));
        assert!(!FieldValue::Null.matches(""));
    }

    #[test]
    fn list_fields_match_by_membership() {
        let skills = FieldValue::List(vec!["rust".into(), "sql".into()]);
        assert!(skills.matches("sql"));
        assert!(!skills.matches("go"));
        assert!(skills.contains_lowercase("ru"));
    }

    #[test]
    fn json_values_map_to_field_kinds() {
        assert_eq!(FieldValue::from_json(&json!(3)), FieldValue::Int(3));
        assert!(matches!(FieldValue::from_json(&json!("2024-01-02T03:04:05Z")), FieldValue::Date(_)));
        assert_eq!(FieldValue::from_json(&json!("Bob")), FieldValue::from("Bob"));
        assert_eq!(
            FieldValue::from_json(&json!(["a", 1])),
            FieldValue::List(vec!["a".into(), "1".into()])
        );
        assert!(matches!(FieldValue::from_json(&json!(2.5)), FieldValue::Decimal(_)));
    }
}
