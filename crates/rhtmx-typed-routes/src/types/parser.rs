// File: src/types/parser.rs
// Purpose: String parsers used to put typed values into URLs

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::value::{format_date, Value};

/// Converts values to and from their string form
///
/// `parse` only has to produce *some* value: the type's validator runs on
/// the result and decides whether it is acceptable.
pub trait Parser: Send + Sync {
    fn stringify(&self, value: &Value) -> Result<String, ValidationError>;
    fn parse(&self, raw: &str) -> Result<Value, ValidationError>;
}

/// What kind of value a parser is created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserHint {
    String,
    Number,
    Boolean,
    Date,
    Unknown,
}

/// Creates the parser for a given hint
pub type ParserFactory = Arc<dyn Fn(ParserHint) -> Arc<dyn Parser> + Send + Sync>;

/// Parser used unless another factory is configured
///
/// - strings go into the URL untouched
/// - dates use RFC 3339, with at least millisecond precision
/// - everything else is JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultParser {
    hint: ParserHint,
}

impl DefaultParser {
    pub fn new(hint: ParserHint) -> Self {
        Self { hint }
    }

    /// Factory creating a [`DefaultParser`] for every hint
    pub fn factory() -> ParserFactory {
        Arc::new(|hint: ParserHint| Arc::new(DefaultParser::new(hint)) as Arc<dyn Parser>)
    }

    fn stringify_json(value: &Value) -> Result<String, ValidationError> {
        serde_json::to_string(value).map_err(|e| ValidationError::new(e.to_string()))
    }
}

impl Parser for DefaultParser {
    fn stringify(&self, value: &Value) -> Result<String, ValidationError> {
        match (self.hint, value) {
            (ParserHint::String, Value::String(s)) => Ok(s.clone()),
            (_, Value::Date(d)) => Ok(format_date(d)),
            _ => Self::stringify_json(value),
        }
    }

    fn parse(&self, raw: &str) -> Result<Value, ValidationError> {
        match self.hint {
            ParserHint::String => Ok(Value::String(raw.to_string())),
            ParserHint::Date => DateTime::parse_from_rfc3339(raw)
                .map(|d| Value::Date(d.with_timezone(&Utc)))
                .map_err(|e| ValidationError::new(format!("invalid date `{raw}`: {e}"))),
            ParserHint::Number | ParserHint::Boolean | ParserHint::Unknown => {
                serde_json::from_str::<serde_json::Value>(raw)
                    .map(Value::from)
                    .map_err(|e| ValidationError::new(format!("invalid JSON `{raw}`: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_string_hint_passes_through() {
        let parser = DefaultParser::new(ParserHint::String);
        assert_eq!(parser.stringify(&"a b".into()).unwrap(), "a b");
        assert_eq!(parser.parse("\"x\"").unwrap(), Value::from("\"x\""));
    }

    #[test]
    fn test_number_hint_uses_json() {
        let parser = DefaultParser::new(ParserHint::Number);
        assert_eq!(parser.stringify(&Value::Number(42.0)).unwrap(), "42");
        assert_eq!(parser.stringify(&Value::Number(1.5)).unwrap(), "1.5");
        assert_eq!(parser.parse("42").unwrap(), Value::Number(42.0));
        assert!(parser.parse("x").is_err());
    }

    #[test]
    fn test_date_hint() {
        let parser = DefaultParser::new(ParserHint::Date);
        let date = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let raw = parser.stringify(&Value::Date(date)).unwrap();
        assert_eq!(raw, "2024-05-06T07:08:09.000Z");
        assert_eq!(parser.parse(&raw).unwrap(), Value::Date(date));
        assert!(parser.parse("yesterday").is_err());
    }

    #[test]
    fn test_unknown_hint_parses_structures() {
        let parser = DefaultParser::new(ParserHint::Unknown);
        let value = parser.parse("{\"a\":[true]}").unwrap();
        assert_eq!(value, Value::Object(crate::values! { "a" => vec![true] }));
    }
}
