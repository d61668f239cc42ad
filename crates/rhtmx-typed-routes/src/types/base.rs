// File: src/types/base.rs
// Purpose: Scalar parameter type and its default/defined modifiers

use std::fmt;
use std::sync::Arc;

use super::{ArrayType, HashType, Parser, PathnameType, SearchType, StateType, Validator};
use crate::error::{RouteError, ValidationError};
use crate::value::Value;

/// What a deserializer yields when input is missing or malformed
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fallback {
    /// Leave the field out of the result
    #[default]
    Omit,
    /// Substitute this (already validated) value
    Default(Value),
    /// Report an error
    Required,
}

/// A scalar parameter type: one validator, one parser, one fallback policy
///
/// Usually created through [`Types`](super::Types) or the free constructors
/// ([`number`](super::number), [`string`](super::string), ...).
///
/// ```
/// use rhtmx_typed_routes::types::{number, PathnameType};
/// use rhtmx_typed_routes::Value;
///
/// let page = number().default(1).unwrap();
/// assert_eq!(page.deserialize_param(Some("x")).unwrap(), Some(Value::Number(1.0)));
/// assert_eq!(number().deserialize_param(Some("x")).unwrap(), None);
/// assert!(number().defined().deserialize_param(None).is_err());
/// ```
#[derive(Clone)]
pub struct Type {
    validator: Arc<dyn Validator>,
    parser: Arc<dyn Parser>,
    fallback: Fallback,
}

impl Type {
    pub fn new(validator: impl Validator + 'static, parser: Arc<dyn Parser>) -> Self {
        Self {
            validator: Arc::new(validator),
            parser,
            fallback: Fallback::Omit,
        }
    }

    /// Substitutes `value` for missing or malformed input
    ///
    /// The value is validated immediately; a rejected value or one that
    /// validates to `Null` is a configuration error.
    pub fn default(self, value: impl Into<Value>) -> Result<Self, RouteError> {
        let value = self
            .validator
            .validate(&value.into())
            .map_err(RouteError::InvalidDefault)?;

        if value.is_null() {
            return Err(RouteError::UndefinedDefault);
        }

        Ok(Self {
            fallback: Fallback::Default(value),
            ..self
        })
    }

    /// Turns missing or malformed input into an error
    pub fn defined(self) -> Self {
        Self {
            fallback: Fallback::Required,
            ..self
        }
    }

    /// Collection of this type, for search params and state
    pub fn array(self) -> ArrayType {
        ArrayType::new(self)
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    pub fn parser(&self) -> &Arc<dyn Parser> {
        &self.parser
    }

    pub fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        self.validator.validate(value)
    }

    /// Validates a caller-supplied value and stringifies it
    pub(crate) fn stringify(&self, value: &Value) -> Result<String, ValidationError> {
        let value = self.validate(value)?;
        self.parser.stringify(&value)
    }

    /// Parses and validates one raw string, applying the fallback policy
    pub(crate) fn resolve_raw(&self, raw: Option<&str>) -> Result<Option<Value>, ValidationError> {
        match raw {
            Some(raw) => {
                self.resolve(self.parser.parse(raw).and_then(|v| self.validate(&v)))
            }
            None => self.apply_fallback(ValidationError::missing()),
        }
    }

    /// Validates one raw value carried as-is, applying the fallback policy
    pub(crate) fn resolve_value(
        &self,
        raw: Option<&Value>,
    ) -> Result<Option<Value>, ValidationError> {
        match raw {
            Some(raw) => self.resolve(self.validate(raw)),
            None => self.apply_fallback(ValidationError::missing()),
        }
    }

    fn resolve(
        &self,
        validated: Result<Value, ValidationError>,
    ) -> Result<Option<Value>, ValidationError> {
        match validated {
            Ok(Value::Null) => self.apply_fallback(ValidationError::missing()),
            Ok(value) => Ok(Some(value)),
            Err(err) => self.apply_fallback(err),
        }
    }

    pub(crate) fn apply_fallback(
        &self,
        err: ValidationError,
    ) -> Result<Option<Value>, ValidationError> {
        match &self.fallback {
            Fallback::Omit => {
                tracing::trace!(reason = %err, "dropping unusable value");
                Ok(None)
            }
            Fallback::Default(value) => {
                tracing::trace!(reason = %err, default = %value, "using default value");
                Ok(Some(value.clone()))
            }
            Fallback::Required => Err(err),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl PathnameType for Type {
    fn serialize_param(&self, value: &Value) -> Result<String, ValidationError> {
        self.stringify(value)
    }

    fn deserialize_param(&self, raw: Option<&str>) -> Result<Option<Value>, ValidationError> {
        self.resolve_raw(raw)
    }
}

impl SearchType for Type {
    fn serialize_search_param(&self, value: &Value) -> Result<Vec<String>, ValidationError> {
        self.stringify(value).map(|s| vec![s])
    }

    /// Scalars read the first of the repeated values
    fn deserialize_search_param(&self, raw: &[&str]) -> Result<Option<Value>, ValidationError> {
        self.resolve_raw(raw.first().copied())
    }
}

impl StateType for Type {
    fn serialize_state(&self, value: &Value) -> Result<Value, ValidationError> {
        self.validate(value)
    }

    fn deserialize_state(&self, raw: Option<&Value>) -> Result<Option<Value>, ValidationError> {
        self.resolve_value(raw)
    }
}

impl HashType for Type {
    fn serialize_hash(&self, value: &Value) -> Result<String, ValidationError> {
        self.stringify(value)
    }

    fn deserialize_hash(&self, raw: Option<&str>) -> Result<Option<Value>, ValidationError> {
        self.resolve_raw(raw)
    }
}
