// File: src/types/factory.rs
// Purpose: Constructors for the built-in types, bound to a parser factory

use std::fmt;

use anyhow::{bail, ensure};
use once_cell::sync::Lazy;

use super::parser::{DefaultParser, ParserFactory, ParserHint};
use super::{Type, Validator};
use crate::value::Value;

/// Set of type constructors sharing one parser factory
///
/// Created once with [`configure`]; the free functions of this module use a
/// process-wide instance built from [`DefaultParser`].
///
/// ```
/// use std::sync::Arc;
/// use rhtmx_typed_routes::types::{configure, DefaultParser, Parser, ParserHint, PathnameType};
///
/// // Every type produced by `types` shares the configured parsers
/// let types = configure(Arc::new(|hint: ParserHint| {
///     Arc::new(DefaultParser::new(hint)) as Arc<dyn Parser>
/// }));
/// let id = types.number();
/// assert_eq!(id.serialize_param(&7.into()).unwrap(), "7");
/// ```
#[derive(Clone)]
pub struct Types {
    parsers: ParserFactory,
}

/// Builds a constructor set from a parser factory
pub fn configure(parsers: ParserFactory) -> Types {
    Types { parsers }
}

impl Types {
    fn build<F>(&self, hint: ParserHint, validate: F) -> Type
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Type::new(validate, (self.parsers)(hint))
    }

    pub fn string(&self) -> Type {
        self.build(ParserHint::String, |value: &Value| match value {
            Value::String(_) => Ok(value.clone()),
            other => bail!("expected string, got {}", other.kind()),
        })
    }

    pub fn number(&self) -> Type {
        self.build(ParserHint::Number, |value: &Value| match value {
            Value::Number(n) => {
                ensure!(n.is_finite(), "expected finite number, got {n}");
                Ok(value.clone())
            }
            other => bail!("expected number, got {}", other.kind()),
        })
    }

    pub fn boolean(&self) -> Type {
        self.build(ParserHint::Boolean, |value: &Value| match value {
            Value::Bool(_) => Ok(value.clone()),
            other => bail!("expected boolean, got {}", other.kind()),
        })
    }

    pub fn date(&self) -> Type {
        self.build(ParserHint::Date, |value: &Value| match value {
            Value::Date(_) => Ok(value.clone()),
            other => bail!("expected date, got {}", other.kind()),
        })
    }

    /// Type accepting exactly one of `values`
    pub fn union<I, V>(&self, values: I) -> Type
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let hint = union_hint(&values);

        self.build(hint, move |value: &Value| {
            ensure!(
                values.contains(value),
                "`{value}` is not one of the allowed values"
            );
            Ok(value.clone())
        })
    }

    /// Type backed by a user validator, with JSON-style parsing
    pub fn custom<F>(&self, validate: F) -> Type
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.build(ParserHint::Unknown, validate)
    }

    /// Type backed by any [`Validator`], with the parser for `hint`
    pub fn with_validator(&self, hint: ParserHint, validator: impl Validator + 'static) -> Type {
        Type::new(validator, (self.parsers)(hint))
    }
}

impl fmt::Debug for Types {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Types").finish_non_exhaustive()
    }
}

/// Strings-only unions keep their values readable in URLs
fn union_hint(values: &[Value]) -> ParserHint {
    if values.iter().all(|v| matches!(v, Value::String(_))) {
        ParserHint::String
    } else if values.iter().all(|v| matches!(v, Value::Number(_))) {
        ParserHint::Number
    } else if values.iter().all(|v| matches!(v, Value::Bool(_))) {
        ParserHint::Boolean
    } else {
        ParserHint::Unknown
    }
}

static DEFAULT_TYPES: Lazy<Types> = Lazy::new(|| configure(DefaultParser::factory()));

/// Process-wide constructor set using [`DefaultParser`]
pub fn defaults() -> &'static Types {
    &DEFAULT_TYPES
}

pub fn string() -> Type {
    defaults().string()
}

pub fn number() -> Type {
    defaults().number()
}

pub fn boolean() -> Type {
    defaults().boolean()
}

pub fn date() -> Type {
    defaults().date()
}

pub fn union<I, V>(values: I) -> Type
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    defaults().union(values)
}

pub fn custom<F>(validate: F) -> Type
where
    F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    defaults().custom(validate)
}
