//! Parameter types
//!
//! A type is one validator plus one string parser. From those two it derives
//! four capabilities, one per part of a location:
//!
//! | capability       | wire form            | used for            |
//! |------------------|----------------------|---------------------|
//! | [`PathnameType`] | one string           | `:id` segments      |
//! | [`SearchType`]   | one or many strings  | query string keys   |
//! | [`StateType`]    | the value itself     | history state       |
//! | [`HashType`]     | one string           | URL fragment        |
//!
//! Deserializers return `Ok(None)` for absent or malformed input unless the
//! type was made [`defined`](Type::defined); an `Err` from a deserializer
//! always means "required value missing".

use crate::error::ValidationError;
use crate::value::Value;

mod array;
mod base;
pub mod factory;
pub mod parser;

pub use array::ArrayType;
pub use base::{Fallback, Type};
pub use factory::{boolean, configure, custom, date, defaults, number, string, union, Types};
pub use parser::{DefaultParser, Parser, ParserFactory, ParserHint};

/// Checks an unknown value and returns its normalized form
///
/// Closures returning `anyhow::Result<Value>` implement this trait, which is
/// the intended way to plug in schema validators from other crates.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value) -> Result<Value, ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        self(value).map_err(ValidationError::from)
    }
}

/// Type usable for a pathname segment
pub trait PathnameType: Send + Sync {
    fn serialize_param(&self, value: &Value) -> Result<String, ValidationError>;
    fn deserialize_param(&self, raw: Option<&str>) -> Result<Option<Value>, ValidationError>;
}

/// Type usable for a search param
///
/// Deserialization always receives every raw value repeated under the key,
/// so that collection types can gather them.
pub trait SearchType: Send + Sync {
    fn serialize_search_param(&self, value: &Value) -> Result<Vec<String>, ValidationError>;
    fn deserialize_search_param(&self, raw: &[&str]) -> Result<Option<Value>, ValidationError>;
}

/// Type usable for navigation state, either a single field or the whole state
pub trait StateType: Send + Sync {
    fn serialize_state(&self, value: &Value) -> Result<Value, ValidationError>;
    fn deserialize_state(&self, raw: Option<&Value>) -> Result<Option<Value>, ValidationError>;
}

/// Type usable for the URL fragment
pub trait HashType: Send + Sync {
    fn serialize_hash(&self, value: &Value) -> Result<String, ValidationError>;
    fn deserialize_hash(&self, raw: Option<&str>) -> Result<Option<Value>, ValidationError>;
}
