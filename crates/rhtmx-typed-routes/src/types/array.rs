// File: src/types/array.rs
// Purpose: Collection-valued types for search params and state

use super::{SearchType, StateType, Type};
use crate::error::ValidationError;
use crate::value::Value;

/// Collection of an element [`Type`]
///
/// Only implements [`SearchType`] and [`StateType`]: a pathname segment or a
/// hash can't carry more than one value.
///
/// Each element follows the element type's fallback policy: malformed
/// elements are dropped (bare), replaced (`default`) or rejected
/// (`defined`). An empty collection is treated like a missing scalar, with a
/// default becoming a one-element collection.
#[derive(Debug, Clone)]
pub struct ArrayType {
    element: Type,
}

impl ArrayType {
    pub fn new(element: Type) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Type {
        &self.element
    }

    fn items<'a>(&self, value: &'a Value) -> Result<&'a [Value], ValidationError> {
        value
            .as_array()
            .ok_or_else(|| ValidationError::new(format!("expected array, got {}", value.kind())))
    }

    fn empty(&self) -> Result<Option<Value>, ValidationError> {
        self.element
            .apply_fallback(ValidationError::missing())
            .map(|fallback| fallback.map(|value| Value::Array(vec![value])))
    }

    fn collect<I>(&self, resolved: I) -> Result<Option<Value>, ValidationError>
    where
        I: IntoIterator<Item = Result<Option<Value>, ValidationError>>,
    {
        let items = resolved
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();
        Ok(Some(Value::Array(items)))
    }
}

impl SearchType for ArrayType {
    fn serialize_search_param(&self, value: &Value) -> Result<Vec<String>, ValidationError> {
        self.items(value)?
            .iter()
            .map(|item| self.element.stringify(item))
            .collect()
    }

    fn deserialize_search_param(&self, raw: &[&str]) -> Result<Option<Value>, ValidationError> {
        if raw.is_empty() {
            return self.empty();
        }
        self.collect(raw.iter().map(|item| self.element.resolve_raw(Some(item))))
    }
}

impl StateType for ArrayType {
    fn serialize_state(&self, value: &Value) -> Result<Value, ValidationError> {
        self.items(value)?
            .iter()
            .map(|item| self.element.validate(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    /// A single non-array value counts as a one-element collection
    fn deserialize_state(&self, raw: Option<&Value>) -> Result<Option<Value>, ValidationError> {
        match raw {
            None | Some(Value::Null) => self.empty(),
            Some(Value::Array(items)) if items.is_empty() => self.empty(),
            Some(Value::Array(items)) => {
                self.collect(items.iter().map(|item| self.element.resolve_value(Some(item))))
            }
            Some(single) => self.collect([self.element.resolve_value(Some(single))]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{number, string};

    #[test]
    fn test_default_elements_replace_invalid_items() {
        let ty = number().default(-1).unwrap().array();
        assert_eq!(
            ty.deserialize_search_param(&["1", "f"]).unwrap(),
            Some(Value::from(vec![1, -1]))
        );
    }

    #[test]
    fn test_bare_elements_drop_invalid_items() {
        let ty = number().array();
        assert_eq!(
            ty.deserialize_search_param(&["1", "f", "3"]).unwrap(),
            Some(Value::from(vec![1, 3]))
        );
    }

    #[test]
    fn test_defined_elements_reject_invalid_items() {
        let ty = number().defined().array();
        assert!(ty.deserialize_search_param(&["1", "f"]).is_err());
    }

    #[test]
    fn test_empty_collection_follows_scalar_policy() {
        assert_eq!(number().array().deserialize_search_param(&[]).unwrap(), None);
        assert!(number().defined().array().deserialize_search_param(&[]).is_err());
        assert_eq!(
            number().default(5).unwrap().array().deserialize_search_param(&[]).unwrap(),
            Some(Value::from(vec![5]))
        );
    }

    #[test]
    fn test_state_single_value_becomes_collection() {
        let ty = string().array();
        assert_eq!(
            ty.deserialize_state(Some(&"a".into())).unwrap(),
            Some(Value::from(vec!["a"]))
        );
    }

    #[test]
    fn test_serialize_requires_array() {
        let ty = number().array();
        assert_eq!(
            ty.serialize_search_param(&Value::from(vec![1, 2])).unwrap(),
            vec!["1".to_string(), "2".to_string()]
        );
        assert!(ty.serialize_search_param(&Value::Number(1.0)).is_err());
        assert!(ty.serialize_state(&Value::from(vec!["x"])).is_err());
    }
}
