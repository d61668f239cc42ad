//! Serialization engine
//!
//! Pure functions turning typed values into pathname, search, hash and state
//! for one resolved [`RouteSpec`], and parsing them back.
//!
//! Building trusts its input: a value rejected by its type is an error.
//! Parsing does not: malformed values are dropped or defaulted, and only
//! `defined()` types report an error.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, RouteError, RoutePart, ValidationError};
use crate::path::fill;
use crate::search::SearchParams;
use crate::spec::{HashSpec, RouteSpec, StateSpec};
use crate::value::{Value, Values};

/// Name reported for errors about the hash
const HASH: &str = "hash";
/// Name reported for errors about whole-typed state
const STATE: &str = "state";

/// Everything needed to build a location for a route
///
/// ```
/// use rhtmx_typed_routes::BuildOptions;
///
/// let opts = BuildOptions::new()
///     .param("id", 42)
///     .search_param("page", 2)
///     .hash("reviews");
/// assert_eq!(opts.params.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub params: Values,
    pub search_params: Values,
    pub hash: Option<Value>,
    pub state: Option<Value>,
    /// Appended verbatim after the typed search params
    pub untyped_search_params: Option<SearchParams>,
    /// Merged into field-typed state for keys no declared field claims
    pub untyped_state: Option<Values>,
    /// Build a pathname without the leading `/`
    pub relative: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn params(mut self, params: Values) -> Self {
        self.params.extend(params);
        self
    }

    pub fn search_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.search_params.insert(name.into(), value.into());
        self
    }

    pub fn search_params(mut self, params: Values) -> Self {
        self.search_params.extend(params);
        self
    }

    pub fn hash(mut self, value: impl Into<Value>) -> Self {
        self.hash = Some(value.into());
        self
    }

    pub fn state(mut self, value: impl Into<Value>) -> Self {
        self.state = Some(value.into());
        self
    }

    /// Sets one field of object-shaped state
    pub fn state_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = match self.state.take() {
            Some(Value::Object(fields)) => fields,
            _ => Values::new(),
        };
        fields.insert(name.into(), value.into());
        self.state = Some(Value::Object(fields));
        self
    }

    pub fn untyped_search_params(mut self, params: SearchParams) -> Self {
        self.untyped_search_params = Some(params);
        self
    }

    pub fn untyped_state(mut self, state: Values) -> Self {
        self.untyped_state = Some(state);
        self
    }

    pub fn relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }
}

fn serialize_error(
    part: RoutePart,
    name: &str,
) -> impl FnOnce(ValidationError) -> RouteError + '_ {
    move |source| RouteError::Serialize {
        part,
        name: name.to_string(),
        source,
    }
}

fn required_error(
    part: RoutePart,
    name: &str,
) -> impl FnOnce(ValidationError) -> RouteError + '_ {
    move |source| RouteError::Required {
        part,
        name: name.to_string(),
        source,
    }
}

fn present<'a>(values: &'a Values, name: &str) -> Option<&'a Value> {
    values.get(name).filter(|v| !v.is_null())
}

// ============================================================================
// Pathname
// ============================================================================

/// Pathname params as strings, ready for [`fill`]
///
/// Pattern params without a declared type take scalar values (string,
/// number, boolean, date) in their display form; arrays and objects are
/// rejected.
pub fn serialize_params(spec: &RouteSpec, params: &Values) -> Result<BTreeMap<String, String>> {
    let mut serialized = BTreeMap::new();

    for (name, ty) in &spec.params {
        if let Some(value) = present(params, name) {
            let raw = ty
                .serialize_param(value)
                .map_err(serialize_error(RoutePart::Pathname, name))?;
            serialized.insert(name.clone(), raw);
        }
    }

    for name in spec.path_params().all {
        if spec.params.contains_key(&name) {
            continue;
        }
        if let Some(value) = present(params, &name) {
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                return Err(RouteError::Serialize {
                    part: RoutePart::Pathname,
                    source: ValidationError::new(format!(
                        "untyped param expects a scalar, got {}",
                        value.kind()
                    )),
                    name,
                });
            }
            serialized.insert(name, value.to_string());
        }
    }

    Ok(serialized)
}

pub fn build_pathname(spec: &RouteSpec, opts: &BuildOptions) -> Result<String> {
    let pattern = spec.display_path().unwrap_or_default();
    let params = serialize_params(spec, &opts.params)?;
    let filled = fill(&pattern, &params)?;
    let pathname = filled.strip_prefix('/').unwrap_or(&filled);

    Ok(if opts.relative {
        pathname.to_string()
    } else {
        format!("/{pathname}")
    })
}

/// Typed pathname params; keys without a usable value are left out
pub fn deserialize_params(spec: &RouteSpec, raw: &HashMap<String, String>) -> Result<Values> {
    let mut params = Values::new();

    for (name, ty) in &spec.params {
        let value = ty
            .deserialize_param(raw.get(name).map(String::as_str))
            .map_err(required_error(RoutePart::Pathname, name))?;
        if let Some(value) = value.filter(|v| !v.is_null()) {
            params.insert(name.clone(), value);
        }
    }

    for name in spec.path_params().all {
        if spec.params.contains_key(&name) {
            continue;
        }
        if let Some(raw) = raw.get(&name) {
            params.insert(name, Value::String(raw.clone()));
        }
    }

    Ok(params)
}

// ============================================================================
// Search
// ============================================================================

pub fn serialize_search_params(spec: &RouteSpec, opts: &BuildOptions) -> Result<SearchParams> {
    let mut search = SearchParams::new();

    for (name, ty) in &spec.search_params {
        let Some(value) = present(&opts.search_params, name) else {
            continue;
        };
        let raw = ty
            .serialize_search_param(value)
            .map_err(serialize_error(RoutePart::Search, name))?;
        for item in raw {
            search.append(name.clone(), item);
        }
    }

    // Overlap with typed keys is the caller's business
    if let Some(untyped) = &opts.untyped_search_params {
        search.extend(untyped);
    }

    Ok(search)
}

/// Query string with its leading `?`, or an empty string
pub fn build_search(spec: &RouteSpec, opts: &BuildOptions) -> Result<String> {
    let search = serialize_search_params(spec, opts)?;
    Ok(if search.is_empty() {
        String::new()
    } else {
        format!("?{search}")
    })
}

pub fn deserialize_search_params(spec: &RouteSpec, raw: &SearchParams) -> Result<Values> {
    let mut params = Values::new();

    for (name, ty) in &spec.search_params {
        let value = ty
            .deserialize_search_param(&raw.get_all(name))
            .map_err(required_error(RoutePart::Search, name))?;
        if let Some(value) = value.filter(|v| !v.is_null()) {
            params.insert(name.clone(), value);
        }
    }

    Ok(params)
}

/// Raw search params minus every declared key
pub fn untyped_search_params(spec: &RouteSpec, raw: &SearchParams) -> SearchParams {
    let mut untyped = raw.clone();
    for name in spec.search_params.keys() {
        untyped.remove(name);
    }
    untyped
}

// ============================================================================
// Hash
// ============================================================================

/// Fragment with its leading `#`, or an empty string
///
/// The allow-list is not checked here, only when parsing.
pub fn build_hash(spec: &RouteSpec, opts: &BuildOptions) -> Result<String> {
    let Some(value) = opts.hash.as_ref().filter(|v| !v.is_null()) else {
        return Ok(String::new());
    };

    let raw = match &spec.hash {
        HashSpec::Typed(ty) => ty
            .serialize_hash(value)
            .map_err(serialize_error(RoutePart::Hash, HASH))?,
        HashSpec::Values(_) => value.to_string(),
    };

    Ok(format!("#{raw}"))
}

pub fn deserialize_hash(spec: &RouteSpec, raw: &str) -> Result<Option<Value>> {
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    let raw = (!raw.is_empty()).then_some(raw);

    match &spec.hash {
        HashSpec::Typed(ty) => ty
            .deserialize_hash(raw)
            .map_err(required_error(RoutePart::Hash, HASH)),
        HashSpec::Values(allowed) => Ok(raw
            .filter(|raw| allowed.is_empty() || allowed.iter().any(|a| a.as_str() == *raw))
            .map(Value::from)),
    }
}

// ============================================================================
// State
// ============================================================================

pub fn build_state(spec: &RouteSpec, opts: &BuildOptions) -> Result<Value> {
    match &spec.state {
        StateSpec::Whole(ty) => match opts.state.as_ref().filter(|v| !v.is_null()) {
            Some(value) => ty
                .serialize_state(value)
                .map_err(serialize_error(RoutePart::State, STATE)),
            None => Ok(Value::Null),
        },
        StateSpec::Fields(fields) => {
            let supplied = match &opts.state {
                None | Some(Value::Null) => Values::new(),
                Some(Value::Object(supplied)) => supplied.clone(),
                Some(other) => {
                    return Err(RouteError::Serialize {
                        part: RoutePart::State,
                        name: STATE.to_string(),
                        source: ValidationError::new(format!(
                            "expected object, got {}",
                            other.kind()
                        )),
                    })
                }
            };

            let mut state = Values::new();
            for (name, ty) in fields {
                if let Some(value) = present(&supplied, name) {
                    let value = ty
                        .serialize_state(value)
                        .map_err(serialize_error(RoutePart::State, name))?;
                    state.insert(name.clone(), value);
                }
            }

            if let Some(untyped) = &opts.untyped_state {
                for (name, value) in untyped {
                    if !fields.contains_key(name) {
                        state.insert(name.clone(), value.clone());
                    }
                }
            }

            Ok(Value::Object(state))
        }
    }
}

/// Typed state
///
/// Whole-typed state yields the value itself (`Null` when absent); field
/// typed state yields an object holding the usable declared fields.
pub fn deserialize_state(spec: &RouteSpec, raw: Option<&Value>) -> Result<Value> {
    match &spec.state {
        StateSpec::Whole(ty) => Ok(ty
            .deserialize_state(raw)
            .map_err(required_error(RoutePart::State, STATE))?
            .unwrap_or(Value::Null)),
        StateSpec::Fields(fields) => {
            let raw = raw.and_then(Value::as_object);
            let mut state = Values::new();

            for (name, ty) in fields {
                let value = ty
                    .deserialize_state(raw.and_then(|r| r.get(name)))
                    .map_err(required_error(RoutePart::State, name))?;
                if let Some(value) = value.filter(|v| !v.is_null()) {
                    state.insert(name.clone(), value);
                }
            }

            Ok(Value::Object(state))
        }
    }
}

/// Raw state fields minus every declared field
pub fn untyped_state(spec: &RouteSpec, raw: Option<&Value>) -> Values {
    match (&spec.state, raw) {
        (StateSpec::Fields(fields), Some(Value::Object(raw))) => raw
            .iter()
            .filter(|(name, _)| !fields.contains_key(*name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        _ => Values::new(),
    }
}

// ============================================================================
// Whole location
// ============================================================================

/// Pathname, search and hash joined into one URL path
pub fn build_path(spec: &RouteSpec, opts: &BuildOptions) -> Result<String> {
    Ok(format!(
        "{}{}{}",
        build_pathname(spec, opts)?,
        build_search(spec, opts)?,
        build_hash(spec, opts)?
    ))
}
