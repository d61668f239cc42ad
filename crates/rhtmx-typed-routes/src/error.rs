// File: src/error.rs
// Purpose: Error types for route configuration, building and parsing

use std::fmt;

use thiserror::Error;

/// The part of a location a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePart {
    Pathname,
    Search,
    Hash,
    State,
}

impl fmt::Display for RoutePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoutePart::Pathname => "pathname",
            RoutePart::Search => "search",
            RoutePart::Hash => "hash",
            RoutePart::State => "state",
        };
        f.write_str(name)
    }
}

/// Failure reported by a validator or a parser
///
/// Carries only a message: the caller knows which param and which part of the
/// location it was working on, and wraps this into a [`RouteError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for input that is not there at all
    pub fn missing() -> Self {
        Self::new("value is missing")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for ValidationError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// Errors produced by route construction and by the serialization engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Path pattern starts or ends with `/`
    #[error("path `{path}` must not start or end with `/`")]
    InvalidPath { path: String },

    /// A declared pathname param does not occur in the node's own path
    #[error("param `{param}` is not present in path `{path}`")]
    UnknownParam { param: String, path: String },

    /// A composed fragment declares its own path
    #[error("composed fragment must be pathless, found path `{path}`")]
    PathedFragment { path: String },

    /// Default value rejected by the type's validator
    #[error("invalid default value: {0}")]
    InvalidDefault(ValidationError),

    /// Default value validated to `Null`
    #[error("default value must not resolve to null")]
    UndefinedDefault,

    /// Caller supplied a value the type rejects
    #[error("invalid {part} value for `{name}`: {source}")]
    Serialize {
        part: RoutePart,
        name: String,
        source: ValidationError,
    },

    /// Required pathname param has no value while building a pathname
    #[error("missing value for pathname param `{0}`")]
    MissingParam(String),

    /// A `defined()` value is missing or malformed in external input
    #[error("required {part} value `{name}` is missing or invalid: {source}")]
    Required {
        part: RoutePart,
        name: String,
        source: ValidationError,
    },
}

pub type Result<T, E = RouteError> = std::result::Result<T, E>;
