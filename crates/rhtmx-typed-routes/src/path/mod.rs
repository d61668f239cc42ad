//! Path pattern utilities: analysis, joining and templating
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.
//!
//! Patterns are relative (`users/:id`); the absolute form is derived on demand.

use std::collections::BTreeMap;

use crate::error::{Result, RouteError};

pub mod pattern;
pub use pattern::{classify_segment, PatternSegment, WILDCARD};

/// Parameter names found in a path pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    /// Every parameter name, in pattern order (wildcard last)
    pub all: Vec<String>,
    /// Names whose value may be absent (`:name?` and the wildcard)
    pub optional: Vec<String>,
}

impl PathParams {
    pub fn contains(&self, name: &str) -> bool {
        self.all.iter().any(|p| p == name)
    }

    pub fn is_optional(&self, name: &str) -> bool {
        self.optional.iter().any(|p| p == name)
    }

    /// Names that must be supplied when filling the pattern
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.all
            .iter()
            .filter(|name| !self.is_optional(name))
            .map(String::as_str)
    }
}

/// Parses a pattern into its parameter names
///
/// A `*` segment anywhere in the pattern stands for the trailing catch-all,
/// whose captured value is always optional.
///
/// # Examples
///
/// ```
/// use rhtmx_typed_routes::path::parse_path;
///
/// let params = parse_path("users/:id/posts/:postId?/*");
/// assert_eq!(params.all, vec!["id", "postId", "*"]);
/// assert_eq!(params.optional, vec!["postId", "*"]);
/// ```
pub fn parse_path(pattern: &str) -> PathParams {
    let mut params = PathParams::default();
    let mut has_wildcard = false;

    for segment in pattern::segments(pattern) {
        match segment {
            PatternSegment::Wildcard => has_wildcard = true,
            PatternSegment::Optional(name) => {
                if !params.contains(name) {
                    params.all.push(name.to_string());
                    params.optional.push(name.to_string());
                }
            }
            PatternSegment::Required(name) => {
                if !params.contains(name) {
                    params.all.push(name.to_string());
                }
            }
            PatternSegment::Static(_) => {}
        }
    }

    if has_wildcard {
        params.all.push(WILDCARD.to_string());
        params.optional.push(WILDCARD.to_string());
    }

    params
}

/// Removes every wildcard segment that is not the last one
///
/// Ancestors declare `*` so that nested routes can match beneath them; once
/// a child path is appended the star is no longer meaningful.
///
/// # Examples
///
/// ```
/// use rhtmx_typed_routes::path::remove_intermediate_stars;
///
/// assert_eq!(remove_intermediate_stars("test/*/child/*?/:id"), "test/child/:id");
/// assert_eq!(remove_intermediate_stars("test/*"), "test/*");
/// ```
pub fn remove_intermediate_stars(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').collect();
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .filter(|(i, segment)| *i == last || !matches!(**segment, "*" | "*?"))
        .map(|(_, segment)| *segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Absolute form of a relative pattern
///
/// ```
/// use rhtmx_typed_routes::path::to_absolute;
///
/// assert_eq!(to_absolute(Some("users/:id")), Some("/users/:id".to_string()));
/// assert_eq!(to_absolute(None), None);
/// ```
pub fn to_absolute(pattern: Option<&str>) -> Option<String> {
    pattern.map(|p| format!("/{p}"))
}

/// Concatenates a parent and a child pattern
///
/// An empty or absent side yields the other side unchanged.
///
/// ```
/// use rhtmx_typed_routes::path::join_paths;
///
/// assert_eq!(join_paths(Some("test"), Some("child")), Some("test/child".to_string()));
/// assert_eq!(join_paths(Some(""), Some("child")), Some("child".to_string()));
/// assert_eq!(join_paths(None, None), None);
/// ```
pub fn join_paths(parent: Option<&str>, child: Option<&str>) -> Option<String> {
    match (parent, child) {
        (Some(p), Some(c)) if !p.is_empty() && !c.is_empty() => Some(format!("{p}/{c}")),
        (Some(p), Some(c)) if p.is_empty() => Some(c.to_string()),
        (Some(p), _) => Some(p.to_string()),
        (None, c) => c.map(str::to_string),
    }
}

/// Checks the slash invariant of a declared pattern
pub fn validate_path(path: &str) -> Result<()> {
    if path.starts_with('/') || path.ends_with('/') {
        return Err(RouteError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Fills a pattern with already-serialized param values
///
/// Missing or empty optional params and wildcard values drop their segment;
/// a missing required param is an error, an empty one fills an empty segment
/// (`users//edit`). Named values are percent-encoded, the wildcard keeps its
/// `/` separators.
///
/// # Examples
///
/// ```
/// use rhtmx_typed_routes::path::fill;
/// use std::collections::BTreeMap;
///
/// let mut params = BTreeMap::new();
/// params.insert("id".to_string(), "a b".to_string());
/// params.insert("*".to_string(), "docs/intro".to_string());
///
/// assert_eq!(fill("users/:id/:tab?/*", &params).unwrap(), "/users/a%20b/docs/intro");
/// ```
pub fn fill(pattern: &str, params: &BTreeMap<String, String>) -> Result<String> {
    let segments: Vec<String> = pattern::segments(pattern)
        .map(|segment| match segment {
            PatternSegment::Static(text) => Ok(Some(text.to_string())),
            PatternSegment::Required(name) => params
                .get(name)
                .map(|v| Some(urlencoding::encode(v).into_owned()))
                .ok_or_else(|| RouteError::MissingParam(name.to_string())),
            PatternSegment::Optional(name) => Ok(params
                .get(name)
                .filter(|v| !v.is_empty())
                .map(|v| urlencoding::encode(v).into_owned())),
            PatternSegment::Wildcard => Ok(params
                .get(WILDCARD)
                .filter(|v| !v.is_empty())
                .map(|v| {
                    v.split('/')
                        .map(|piece| urlencoding::encode(piece).into_owned())
                        .collect::<Vec<_>>()
                        .join("/")
                })),
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    Ok(format!("/{}", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_static() {
        assert_eq!(parse_path("about"), PathParams::default());
    }

    #[test]
    fn test_parse_path_required_and_optional() {
        let params = parse_path("users/:id/:tab?");
        assert_eq!(params.all, vec!["id", "tab"]);
        assert_eq!(params.optional, vec!["tab"]);
        assert_eq!(params.required().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_parse_path_wildcard_anywhere_is_trailing() {
        let params = parse_path("files/*/:id");
        assert_eq!(params.all, vec!["id", "*"]);
        assert!(params.is_optional("*"));
    }

    #[test]
    fn test_parse_path_optional_wildcard() {
        let params = parse_path("files/*?");
        assert_eq!(params.all, vec!["*"]);
        assert_eq!(params.optional, vec!["*"]);
    }

    #[test]
    fn test_remove_intermediate_stars_idempotent() {
        for pattern in ["a/*/b/*", "*/*?/*", "a/b", "", "*", "a/*?/b"] {
            let once = remove_intermediate_stars(pattern);
            assert_eq!(remove_intermediate_stars(&once), once, "pattern {pattern}");
        }
    }

    #[test]
    fn test_remove_intermediate_stars_keeps_trailing() {
        assert_eq!(remove_intermediate_stars("*/*"), "*");
        assert_eq!(remove_intermediate_stars("a/*?"), "a/*?");
        assert_eq!(remove_intermediate_stars("*/b"), "b");
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths(Some("test"), Some("child")).as_deref(), Some("test/child"));
        assert_eq!(join_paths(Some(""), Some("child")).as_deref(), Some("child"));
        assert_eq!(join_paths(Some("test"), Some("")).as_deref(), Some("test"));
        assert_eq!(join_paths(Some(""), Some("")).as_deref(), Some(""));
        assert_eq!(join_paths(Some("test"), None).as_deref(), Some("test"));
        assert_eq!(join_paths(None, Some("child")).as_deref(), Some("child"));
        assert_eq!(join_paths(None, None), None);
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("users/:id").is_ok());
        assert!(validate_path("").is_ok());
        assert!(validate_path("/users").is_err());
        assert!(validate_path("users/").is_err());
    }

    #[test]
    fn test_fill_missing_required() {
        let err = fill("users/:id", &BTreeMap::new()).unwrap_err();
        assert_eq!(err, RouteError::MissingParam("id".to_string()));
    }

    #[test]
    fn test_fill_keeps_empty_required_segment() {
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), String::new());
        assert_eq!(fill("users/:id/edit", &params).unwrap(), "/users//edit");

        params.insert("tab".to_string(), String::new());
        params.insert("*".to_string(), String::new());
        assert_eq!(fill("users/:id/:tab?/*", &params).unwrap(), "/users/");
    }

    #[test]
    fn test_fill_drops_missing_optional() {
        assert_eq!(fill("users/:id?/edit", &BTreeMap::new()).unwrap(), "/users/edit");
        assert_eq!(fill("", &BTreeMap::new()).unwrap(), "/");
    }
}
