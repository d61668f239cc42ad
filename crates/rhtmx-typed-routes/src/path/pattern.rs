//! Segment classification for route path patterns
//!
//! Pure functional parsing of `react-router`-style patterns
//! (`users/:id/posts/:postId?/*`) into typed segments.
//! All functions are **pure**: same input → same output, no side effects.

/// Name under which a catch-all segment's value is stored
pub const WILDCARD: &str = "*";

/// Represents different types of path pattern segments
///
/// # Examples
///
/// ```
/// use rhtmx_typed_routes::path::pattern::{classify_segment, PatternSegment};
///
/// assert!(matches!(classify_segment("about"), PatternSegment::Static(_)));
/// assert!(matches!(classify_segment(":id"), PatternSegment::Required(_)));
/// assert!(matches!(classify_segment(":id?"), PatternSegment::Optional(_)));
/// assert!(matches!(classify_segment("*"), PatternSegment::Wildcard));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment<'a> {
    /// Catch-all segment: `*` or `*?`
    Wildcard,
    /// Optional parameter: `:id?`
    Optional(&'a str),
    /// Required parameter: `:id`
    Required(&'a str),
    /// Static text segment
    Static(&'a str),
}

impl PatternSegment<'_> {
    /// Parameter name carried by this segment, if any
    pub fn param_name(&self) -> Option<&str> {
        match self {
            PatternSegment::Wildcard => Some(WILDCARD),
            PatternSegment::Optional(name) | PatternSegment::Required(name) => Some(*name),
            PatternSegment::Static(_) => None,
        }
    }
}

/// Classifies a single segment (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Wildcard**: `*` or `*?`
/// 2. **Optional param**: `:name?`
/// 3. **Required param**: `:name`
/// 4. **Static**: any other text
pub fn classify_segment(segment: &str) -> PatternSegment<'_> {
    if segment == "*" || segment == "*?" {
        return PatternSegment::Wildcard;
    }

    match segment.strip_prefix(':') {
        Some(param) => match param.strip_suffix('?') {
            Some(name) => PatternSegment::Optional(name),
            None => PatternSegment::Required(param),
        },
        None => PatternSegment::Static(segment),
    }
}

/// Iterates the classified segments of a pattern
pub fn segments(pattern: &str) -> impl Iterator<Item = PatternSegment<'_>> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(classify_segment)
}
