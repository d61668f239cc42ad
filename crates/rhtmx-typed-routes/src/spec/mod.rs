//! Route specifications
//!
//! A [`RouteSpec`] is the resolved description of one route node: its
//! relative path pattern and the types of every part of its location.
//! Specs are immutable once built and shared behind `Arc`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::path::{parse_path, remove_intermediate_stars, to_absolute, PathParams};
use crate::route::RouteNode;
use crate::types::{HashType, PathnameType, SearchType, StateType};

pub mod merge;
pub use merge::{merge, MergePolicy};

pub type PathnameTypes = BTreeMap<String, Arc<dyn PathnameType>>;
pub type SearchTypes = BTreeMap<String, Arc<dyn SearchType>>;
pub type StateTypes = BTreeMap<String, Arc<dyn StateType>>;

/// How the URL fragment is typed
#[derive(Clone)]
pub enum HashSpec {
    /// Allow-list of plain strings; empty means any hash is accepted
    Values(Vec<String>),
    /// Custom type, replacing any inherited allow-list
    Typed(Arc<dyn HashType>),
}

impl Default for HashSpec {
    fn default() -> Self {
        HashSpec::Values(Vec::new())
    }
}

impl HashSpec {
    pub fn typed(ty: impl HashType + 'static) -> Self {
        HashSpec::Typed(Arc::new(ty))
    }

    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HashSpec::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, HashSpec::Typed(_))
    }
}

impl fmt::Debug for HashSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashSpec::Values(values) => f.debug_tuple("Values").field(values).finish(),
            HashSpec::Typed(_) => f.write_str("Typed(..)"),
        }
    }
}

/// How navigation state is typed
#[derive(Clone)]
pub enum StateSpec {
    /// One type per state field; other fields pass through untyped
    Fields(StateTypes),
    /// One type for the state value as a whole
    Whole(Arc<dyn StateType>),
}

impl Default for StateSpec {
    fn default() -> Self {
        StateSpec::Fields(BTreeMap::new())
    }
}

impl StateSpec {
    pub fn whole(ty: impl StateType + 'static) -> Self {
        StateSpec::Whole(Arc::new(ty))
    }

    pub fn is_whole(&self) -> bool {
        matches!(self, StateSpec::Whole(_))
    }

    pub fn fields(&self) -> Option<&StateTypes> {
        match self {
            StateSpec::Fields(fields) => Some(fields),
            StateSpec::Whole(_) => None,
        }
    }
}

impl fmt::Debug for StateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSpec::Fields(fields) => f
                .debug_tuple("Fields")
                .field(&fields.keys().collect::<Vec<_>>())
                .finish(),
            StateSpec::Whole(_) => f.write_str("Whole(..)"),
        }
    }
}

/// Resolved description of a route node
#[derive(Clone, Default)]
pub struct RouteSpec {
    pub(crate) path: Option<String>,
    pub(crate) params: PathnameTypes,
    pub(crate) search_params: SearchTypes,
    pub(crate) hash: HashSpec,
    pub(crate) state: StateSpec,
}

impl RouteSpec {
    /// Relative pattern as declared and concatenated, `None` for pathless nodes
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Relative pattern with intermediate wildcards removed
    pub fn display_path(&self) -> Option<String> {
        self.path.as_deref().map(remove_intermediate_stars)
    }

    /// Absolute form of [`display_path`](Self::display_path)
    pub fn absolute_path(&self) -> Option<String> {
        to_absolute(self.display_path().as_deref())
    }

    /// Parameter names of the display pattern
    pub fn path_params(&self) -> PathParams {
        self.display_path()
            .map(|p| parse_path(&p))
            .unwrap_or_default()
    }

    pub fn params(&self) -> &PathnameTypes {
        &self.params
    }

    pub fn search_params(&self) -> &SearchTypes {
        &self.search_params
    }

    pub fn hash(&self) -> &HashSpec {
        &self.hash
    }

    pub fn state(&self) -> &StateSpec {
        &self.state
    }

    /// Copy of this spec with another path
    pub(crate) fn with_path(&self, path: Option<String>) -> Self {
        Self {
            path,
            ..self.clone()
        }
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("path", &self.path)
            .field("params", &self.params.keys().collect::<Vec<_>>())
            .field("search_params", &self.search_params.keys().collect::<Vec<_>>())
            .field("hash", &self.hash)
            .field("state", &self.state)
            .finish()
    }
}

/// Reusable piece of a route definition, merged with `compose`
///
/// Either a bare spec or a whole (pathless) route node.
#[derive(Debug, Clone)]
pub enum Fragment {
    Spec(Arc<RouteSpec>),
    Route(RouteNode),
}

impl Fragment {
    pub fn spec(&self) -> &RouteSpec {
        match self {
            Fragment::Spec(spec) => spec,
            Fragment::Route(node) => node.spec(),
        }
    }
}

impl From<RouteSpec> for Fragment {
    fn from(spec: RouteSpec) -> Self {
        Fragment::Spec(Arc::new(spec))
    }
}

impl From<Arc<RouteSpec>> for Fragment {
    fn from(spec: Arc<RouteSpec>) -> Self {
        Fragment::Spec(spec)
    }
}

impl From<RouteNode> for Fragment {
    fn from(node: RouteNode) -> Self {
        Fragment::Route(node)
    }
}

impl From<&RouteNode> for Fragment {
    fn from(node: &RouteNode) -> Self {
        Fragment::Route(node.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path_strips_intermediate_stars() {
        let spec = RouteSpec {
            path: Some("files/*/edit/:id".to_string()),
            ..RouteSpec::default()
        };
        assert_eq!(spec.display_path().as_deref(), Some("files/edit/:id"));
        assert_eq!(spec.absolute_path().as_deref(), Some("/files/edit/:id"));
        assert_eq!(spec.path_params().all, vec!["id"]);
    }

    #[test]
    fn test_pathless_spec_has_no_absolute_path() {
        let spec = RouteSpec::default();
        assert_eq!(spec.absolute_path(), None);
        assert!(spec.path_params().all.is_empty());
    }
}
