//! Route nodes
//!
//! [`route`] turns a [`RouteConfig`] into a [`RouteNode`]: the node's own
//! spec is composed from its fragments, and every child is re-resolved with
//! the node's spec as its parent. Nodes are immutable; attaching a node to a
//! parent produces new nodes and leaves the original untouched.

use std::collections::{BTreeMap, HashMap};
use std::ops::Index;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{Result, RouteError};
use crate::path::{parse_path, validate_path};
use crate::search::SearchParams;
use crate::serialize::{self, BuildOptions};
use crate::spec::{
    merge, Fragment, HashSpec, MergePolicy, PathnameTypes, RouteSpec, SearchTypes, StateSpec,
};
use crate::types::{HashType, PathnameType, SearchType, StateType};
use crate::value::{Value, Values};

/// Child nodes by name
pub type Children = BTreeMap<String, RouteNode>;

/// Declaration of a route node
///
/// Builder-style: every method consumes and returns the config.
///
/// ```
/// use rhtmx_typed_routes::{route, types, RouteConfig};
///
/// let user = route(
///     RouteConfig::new()
///         .path("users/:id")
///         .param("id", types::number())
///         .search_param("tab", types::union(["info", "posts"]))
///         .hash(["top"]),
/// )
/// .unwrap();
///
/// assert_eq!(user.path().as_deref(), Some("/users/:id"));
/// ```
#[derive(Clone, Default)]
pub struct RouteConfig {
    path: Option<String>,
    params: PathnameTypes,
    search_params: SearchTypes,
    hash: Option<HashSpec>,
    state: Option<StateSpec>,
    compose: Vec<Fragment>,
    children: Children,
}

impl RouteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative path pattern, e.g. `users/:id/*`
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl PathnameType + 'static) -> Self {
        self.params.insert(name.into(), Arc::new(ty));
        self
    }

    pub fn search_param(mut self, name: impl Into<String>, ty: impl SearchType + 'static) -> Self {
        self.search_params.insert(name.into(), Arc::new(ty));
        self
    }

    /// Allow-list of hash values; an empty list accepts any hash
    pub fn hash<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hash = Some(HashSpec::values(values));
        self
    }

    pub fn hash_type(mut self, ty: impl HashType + 'static) -> Self {
        self.hash = Some(HashSpec::typed(ty));
        self
    }

    /// Types one field of object-shaped state
    ///
    /// Replaces a whole-state type set earlier on this config.
    pub fn state_field(mut self, name: impl Into<String>, ty: impl StateType + 'static) -> Self {
        let mut fields = match self.state.take() {
            Some(StateSpec::Fields(fields)) => fields,
            _ => BTreeMap::new(),
        };
        fields.insert(name.into(), Arc::new(ty));
        self.state = Some(StateSpec::Fields(fields));
        self
    }

    /// Types the state value as a whole
    pub fn state(mut self, ty: impl StateType + 'static) -> Self {
        self.state = Some(StateSpec::whole(ty));
        self
    }

    /// Adds a pathless fragment; later fragments win over earlier ones and
    /// the node's own declarations win over all of them
    pub fn compose(mut self, fragment: impl Into<Fragment>) -> Self {
        self.compose.push(fragment.into());
        self
    }

    pub fn child(mut self, name: impl Into<String>, node: RouteNode) -> Self {
        self.children.insert(name.into(), node);
        self
    }
}

/// A resolved route, with its children already inheriting from it
#[derive(Debug, Clone)]
pub struct RouteNode {
    /// Spec after composition, before inheritance
    own: Arc<RouteSpec>,
    /// Spec after inheritance
    spec: Arc<RouteSpec>,
    children: Children,
    trimmed: OnceCell<Children>,
}

/// Builds a route node from its declaration
///
/// Fails on configuration errors: a path starting or ending with `/`, a
/// declared param missing from the path, or a path on a composed fragment.
pub fn route(config: RouteConfig) -> Result<RouteNode> {
    let RouteConfig {
        path,
        params,
        search_params,
        hash,
        state,
        compose,
        children,
    } = config;

    if let Some(path) = &path {
        validate_path(path)?;

        let declared = parse_path(path);
        if let Some(param) = params.keys().find(|name| !declared.contains(name)) {
            return Err(RouteError::UnknownParam {
                param: param.clone(),
                path: path.clone(),
            });
        }
    }

    if let Some(path) = compose.iter().find_map(|f| f.spec().path()) {
        return Err(RouteError::PathedFragment {
            path: path.to_string(),
        });
    }

    let declared = RouteSpec {
        path,
        params,
        search_params,
        hash: hash.unwrap_or_default(),
        state: state.unwrap_or_default(),
    };

    let composed = compose
        .iter()
        .map(Fragment::spec)
        .fold(RouteSpec::default(), |acc, fragment| {
            merge(MergePolicy::Compose, &acc, fragment)
        });
    let own = Arc::new(merge(MergePolicy::Compose, &composed, &declared));

    tracing::debug!(
        path = ?own.path(),
        params = own.params().len(),
        search_params = own.search_params().len(),
        fragments = compose.len(),
        children = children.len(),
        "resolved route"
    );

    Ok(RouteNode::resolve(Arc::clone(&own), own, &children))
}

impl RouteNode {
    fn resolve(spec: Arc<RouteSpec>, own: Arc<RouteSpec>, declared: &Children) -> Self {
        let children = declared
            .iter()
            .map(|(name, child)| (name.clone(), child.inherit(&spec)))
            .collect();

        Self {
            own,
            spec,
            children,
            trimmed: OnceCell::new(),
        }
    }

    /// This node re-resolved beneath `parent`
    fn inherit(&self, parent: &RouteSpec) -> Self {
        let spec = Arc::new(merge(MergePolicy::Inherit, parent, &self.own));
        tracing::debug!(path = ?spec.path(), "attached child route");
        Self::resolve(spec, Arc::clone(&self.own), &self.children)
    }

    // ========================================================================
    // Tree access
    // ========================================================================

    /// Resolved spec, including everything inherited
    pub fn spec(&self) -> &RouteSpec {
        &self.spec
    }

    /// Spec as declared and composed, without inheritance
    pub fn own_spec(&self) -> &RouteSpec {
        &self.own
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&RouteNode> {
        self.children.get(name)
    }

    /// Children resolved as if this node's path were empty
    ///
    /// Useful for nested routers, which match child paths relative to the
    /// parent. Search, hash and state types are still inherited.
    ///
    /// ```
    /// use rhtmx_typed_routes::{route, RouteConfig};
    ///
    /// let child = route(RouteConfig::new().path("child/:id")).unwrap();
    /// let parent = route(RouteConfig::new().path("test").child("CHILD", child)).unwrap();
    ///
    /// assert_eq!(parent["CHILD"].path().as_deref(), Some("/test/child/:id"));
    /// assert_eq!(parent.trimmed()["CHILD"].path().as_deref(), Some("/child/:id"));
    /// ```
    pub fn trimmed(&self) -> &Children {
        self.trimmed.get_or_init(|| {
            let parent = self.spec.with_path(self.spec.path.as_ref().map(|_| String::new()));
            self.children
                .iter()
                .map(|(name, child)| (name.clone(), child.inherit(&parent)))
                .collect()
        })
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    /// Absolute pattern (`/users/:id`), `None` for pathless nodes
    pub fn path(&self) -> Option<String> {
        self.spec.absolute_path()
    }

    /// Relative pattern (`users/:id`), `None` for pathless nodes
    pub fn relative_path(&self) -> Option<String> {
        self.spec.display_path()
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Pathname, search and hash in one string
    pub fn build_path(&self, opts: &BuildOptions) -> Result<String> {
        serialize::build_path(&self.spec, opts)
    }

    pub fn build_pathname(&self, opts: &BuildOptions) -> Result<String> {
        serialize::build_pathname(&self.spec, opts)
    }

    pub fn build_search(&self, opts: &BuildOptions) -> Result<String> {
        serialize::build_search(&self.spec, opts)
    }

    pub fn build_hash(&self, opts: &BuildOptions) -> Result<String> {
        serialize::build_hash(&self.spec, opts)
    }

    pub fn build_state(&self, opts: &BuildOptions) -> Result<Value> {
        serialize::build_state(&self.spec, opts)
    }

    pub fn serialize_params(&self, opts: &BuildOptions) -> Result<BTreeMap<String, String>> {
        serialize::serialize_params(&self.spec, &opts.params)
    }

    pub fn serialize_search_params(&self, opts: &BuildOptions) -> Result<SearchParams> {
        serialize::serialize_search_params(&self.spec, opts)
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    pub fn deserialize_params(&self, raw: &HashMap<String, String>) -> Result<Values> {
        serialize::deserialize_params(&self.spec, raw)
    }

    pub fn deserialize_search_params(&self, raw: &SearchParams) -> Result<Values> {
        serialize::deserialize_search_params(&self.spec, raw)
    }

    pub fn deserialize_hash(&self, raw: &str) -> Result<Option<Value>> {
        serialize::deserialize_hash(&self.spec, raw)
    }

    pub fn deserialize_state(&self, raw: Option<&Value>) -> Result<Value> {
        serialize::deserialize_state(&self.spec, raw)
    }

    pub fn untyped_search_params(&self, raw: &SearchParams) -> SearchParams {
        serialize::untyped_search_params(&self.spec, raw)
    }

    pub fn untyped_state(&self, raw: Option<&Value>) -> Values {
        serialize::untyped_state(&self.spec, raw)
    }
}

/// Named child access; panics if the child doesn't exist
impl Index<&str> for RouteNode {
    type Output = RouteNode;

    fn index(&self, name: &str) -> &RouteNode {
        self.children
            .get(name)
            .unwrap_or_else(|| panic!("no child route named `{name}`"))
    }
}
