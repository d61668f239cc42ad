//! Spec merging
//!
//! One reducer serves both composition (fragments into a node) and
//! inheritance (parent into child). The policies differ only in how the path
//! combines; every map merge is right-biased.

use std::collections::BTreeMap;

use super::{HashSpec, RouteSpec, StateSpec};
use crate::path::{join_paths, parse_path, remove_intermediate_stars};

/// How two specs combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Fragment into node: the path is taken, not concatenated
    Compose,
    /// Parent into child: paths are concatenated
    Inherit,
}

/// Merges `overlay` on top of `base`
///
/// - path: taken from `overlay` if set (compose) or joined (inherit)
/// - params: right-biased, then restricted to the names of the resulting path
/// - search params and state fields: right-biased
/// - hash allow-lists accumulate; a typed hash replaces them
///
/// # Examples
///
/// ```
/// use rhtmx_typed_routes::spec::{merge, MergePolicy};
/// use rhtmx_typed_routes::{route, RouteConfig};
///
/// let parent = route(RouteConfig::new().path("test")).unwrap();
/// let child = route(RouteConfig::new().path("child")).unwrap();
///
/// let merged = merge(MergePolicy::Inherit, parent.spec(), child.spec());
/// assert_eq!(merged.path(), Some("test/child"));
/// ```
pub fn merge(policy: MergePolicy, base: &RouteSpec, overlay: &RouteSpec) -> RouteSpec {
    let path = match policy {
        MergePolicy::Compose => overlay.path.clone().or_else(|| base.path.clone()),
        MergePolicy::Inherit => join_paths(base.path.as_deref(), overlay.path.as_deref()),
    };

    let mut params = right_biased(&base.params, &overlay.params);

    // A pathname type only applies where its segment exists
    if let Some(path) = &path {
        let visible = parse_path(&remove_intermediate_stars(path));
        params.retain(|name, _| visible.contains(name));
    }

    RouteSpec {
        path,
        params,
        search_params: right_biased(&base.search_params, &overlay.search_params),
        hash: merge_hash(&base.hash, &overlay.hash),
        state: merge_state(&base.state, &overlay.state),
    }
}

fn right_biased<V: Clone>(
    base: &BTreeMap<String, V>,
    overlay: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    let mut merged = base.clone();
    merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

fn merge_hash(base: &HashSpec, overlay: &HashSpec) -> HashSpec {
    match (base, overlay) {
        (HashSpec::Values(base), HashSpec::Values(overlay)) => {
            let mut values = base.clone();
            for value in overlay {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
            HashSpec::Values(values)
        }
        (HashSpec::Typed(_), HashSpec::Values(values)) if values.is_empty() => base.clone(),
        _ => overlay.clone(),
    }
}

fn merge_state(base: &StateSpec, overlay: &StateSpec) -> StateSpec {
    match (base, overlay) {
        (StateSpec::Fields(base), StateSpec::Fields(overlay)) => {
            StateSpec::Fields(right_biased(base, overlay))
        }
        (StateSpec::Whole(_), StateSpec::Fields(fields)) if fields.is_empty() => base.clone(),
        _ => overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::{number, string, union};

    fn spec(path: Option<&str>) -> RouteSpec {
        RouteSpec {
            path: path.map(String::from),
            ..RouteSpec::default()
        }
    }

    #[test]
    fn test_inherit_concatenates_paths() {
        let merged = merge(MergePolicy::Inherit, &spec(Some("test")), &spec(Some("child")));
        assert_eq!(merged.path(), Some("test/child"));

        let merged = merge(MergePolicy::Inherit, &spec(Some("")), &spec(Some("child")));
        assert_eq!(merged.path(), Some("child"));

        let merged = merge(MergePolicy::Inherit, &spec(Some("test")), &spec(Some("")));
        assert_eq!(merged.path(), Some("test"));

        let merged = merge(MergePolicy::Inherit, &spec(Some("")), &spec(Some("")));
        assert_eq!(merged.path(), Some(""));
    }

    #[test]
    fn test_compose_keeps_node_path() {
        let merged = merge(MergePolicy::Compose, &spec(None), &spec(Some("node")));
        assert_eq!(merged.path(), Some("node"));

        let merged = merge(MergePolicy::Compose, &spec(Some("node")), &spec(None));
        assert_eq!(merged.path(), Some("node"));
    }

    #[test]
    fn test_params_filtered_by_combined_path() {
        let mut parent = spec(Some("test/:id"));
        parent.params.insert("id".to_string(), Arc::new(number()));

        let trimmed = parent.with_path(Some(String::new()));
        let merged = merge(MergePolicy::Inherit, &trimmed, &spec(Some("child/:subId")));
        assert!(merged.params.is_empty());

        let merged = merge(MergePolicy::Inherit, &parent, &spec(Some("child/:subId")));
        assert!(merged.params.contains_key("id"));
    }

    #[test]
    fn test_params_of_pathless_merge_are_kept() {
        let mut fragment = spec(None);
        fragment.params.insert("id".to_string(), Arc::new(number()));

        let merged = merge(MergePolicy::Compose, &spec(None), &fragment);
        assert!(merged.params.contains_key("id"));
    }

    #[test]
    fn test_search_params_right_biased() {
        let mut base = spec(None);
        base.search_params.insert("q".to_string(), Arc::new(number()));
        base.search_params.insert("page".to_string(), Arc::new(number()));
        let mut overlay = spec(None);
        overlay.search_params.insert("q".to_string(), Arc::new(string()));

        let merged = merge(MergePolicy::Inherit, &base, &overlay);
        assert_eq!(merged.search_params.len(), 2);
        assert!(Arc::ptr_eq(&merged.search_params["q"], &overlay.search_params["q"]));
    }

    #[test]
    fn test_hash_values_accumulate() {
        let base = RouteSpec {
            hash: HashSpec::values(["foo", "bar"]),
            ..RouteSpec::default()
        };
        let overlay = RouteSpec {
            hash: HashSpec::values(["bar", "baz"]),
            ..RouteSpec::default()
        };

        match merge(MergePolicy::Compose, &base, &overlay).hash {
            HashSpec::Values(values) => assert_eq!(values, vec!["foo", "bar", "baz"]),
            HashSpec::Typed(_) => panic!("expected values"),
        }
    }

    #[test]
    fn test_typed_hash_replaces_values() {
        let base = RouteSpec {
            hash: HashSpec::values(["foo"]),
            ..RouteSpec::default()
        };
        let typed = RouteSpec {
            hash: HashSpec::typed(union(["a", "b"])),
            ..RouteSpec::default()
        };

        assert!(merge(MergePolicy::Inherit, &base, &typed).hash.is_typed());
        assert!(merge(MergePolicy::Inherit, &typed, &spec(None)).hash.is_typed());
        assert!(!merge(MergePolicy::Inherit, &typed, &base).hash.is_typed());
    }

    #[test]
    fn test_whole_state_replaces_fields() {
        let mut fields = spec(None);
        if let StateSpec::Fields(map) = &mut fields.state {
            map.insert("from".to_string(), Arc::new(string()));
        }
        let whole = RouteSpec {
            state: StateSpec::whole(number()),
            ..RouteSpec::default()
        };

        assert!(merge(MergePolicy::Inherit, &fields, &whole).state.is_whole());
        assert!(merge(MergePolicy::Inherit, &whole, &spec(None)).state.is_whole());
        assert!(!merge(MergePolicy::Inherit, &whole, &fields).state.is_whole());
    }
}
