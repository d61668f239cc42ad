//! Typed route definitions
//!
//! Routes declare a relative path pattern plus types for their pathname
//! params, search params, hash and navigation state. Nodes nest: children
//! inherit everything from their parents and their paths are concatenated.
//! Reusable pathless fragments are merged in with `compose`.
//!
//! ```
//! use rhtmx_typed_routes::{route, types, BuildOptions, RouteConfig, SearchParams, Value};
//!
//! let pagination = route(
//!     RouteConfig::new().search_param("page", types::number().default(1).unwrap()),
//! )
//! .unwrap();
//!
//! let user = route(
//!     RouteConfig::new()
//!         .path("user/:id")
//!         .param("id", types::number())
//!         .compose(&pagination),
//! )
//! .unwrap();
//! let app = route(RouteConfig::new().path("app").child("USER", user)).unwrap();
//!
//! let opts = BuildOptions::new().param("id", 42).search_param("page", 3);
//! assert_eq!(app["USER"].build_path(&opts).unwrap(), "/app/user/42?page=3");
//!
//! let parsed = app["USER"]
//!     .deserialize_search_params(&SearchParams::parse("?page=oops"))
//!     .unwrap();
//! assert_eq!(parsed.get("page"), Some(&Value::Number(1.0)));
//! ```

mod error;
pub mod path;
mod route;
mod search;
pub mod serialize;
pub mod spec;
pub mod types;
mod value;

pub use error::{Result, RouteError, RoutePart, ValidationError};
pub use route::{route, Children, RouteConfig, RouteNode};
pub use search::SearchParams;
pub use serialize::BuildOptions;
pub use spec::{Fragment, HashSpec, RouteSpec, StateSpec};
pub use value::{Value, Values};
