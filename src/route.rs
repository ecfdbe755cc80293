//! Route definitions and path resolution.
//!
//! Routes map hash-bang paths to controller/action pairs. A route's pattern
//! is a regular expression tested against the path remainder after `#!`.
//!
//! Resolution rules, in order:
//!
//! 1. An empty path, or an anchor-only path (`#top`, `#`), resolves to the
//!    **root route** (the last registered route), whatever its pattern.
//! 2. A path of the form `#!<something>` resolves to the first route, in
//!    registration order, whose pattern matches `<something>`. There is no
//!    ranking by specificity.
//! 3. Anything else resolves to nothing, which the router renders as
//!    not-found.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{Route, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.add_routes([
//!     Route::new("^/a$", "A").unwrap(),
//!     Route::new("^/a/.*$", "B").unwrap(),
//!     Route::root("Home"),
//! ]);
//!
//! assert_eq!(table.route_for("#!/a").unwrap().controller, "A");
//! assert_eq!(table.route_for("#!/a/1").unwrap().controller, "B");
//! assert_eq!(table.route_for("").unwrap().controller, "Home");
//! assert!(table.route_for("#!/zzz").is_none());
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, RouteCache};
use crate::error::SpaError;
use crate::params::HASH_BANG;
use crate::{info_log, trace_log};
use regex::Regex;

/// A pattern-to-controller mapping.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: Option<Regex>,
    /// Controller invoked for matching paths.
    pub controller: String,
    /// Action invoked on the controller; the default action when absent.
    pub action: Option<String>,
}

impl Route {
    /// Create a route from a regular expression source.
    pub fn new(pattern: &str, controller: impl Into<String>) -> Result<Self, SpaError> {
        let regex = Regex::new(pattern).map_err(|source| SpaError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: Some(regex),
            controller: controller.into(),
            action: None,
        })
    }

    /// Create a route without a pattern.
    ///
    /// It never matches a hash-bang path and is meant to be registered last,
    /// as the root route.
    pub fn root(controller: impl Into<String>) -> Self {
        Self {
            pattern: None,
            controller: controller.into(),
            action: None,
        }
    }

    /// Set the action to invoke.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Source of the route's pattern.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Test the pattern against a path remainder (the part after `#!`).
    pub fn matches(&self, remainder: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(remainder))
    }

    /// The action to invoke, falling back to `default`.
    pub fn action_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.action.as_deref().unwrap_or(default)
    }

    /// Conventional template name: `controller__action` when the route
    /// names its action, the bare controller otherwise.
    pub fn template_name(&self) -> String {
        match &self.action {
            Some(action) => format!("{}__{}", self.controller, action),
            None => self.controller.clone(),
        }
    }
}

/// Return `true` for paths that always go to the root route.
pub fn is_root_path(path: &str) -> bool {
    path.is_empty() || (path.starts_with('#') && !path.starts_with(HASH_BANG))
}

/// Ordered route list with cached resolution.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    #[cfg(feature = "cache")]
    cache: RouteCache,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table whose resolution cache holds `capacity` paths.
    #[cfg(feature = "cache")]
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            routes: Vec::new(),
            cache: RouteCache::with_capacity(capacity),
        }
    }

    /// Append routes after the existing ones.
    ///
    /// The last route of the table is the root route, so appending changes
    /// which route serves the empty path.
    pub fn add_routes(&mut self, routes: impl IntoIterator<Item = Route>) {
        let before = self.routes.len();
        self.routes.extend(routes);
        info_log!(
            "Registered {} route(s), {} total",
            self.routes.len() - before,
            self.routes.len()
        );
        #[cfg(feature = "cache")]
        self.cache.clear();
    }

    /// Resolve a path to its route.
    pub fn route_for(&mut self, path: &str) -> Option<&Route> {
        #[cfg(feature = "cache")]
        let index = match self.cache.get(path) {
            Some(index) => index,
            None => {
                let index = self.resolve(path);
                self.cache.insert(path.to_string(), index);
                index
            }
        };
        #[cfg(not(feature = "cache"))]
        let index = self.resolve(path);

        index.and_then(|i| self.routes.get(i))
    }

    /// Resolve a path to a route index without touching the cache.
    pub fn resolve(&self, path: &str) -> Option<usize> {
        if is_root_path(path) {
            trace_log!("'{}' resolves to the root route", path);
            return self.routes.len().checked_sub(1);
        }

        let remainder = path.strip_prefix(HASH_BANG)?;
        if remainder.is_empty() {
            return None;
        }
        self.routes.iter().position(|route| route.matches(remainder))
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The root route (last registered).
    pub fn root(&self) -> Option<&Route> {
        self.routes.last()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Return `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolution cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }
}
