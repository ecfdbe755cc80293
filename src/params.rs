//! Parameters parsed from hash-bang paths.
//!
//! Two encodings are supported, selected by [`ParamStyle`]:
//!
//! - [`ParamStyle::Segments`] (default): REST-like pairs,
//!   `#!/id/42/name/joe` gives `{id: "42", name: "joe"}`. An odd trailing
//!   key is kept with an absent value. Nothing is decoded.
//! - [`ParamStyle::Query`]: query-string pairs,
//!   `#!id=42&name=jo+e%21` gives `{id: "42", name: "jo e!"}`. `+` becomes a
//!   space and percent escapes are decoded.
//!
//! Paths that do not start with `#!` have no parameters.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{ParamStyle, RouteParams};
//!
//! let params = RouteParams::from_hash("#!/id/42/name/joe", ParamStyle::Segments);
//! assert_eq!(params.get("id"), Some("42"));
//! assert_eq!(params.get_as::<u32>("id"), Some(42));
//! assert_eq!(params.get("name"), Some("joe"));
//! ```

use std::collections::HashMap;

/// Marker that opens every in-app path.
pub const HASH_BANG: &str = "#!";

/// Encoding of parameters inside a hash-bang path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamStyle {
    /// `#!/key/value/key/value`, no decoding.
    #[default]
    Segments,
    /// `#!key=value&key=value`, `+` and percent escapes decoded.
    Query,
}

/// Parameters of one request.
///
/// A key may be present without a value (odd trailing segment).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteParams {
    params: HashMap<String, Option<String>>,
}

impl RouteParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing map of present values.
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self {
            params: params.into_iter().map(|(k, v)| (k, Some(v))).collect(),
        }
    }

    /// Parse the parameters of a hash path.
    pub fn from_hash(path: &str, style: ParamStyle) -> Self {
        let Some(rest) = path.strip_prefix(HASH_BANG) else {
            return Self::new();
        };
        match style {
            ParamStyle::Segments => Self::from_segments(rest),
            ParamStyle::Query => Self::from_query(rest),
        }
    }

    fn from_segments(rest: &str) -> Self {
        let mut params = Self::new();
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        if rest.is_empty() {
            return params;
        }

        let tokens: Vec<&str> = rest.split('/').collect();
        for pair in tokens.chunks(2) {
            let key = pair[0];
            if key.is_empty() {
                continue;
            }
            params
                .params
                .insert(key.to_string(), pair.get(1).map(|v| (*v).to_string()));
        }
        params
    }

    fn from_query(rest: &str) -> Self {
        let mut params = Self::new();
        let rest = rest.replace('+', " ");
        let rest = rest.trim_start_matches(&['/', '?'][..]);

        for pair in rest.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                if key.is_empty() {
                    continue;
                }
                params.insert(decode_component(key), decode_component(value));
            }
        }
        params
    }

    /// Get a parameter value. Keys without a value yield `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.as_deref()
    }

    /// Get a parameter and parse it as a specific type.
    ///
    /// Returns `None` if the parameter is missing, has no value, or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, Some(value));
    }

    /// Insert a key without a value.
    pub fn insert_absent(&mut self, key: String) {
        self.params.insert(key, None);
    }

    /// Return `true` if the key is present, with or without a value.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

fn decode_component(s: &str) -> String {
    urlencoding::decode(s).map_or_else(|_| s.to_string(), |decoded| decoded.into_owned())
}

// ============================================================================
// Tests
// ============================================================================
