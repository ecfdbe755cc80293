//! Request and response types passed through controllers and hooks.
//!
//! A [`Request`] is built once per navigation cycle and never mutated; each
//! request links to the one before it, forming a backward history chain.
//! A [`Response`] is what a controller action returns: the data handed to the
//! render engine plus [`ResponseOptions`] that steer the router (template
//! choice, caching, redirects, preloading).
//!
//! # Example
//!
//! ```
//! use spa_navigator::{CacheMode, Response};
//! use serde_json::json;
//!
//! let response = Response::new()
//!     .with("title", json!("Hello"))
//!     .template("product")
//!     .cache(CacheMode::keyed(42))
//!     .preload_paths(true);
//!
//! assert_eq!(response.options.template.as_deref(), Some("product"));
//! assert!(response.options.cache.is_enabled());
//! ```

use crate::params::RouteParams;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Request
// ============================================================================

/// One navigation request, linked to the request that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Full hash path, e.g. `#!/product/42`.
    pub path: String,
    /// Parameters parsed from the path.
    pub params: RouteParams,
    /// Controller the route resolved to.
    pub controller: String,
    /// Action invoked on the controller.
    pub action: String,
    /// The previous request, if any.
    pub previous: Option<Arc<Request>>,
}

impl Request {
    /// Create a request with no predecessor.
    pub fn new(
        path: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            params: RouteParams::new(),
            controller: controller.into(),
            action: action.into(),
            previous: None,
        }
    }

    /// Set the parsed parameters.
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    /// Link the previous request.
    pub fn with_previous(mut self, previous: Option<Arc<Request>>) -> Self {
        self.previous = previous;
        self
    }

    /// Path of the previous request.
    pub fn previous_path(&self) -> Option<&str> {
        self.previous.as_deref().map(|r| r.path.as_str())
    }

    /// Parameters of the previous request.
    pub fn previous_params(&self) -> Option<&RouteParams> {
        self.previous.as_deref().map(|r| &r.params)
    }

    /// Iterate over the history chain, most recent predecessor first.
    pub fn history(&self) -> impl Iterator<Item = &Request> {
        std::iter::successors(self.previous.as_deref(), |r| r.previous.as_deref())
    }
}

// Unlinks the history chain one request at a time; a long session would
// otherwise drop it recursively and overflow the stack.
impl Drop for Request {
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(request) = previous {
            previous = Arc::into_inner(request).and_then(|mut request| request.previous.take());
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Caching behaviour requested by a response.
///
/// Controls both whether the response itself is memoised under its path and
/// whether the rendered view is memoised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Neither the response nor the view is cached.
    #[default]
    Off,
    /// Cache the response, and the view under its template name.
    On,
    /// Cache the response, and the view under `template-discriminator`, so
    /// one template can keep a view per entity (e.g. per product id).
    Keyed(String),
}

impl CacheMode {
    /// Keyed caching; an empty discriminator means caching is off.
    pub fn keyed(discriminator: impl Display) -> Self {
        let discriminator = discriminator.to_string();
        if discriminator.is_empty() {
            Self::Off
        } else {
            Self::Keyed(discriminator)
        }
    }

    /// Return `true` unless caching is off.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }

    /// View cache key for a template, `None` when caching is off.
    pub fn view_key(&self, template: &str) -> Option<String> {
        match self {
            Self::Off => None,
            Self::On => Some(template.to_string()),
            Self::Keyed(discriminator) => Some(format!("{template}-{discriminator}")),
        }
    }
}

impl From<bool> for CacheMode {
    fn from(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// Image warming requested for preloaded views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImagePreload {
    /// No images are warmed.
    #[default]
    Off,
    /// Warm up to the configured default limit.
    Default,
    /// Warm up to this many images.
    Limit(usize),
}

impl ImagePreload {
    /// Effective number of images to warm.
    pub fn limit(self, default_limit: usize) -> usize {
        match self {
            Self::Off => 0,
            Self::Default => default_limit,
            Self::Limit(n) => n,
        }
    }
}

impl From<bool> for ImagePreload {
    fn from(value: bool) -> Self {
        if value {
            Self::Default
        } else {
            Self::Off
        }
    }
}

impl From<usize> for ImagePreload {
    fn from(value: usize) -> Self {
        Self::Limit(value)
    }
}

/// Options a controller attaches to its response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseOptions {
    /// Template to render instead of the conventional one.
    pub template: Option<String>,
    /// Response and view caching.
    pub cache: CacheMode,
    /// Skip rendering entirely.
    pub render_nothing: bool,
    /// Redirect target after rendering: a hash-bang path or an absolute URL.
    pub redirect_to: Option<String>,
    /// Harvest the rendered view's links onto the preload stack.
    pub preload_paths: bool,
    /// Interval of the preload drain timer started by this response.
    pub preload_stack_delay: Option<Duration>,
    /// Image warming when this response is produced by a preload.
    pub preload_images: ImagePreload,
    /// Fetch the template remotely when it is not cached yet.
    pub remote_template: bool,
}

// ============================================================================
// Response
// ============================================================================

/// Data and options returned by a controller action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Values handed to the render engine.
    pub data: Map<String, Value>,
    /// Router options.
    pub options: ResponseOptions,
}

impl Response {
    /// Create an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a response from a data map.
    pub fn from_data(data: Map<String, Value>) -> Self {
        Self {
            data,
            options: ResponseOptions::default(),
        }
    }

    /// Add one data value.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Render this template instead of the conventional one.
    pub fn template(mut self, name: impl Into<String>) -> Self {
        self.options.template = Some(name.into());
        self
    }

    /// Set the caching mode (`true`/`false` or a [`CacheMode`]).
    pub fn cache(mut self, cache: impl Into<CacheMode>) -> Self {
        self.options.cache = cache.into();
        self
    }

    /// Skip rendering.
    pub fn render_nothing(mut self) -> Self {
        self.options.render_nothing = true;
        self
    }

    /// Redirect after rendering.
    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.options.redirect_to = Some(target.into());
        self
    }

    /// Harvest the rendered view's links for preloading.
    pub fn preload_paths(mut self, enabled: bool) -> Self {
        self.options.preload_paths = enabled;
        self
    }

    /// Interval of the preload drain timer.
    pub fn preload_stack_delay(mut self, delay: Duration) -> Self {
        self.options.preload_stack_delay = Some(delay);
        self
    }

    /// Warm images of this view when it is preloaded.
    pub fn preload_images(mut self, images: impl Into<ImagePreload>) -> Self {
        self.options.preload_images = images.into();
        self
    }

    /// Fetch the template remotely if it is not cached.
    pub fn remote_template(mut self) -> Self {
        self.options.remote_template = true;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
