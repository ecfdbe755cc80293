//! Application configuration.
//!
//! ```
//! use spa_navigator::{ChainOrder, ParamStyle, SpaConfig};
//! use std::time::Duration;
//!
//! let config = SpaConfig::new()
//!     .polling_interval(Duration::from_millis(200))
//!     .chain_order(ChainOrder::OldestFirst)
//!     .param_style(ParamStyle::Query)
//!     .template_base_url("/views/");
//!
//! assert_eq!(config.preload_capacity, 20);
//! ```

use crate::callbacks::{ChainOrder, DEFAULT_ACTION};
use crate::params::ParamStyle;
use crate::preload::PreloadStack;
use std::time::Duration;

/// Tunables of a [`Spa`](crate::Spa).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaConfig {
    /// Interval of the polling trigger on hosts without hash-change events.
    pub polling_interval: Duration,
    /// Capacity of the preload stack.
    pub preload_capacity: usize,
    /// Default interval of the preload drain timer.
    pub preload_pop_delay: Duration,
    /// Default number of images warmed per preloaded view.
    pub preload_images_limit: usize,
    /// Action used by routes that do not name one.
    pub default_action: String,
    /// Id prefix marking inline template blocks as templates.
    pub inline_template_prefix: String,
    /// Prefix of remote template URLs.
    pub template_base_url: String,
    /// Extension of remote template URLs.
    pub template_extension: String,
    /// Order of repeated hook and action registrations.
    pub chain_order: ChainOrder,
    /// Parameter encoding of hash-bang paths.
    pub param_style: ParamStyle,
    /// Number of paths remembered by the route resolution cache.
    #[cfg(feature = "cache")]
    pub route_cache_capacity: usize,
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self {
            polling_interval: Duration::from_millis(333),
            preload_capacity: PreloadStack::DEFAULT_CAPACITY,
            preload_pop_delay: Duration::from_millis(700),
            preload_images_limit: 30,
            default_action: DEFAULT_ACTION.to_string(),
            inline_template_prefix: "spa__".to_string(),
            template_base_url: String::new(),
            template_extension: "html".to_string(),
            chain_order: ChainOrder::default(),
            param_style: ParamStyle::default(),
            #[cfg(feature = "cache")]
            route_cache_capacity: crate::cache::RouteCache::DEFAULT_CAPACITY,
        }
    }
}

impl SpaConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the polling interval.
    pub fn polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    /// Set the preload stack capacity.
    pub fn preload_capacity(mut self, capacity: usize) -> Self {
        self.preload_capacity = capacity;
        self
    }

    /// Set the default preload drain interval.
    pub fn preload_pop_delay(mut self, delay: Duration) -> Self {
        self.preload_pop_delay = delay;
        self
    }

    /// Set the default number of warmed images.
    pub fn preload_images_limit(mut self, limit: usize) -> Self {
        self.preload_images_limit = limit;
        self
    }

    /// Set the action used by routes without one.
    pub fn default_action(mut self, action: impl Into<String>) -> Self {
        self.default_action = action.into();
        self
    }

    /// Set the inline template id prefix.
    pub fn inline_template_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inline_template_prefix = prefix.into();
        self
    }

    /// Set the remote template URL prefix.
    pub fn template_base_url(mut self, url: impl Into<String>) -> Self {
        self.template_base_url = url.into();
        self
    }

    /// Set the remote template extension.
    pub fn template_extension(mut self, extension: impl Into<String>) -> Self {
        self.template_extension = extension.into();
        self
    }

    /// Set the chain order of repeated registrations.
    pub fn chain_order(mut self, order: ChainOrder) -> Self {
        self.chain_order = order;
        self
    }

    /// Set the parameter encoding.
    pub fn param_style(mut self, style: ParamStyle) -> Self {
        self.param_style = style;
        self
    }

    /// Set the route resolution cache capacity.
    #[cfg(feature = "cache")]
    pub fn route_cache_capacity(mut self, capacity: usize) -> Self {
        self.route_cache_capacity = capacity;
        self
    }
}
