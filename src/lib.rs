//! # spa-navigator
//!
//! Hash-bang routing for single page applications, with memoized controller
//! responses and views and a background preloader that warms the caches for
//! the links a view shows.
//!
//! ## Overview
//!
//! - **Routes** map `#!/...` fragments to controller actions. The first
//!   matching route wins; the last registered route serves the empty path.
//! - **Controllers** return a [`Response`] (data plus options) or `None` for
//!   "nothing here". Hooks run around every action at controller level and
//!   application level.
//! - **Memoization** keeps responses, rendered views, templates and harvested
//!   links in bucketed [`Memo`] stores, and gives the application a store of
//!   its own.
//! - **Preloading** pushes the links of a rendered view onto a bounded LIFO
//!   stack and drains it on a timer through the same cached invocation the
//!   router uses.
//!
//! The page is abstracted by the [`Host`] trait; [`MemoryHost`] is an
//! in-memory implementation.
//!
//! ## Quick start
//!
//! ```
//! use spa_navigator::{Controller, MemoryHost, Response, Route, Spa, SpaConfig};
//! use serde_json::json;
//!
//! let host = MemoryHost::new()
//!     .with_hash("#!/product/7")
//!     .with_inline_template("spa__product", "<h1>{{name}}</h1>");
//!
//! let mut spa = Spa::new(host, SpaConfig::default())?;
//! spa.add_routes([Route::new("^/product/", "product")?]);
//! spa.add_controller(Controller::new("product").handler(|req| {
//!     let id = req.params.get("product")?;
//!     Some(
//!         Response::new()
//!             .with("name", json!(format!("Product {id}")))
//!             .cache(true),
//!     )
//! }));
//!
//! spa.start()?;
//! assert!(spa.host().container().contains("Product 7"));
//! # Ok::<(), spa_navigator::SpaError>(())
//! ```
//!
//! ## Features
//!
//! | Feature   | Default | Purpose |
//! |-----------|---------|---------|
//! | `log`     | yes     | Log through the `log` crate |
//! | `tracing` | no      | Log through the `tracing` crate |
//! | `cache`   | yes     | LRU cache of route resolutions |
//! | `tokio`   | no      | Async driver for the trigger and preload timers |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

pub mod app;
#[cfg(feature = "cache")]
pub mod cache;
pub mod callbacks;
pub mod config;
#[cfg(feature = "tokio")]
pub mod driver;
pub mod error;
pub mod fetch;
pub mod host;
pub mod memo;
pub mod params;
pub mod preload;
pub mod render;
pub mod response;
pub mod route;
pub mod trigger;

pub use app::Spa;
#[cfg(feature = "cache")]
pub use cache::{CacheStats, RouteCache};
pub use callbacks::{
    Callbacks, ChainOrder, Controller, ControllerRegistry, Hook, HookFlow, IntoHookFlow,
    DEFAULT_ACTION,
};
pub use config::SpaConfig;
pub use error::{NavigationResult, SpaError};
pub use fetch::{FetchError, FetchTicket, TemplateFetch, TemplateFetcher};
pub use host::{Host, MemoryHost};
pub use memo::{Memo, MemoKey, SystemCache};
pub use params::{ParamStyle, RouteParams, HASH_BANG};
pub use preload::{PreloadStack, PreloadStep};
pub use render::{PlaceholderRenderer, RenderEngine};
pub use response::{CacheMode, ImagePreload, Request, Response, ResponseOptions};
pub use route::{Route, RouteTable};
pub use trigger::TriggerMode;
