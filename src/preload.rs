//! Background preloading.
//!
//! After a view is rendered with
//! [`preload_paths`](crate::Response::preload_paths), the in-app links it
//! contains are pushed onto a [`PreloadStack`]. A repeating timer then pops
//! one path per tick and runs it through the same cached controller
//! invocation as the router, without hooks and without touching the
//! container, so the next real navigation to it is a cache hit.
//!
//! The stack is LIFO and bounded: the most recently harvested links are the
//! most likely next navigations, so on overflow the oldest entry is dropped.
//! Once the stack is empty the timer stops and the `afterPreload` hook runs.
//!
//! [`PreloadScheduler`] holds that state; the timer itself is whoever calls
//! [`Spa::preload_tick`](crate::Spa::preload_tick) at
//! [`Spa::preload_interval`](crate::Spa::preload_interval).

use crate::params::HASH_BANG;
use crate::response::{Request, Response};
use crate::trace_log;
use scraper::{Html, Selector};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Class that excludes a link from preloading.
pub const NO_PRELOAD_CLASS: &str = "spa-no-preload";

// ============================================================================
// PreloadStack
// ============================================================================

/// Bounded LIFO stack of paths.
///
/// ```
/// use spa_navigator::preload::PreloadStack;
///
/// let mut stack = PreloadStack::new(2);
/// stack.push("#!/a".into());
/// stack.push("#!/b".into());
/// stack.push("#!/c".into());
///
/// assert_eq!(stack.len(), 2);
/// assert_eq!(stack.pop().as_deref(), Some("#!/c"));
/// assert_eq!(stack.pop().as_deref(), Some("#!/b"));
/// assert_eq!(stack.pop(), None);
/// ```
#[derive(Debug, Clone)]
pub struct PreloadStack {
    paths: VecDeque<String>,
    capacity: usize,
}

impl PreloadStack {
    /// Default capacity.
    pub const DEFAULT_CAPACITY: usize = 20;

    /// Create a stack holding at most `capacity` paths.
    pub fn new(capacity: usize) -> Self {
        Self {
            paths: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a path, dropping the oldest entries beyond capacity.
    ///
    /// Returns the number of dropped entries.
    pub fn push(&mut self, path: String) -> usize {
        self.paths.push_back(path);
        let mut dropped = 0;
        while self.paths.len() > self.capacity {
            if let Some(oldest) = self.paths.pop_front() {
                trace_log!("preload stack full, dropping {}", oldest);
                dropped += 1;
            }
        }
        dropped
    }

    /// Pop the most recently pushed path.
    pub fn pop(&mut self) -> Option<String> {
        self.paths.pop_back()
    }

    /// Iterate from the oldest to the newest path.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Number of queued paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Return `true` if no path is queued.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Maximum number of queued paths.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every queued path.
    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

impl Default for PreloadStack {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

// ============================================================================
// Harvesting
// ============================================================================

/// Collect the in-app links of a view, in document order, without
/// duplicates.
///
/// A link qualifies when its `href` starts with `#!/` and it does not carry
/// the [`NO_PRELOAD_CLASS`] class.
pub fn harvest_links(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_fragment(html);
    let prefix = format!("{HASH_BANG}/");

    let mut links: Vec<String> = Vec::new();
    for anchor in document.select(&selector) {
        let element = anchor.value();
        if element.classes().any(|class| class == NO_PRELOAD_CLASS) {
            continue;
        }
        let Some(href) = element.attr("href") else {
            continue;
        };
        if href.starts_with(&prefix) && !links.iter().any(|l| l == href) {
            links.push(href.to_string());
        }
    }
    links
}

/// Collect up to `limit` image sources of a view, in document order.
pub fn harvest_images(html: &str, limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }
    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };
    let document = Html::parse_fragment(html);
    let images = document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect();
    images
}

// ============================================================================
// PreloadScheduler
// ============================================================================

/// Request and response of the render that started a preload run.
#[derive(Debug, Clone)]
pub struct PreloadOrigin {
    /// Request whose view was harvested.
    pub request: Arc<Request>,
    /// Its response.
    pub response: Arc<Response>,
}

/// What the next drain step should do.
#[derive(Debug, Clone)]
pub enum PreloadStep {
    /// No preload run is active.
    Idle,
    /// Preload this path.
    Path(String),
    /// The stack ran dry; the run is over.
    Finished(Option<PreloadOrigin>),
}

/// Stack plus the drain timer state.
#[derive(Debug, Clone, Default)]
pub struct PreloadScheduler {
    stack: PreloadStack,
    interval: Option<Duration>,
    origin: Option<PreloadOrigin>,
}

impl PreloadScheduler {
    /// Create an idle scheduler with a stack of `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            stack: PreloadStack::new(capacity),
            interval: None,
            origin: None,
        }
    }

    /// Queue harvested paths and start the drain timer unless it runs.
    ///
    /// A running timer keeps its interval and origin. Returns `true` when
    /// this call started the timer.
    pub fn schedule(
        &mut self,
        paths: impl IntoIterator<Item = String>,
        interval: Duration,
        origin: PreloadOrigin,
    ) -> bool {
        for path in paths {
            self.stack.push(path);
        }
        if self.interval.is_some() {
            return false;
        }
        self.interval = Some(interval);
        self.origin = Some(origin);
        true
    }

    /// Advance the drain by one step.
    pub fn next_step(&mut self) -> PreloadStep {
        if self.interval.is_none() {
            return PreloadStep::Idle;
        }
        if let Some(path) = self.stack.pop() {
            trace_log!("preload stack pop ({} left): {}", self.stack.len(), path);
            return PreloadStep::Path(path);
        }
        self.interval = None;
        PreloadStep::Finished(self.origin.take())
    }

    /// Interval of the running drain timer.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Return `true` while the drain timer runs.
    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// The queued paths.
    pub fn stack(&self) -> &PreloadStack {
        &self.stack
    }
}
