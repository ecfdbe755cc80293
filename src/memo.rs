//! Keyed memoization.
//!
//! [`Memo`] is the single caching primitive of the crate. Controller
//! responses, rendered views, template text and harvested preload links all go
//! through it, and the application gets an instance of its own.
//!
//! A memo is a two-level map `bucket -> key -> value`. Buckets separate
//! families of values; keys are canonicalised through [`MemoKey`], so a slice
//! key such as `["product", "42"]` is stored as `"product,42"`.
//!
//! The lookup rules:
//!
//! | Call | Entry present | Entry absent |
//! |------|---------------|--------------|
//! | [`get`](Memo::get) | returns it | `None` |
//! | [`memoize`](Memo::memoize) | returns it, getter not called | calls getter, stores, returns |
//! | [`memoize_if`](Memo::memoize_if) | returns it, getter not called | calls getter, stores only if the predicate accepts it |
//! | [`bypass`](Memo::bypass) | deletes it, calls getter | calls getter, stores nothing |
//!
//! Entries are never evicted; only [`invalidate`](Memo::invalidate),
//! [`bypass`](Memo::bypass) and [`clear_bucket`](Memo::clear_bucket) remove them.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::memo::Memo;
//!
//! let mut memo: Memo<u32> = Memo::new();
//! let mut calls = 0;
//!
//! let a = memo.memoize("squares", "7", |_| { calls += 1; 49 });
//! let b = memo.memoize("squares", "7", |_| { calls += 1; 0 });
//!
//! assert_eq!((a, b), (49, 49));
//! assert_eq!(calls, 1);
//! ```

use crate::response::Response;
use crate::trace_log;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

/// Bucket holding controller responses, keyed by request path.
pub const RESPONSES_BUCKET: &str = "spa__responses";
/// Bucket holding rendered views, keyed by template name (plus discriminator).
pub const VIEWS_BUCKET: &str = "spa__views";
/// Bucket holding raw template text, keyed by template name.
pub const TEMPLATES_BUCKET: &str = "spa__templates";
/// Bucket holding the links harvested from a rendered path.
pub const PRELOADED_PATHS_BUCKET: &str = "spa__preloaded_paths";

// ============================================================================
// MemoKey
// ============================================================================

/// Conversion of a memo key into its canonical string form.
///
/// Sequences join their elements with `,`.
pub trait MemoKey {
    /// Canonical string form of the key.
    fn memo_key(&self) -> String;
}

impl MemoKey for str {
    fn memo_key(&self) -> String {
        self.to_string()
    }
}

impl MemoKey for String {
    fn memo_key(&self) -> String {
        self.clone()
    }
}

impl<T: Display> MemoKey for [T] {
    fn memo_key(&self) -> String {
        self.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<T: Display> MemoKey for Vec<T> {
    fn memo_key(&self) -> String {
        self.as_slice().memo_key()
    }
}

impl<T: Display, const N: usize> MemoKey for [T; N] {
    fn memo_key(&self) -> String {
        self.as_slice().memo_key()
    }
}

macro_rules! display_memo_key {
    ($($ty:ty),*) => {
        $(
            impl MemoKey for $ty {
                fn memo_key(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_memo_key!(u32, u64, usize, i32, i64, bool);

// ============================================================================
// Memo
// ============================================================================

/// Bucketed memo store. See the [module docs](self) for the lookup rules.
#[derive(Debug, Clone)]
pub struct Memo<V> {
    buckets: HashMap<String, HashMap<String, V>>,
}

impl<V> Default for Memo<V> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }
}

impl<V: Clone> Memo<V> {
    /// Create an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure lookup, never calls a getter.
    pub fn get<K: MemoKey + ?Sized>(&self, bucket: &str, key: &K) -> Option<&V> {
        self.buckets.get(bucket)?.get(&key.memo_key())
    }

    /// Return `true` if `(bucket, key)` holds a value.
    pub fn contains<K: MemoKey + ?Sized>(&self, bucket: &str, key: &K) -> bool {
        self.get(bucket, key).is_some()
    }

    /// Remove and return the value stored under `(bucket, key)`.
    pub fn invalidate<K: MemoKey + ?Sized>(&mut self, bucket: &str, key: &K) -> Option<V> {
        let key = key.memo_key();
        let removed = self.buckets.get_mut(bucket)?.remove(&key);
        if removed.is_some() {
            trace_log!("mem invalidate: {}[{}]", bucket, key);
        }
        removed
    }

    /// Return the cached value, or compute, store and return it.
    pub fn memoize<K, F>(&mut self, bucket: &str, key: &K, getter: F) -> V
    where
        K: MemoKey + ?Sized,
        F: FnOnce(&str) -> V,
    {
        self.memoize_if(bucket, key, getter, |_| true)
    }

    /// Return the cached value, or compute it and store it only when
    /// `should_commit` accepts the computed value. The computed value is
    /// returned either way.
    pub fn memoize_if<K, F, C>(&mut self, bucket: &str, key: &K, getter: F, should_commit: C) -> V
    where
        K: MemoKey + ?Sized,
        F: FnOnce(&str) -> V,
        C: FnOnce(&V) -> bool,
    {
        match self.try_memoize_with(bucket, key, true, |k| Ok::<_, Infallible>(getter(k)), should_commit)
        {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Drop any cached value and return a freshly computed, uncached one.
    pub fn bypass<K, F>(&mut self, bucket: &str, key: &K, getter: F) -> V
    where
        K: MemoKey + ?Sized,
        F: FnOnce(&str) -> V,
    {
        match self.try_memoize_with(bucket, key, false, |k| Ok::<_, Infallible>(getter(k)), |_| true)
        {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// General form of the memo lookup with a fallible getter.
    ///
    /// With `use_memo == false` the entry is deleted and the getter result is
    /// returned uncached. Otherwise a hit is returned as is and a miss calls
    /// the getter, committing its `Ok` value when `should_commit` accepts it.
    /// An `Err` from the getter is never committed.
    pub fn try_memoize_with<K, F, C, E>(
        &mut self,
        bucket: &str,
        key: &K,
        use_memo: bool,
        getter: F,
        should_commit: C,
    ) -> Result<V, E>
    where
        K: MemoKey + ?Sized,
        F: FnOnce(&str) -> Result<V, E>,
        C: FnOnce(&V) -> bool,
    {
        let key = key.memo_key();

        if !use_memo {
            if let Some(entries) = self.buckets.get_mut(bucket) {
                entries.remove(&key);
            }
            trace_log!("mem bypass: {}[{}]", bucket, key);
            return getter(&key);
        }

        let entries = self.buckets.entry(bucket.to_string()).or_default();
        if let Some(value) = entries.get(&key) {
            trace_log!("mem hit: {}[{}]", bucket, key);
            return Ok(value.clone());
        }

        trace_log!("mem miss: {}[{}]", bucket, key);
        let value = getter(&key)?;
        if should_commit(&value) {
            entries.insert(key, value.clone());
        }
        Ok(value)
    }

    /// Remove every entry of a bucket.
    pub fn clear_bucket(&mut self, bucket: &str) {
        self.buckets.remove(bucket);
    }

    /// Remove every entry of every bucket.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Number of entries stored in a bucket.
    pub fn len(&self, bucket: &str) -> usize {
        self.buckets.get(bucket).map_or(0, HashMap::len)
    }

    /// Return `true` if the bucket holds no entries.
    pub fn is_empty(&self, bucket: &str) -> bool {
        self.len(bucket) == 0
    }
}

// ============================================================================
// SystemCache
// ============================================================================

/// The memo families used internally by an application.
///
/// Kept apart from the application memo so application keys can never
/// collide with the router's buckets.
#[derive(Debug, Clone, Default)]
pub struct SystemCache {
    pub(crate) responses: Memo<Option<Arc<Response>>>,
    pub(crate) views: Memo<String>,
    pub(crate) templates: Memo<String>,
    pub(crate) preloaded_paths: Memo<Vec<String>>,
}

impl SystemCache {
    /// Create empty system caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text of a template.
    pub fn template(&self, name: &str) -> Option<&str> {
        self.templates.get(TEMPLATES_BUCKET, name).map(String::as_str)
    }

    /// Store template text unless one is already cached under `name`.
    pub fn add_template(&mut self, name: &str, text: impl Into<String>) {
        let text = text.into();
        self.templates.memoize(TEMPLATES_BUCKET, name, |_| text);
    }

    /// Rendered view cached under a view cache key.
    pub fn view(&self, cache_key: &str) -> Option<&str> {
        self.views.get(VIEWS_BUCKET, cache_key).map(String::as_str)
    }

    /// Cached controller response for a path.
    pub fn response(&self, path: &str) -> Option<&Arc<Response>> {
        self.responses.get(RESPONSES_BUCKET, path)?.as_ref()
    }

    /// Links harvested from the view rendered for `path`.
    pub fn preloaded_paths(&self, path: &str) -> Option<&[String]> {
        self.preloaded_paths
            .get(PRELOADED_PATHS_BUCKET, path)
            .map(Vec::as_slice)
    }

    /// Forget the cached response of a path.
    pub fn invalidate_response(&mut self, path: &str) -> bool {
        self.responses.invalidate(RESPONSES_BUCKET, path).is_some()
    }

    /// Forget a cached view.
    pub fn invalidate_view(&mut self, cache_key: &str) -> bool {
        self.views.invalidate(VIEWS_BUCKET, cache_key).is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
