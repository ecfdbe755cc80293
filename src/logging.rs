//! Logging facade.
//!
//! The router, the memo engine and the preload scheduler report what they do
//! through the macros below. Each macro forwards to the [`log`](https://docs.rs/log)
//! or the [`tracing`](https://docs.rs/tracing) crate, whichever feature is
//! enabled, and tags every record with the `spa_navigator` target so an
//! application can filter the router's chatter independently of its own.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Enable at most one of the two. With neither, the macros expand to nothing.
//!
//! Levels used by the crate:
//!
//! - `trace_log!`: memo hits and misses, preload stack pops.
//! - `debug_log!`: lifecycle steps of a navigation cycle, hook invocations.
//! - `info_log!`: registration of routes, controllers and callbacks; start-up.
//! - `warn_log!`: recoverable oddities (stale fetch completions).
//! - `error_log!`: conditions that are about to be returned as [`SpaError`](crate::SpaError).
//!
//! ```ignore
//! use spa_navigator::{debug_log, trace_log};
//!
//! trace_log!("mem miss: {}[{}]", bucket, key);
//! debug_log!("callback {}.{}()", controller, hook);
//! ```

/// Emit a **trace**-level record under the `spa_navigator` target.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: "spa_navigator", $($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!(target: "spa_navigator", $($arg)*);
    };
}

/// Emit a **debug**-level record under the `spa_navigator` target.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: "spa_navigator", $($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!(target: "spa_navigator", $($arg)*);
    };
}

/// Emit an **info**-level record under the `spa_navigator` target.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!(target: "spa_navigator", $($arg)*);
        #[cfg(feature = "log")]
        ::log::info!(target: "spa_navigator", $($arg)*);
    };
}

/// Emit a **warn**-level record under the `spa_navigator` target.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(target: "spa_navigator", $($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!(target: "spa_navigator", $($arg)*);
    };
}

/// Emit an **error**-level record under the `spa_navigator` target.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!(target: "spa_navigator", $($arg)*);
        #[cfg(feature = "log")]
        ::log::error!(target: "spa_navigator", $($arg)*);
    };
}
