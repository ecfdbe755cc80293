//! Errors and navigation outcomes.
//!
//! Two kinds of result come out of a navigation cycle:
//!
//! - [`NavigationResult`]: what the cycle did when it completed normally
//!   (rendered a view, rendered the not-found view, redirected, waited on a
//!   remote template, or had nothing to do).
//! - [`SpaError`]: a fatal condition surfaced to the embedding application.
//!   Route misses and empty controller responses are *not* errors; they are
//!   absorbed into the not-found view and reported as
//!   [`NavigationResult::NotFound`].
//!
//! # Examples
//!
//! ```
//! use spa_navigator::error::{NavigationResult, SpaError};
//!
//! let result = NavigationResult::Rendered {
//!     path: "#!/products".into(),
//!     template: "products".into(),
//! };
//! assert!(result.is_rendered());
//!
//! let err = SpaError::TemplateNotFound { name: "products".into() };
//! assert_eq!(err.to_string(), "template not found >> products");
//! ```

use crate::fetch::FetchTicket;
use thiserror::Error;

// ============================================================================
// SpaError
// ============================================================================

/// Fatal conditions raised while configuring or driving an application.
#[derive(Debug, Error)]
pub enum SpaError {
    /// The host has no container to render into.
    #[error("container does not exist")]
    MissingContainer,

    /// A route pattern is not a valid regular expression.
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern source.
        pattern: String,
        /// Compilation error reported by `regex`.
        #[source]
        source: regex::Error,
    },

    /// A route names a controller that was never registered.
    #[error("controller not registered >> {name}")]
    UnknownController {
        /// Controller name from the route.
        name: String,
    },

    /// A route names an action its controller does not define.
    #[error("action not defined >> {controller}.{action}")]
    UnknownAction {
        /// Controller name from the route.
        controller: String,
        /// Action name from the route (or the default action).
        action: String,
    },

    /// The template for a view is not in the template cache.
    #[error("template not found >> {name}")]
    TemplateNotFound {
        /// Template name that was looked up.
        name: String,
    },

    /// The render engine produced no output for a template.
    #[error("template error >> {name}")]
    TemplateRender {
        /// Template name that failed to render.
        name: String,
    },

    /// A remote template fetch finished with a non-success status.
    #[error("remote template '{name}' could not be fetched from {url} (status {status})")]
    RemoteTemplate {
        /// Template name.
        name: String,
        /// URL that was requested.
        url: String,
        /// Status reported by the fetcher.
        status: u16,
    },

    /// A response asked for a remote template but no fetcher is configured.
    #[error("no template fetcher configured for remote template >> {name}")]
    NoTemplateFetcher {
        /// Template name.
        name: String,
    },

    /// A fetch completion arrived for a ticket the application never issued.
    #[error("unknown template fetch ticket {0}")]
    UnknownFetch(FetchTicket),
}

// ============================================================================
// NavigationResult
// ============================================================================

/// Outcome of one pass through the router, a fetch completion, or a start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// The current path equals the previous one; nothing was done.
    Unchanged,

    /// No route matched, or the controller returned no response. The
    /// not-found view was rendered.
    NotFound {
        /// Path that was not found.
        path: String,
    },

    /// A view was rendered into the container.
    Rendered {
        /// Path that was rendered.
        path: String,
        /// Template the view was rendered from.
        template: String,
    },

    /// The response asked for no rendering.
    NothingRendered {
        /// Path that was processed.
        path: String,
    },

    /// The view waits for a remote template; completion happens through
    /// [`Spa::complete_template_fetch`](crate::Spa::complete_template_fetch).
    Pending {
        /// Path that is waiting.
        path: String,
        /// Ticket the fetch was issued under.
        ticket: FetchTicket,
    },

    /// A remote template arrived after a newer navigation started. The
    /// template was cached but nothing was rendered.
    Superseded {
        /// Path the stale fetch belonged to.
        path: String,
    },

    /// The response redirected elsewhere after (optionally) rendering.
    Redirected {
        /// Path that issued the redirect.
        path: String,
        /// Redirect target (hash-bang path or absolute URL).
        to: String,
    },
}

impl NavigationResult {
    /// Check if a view was rendered.
    pub fn is_rendered(&self) -> bool {
        matches!(self, NavigationResult::Rendered { .. })
    }

    /// Check if the not-found view was rendered.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if the cycle is waiting on a remote template.
    pub fn is_pending(&self) -> bool {
        matches!(self, NavigationResult::Pending { .. })
    }

    /// Check if the cycle did nothing because the path was unchanged.
    pub fn is_idle(&self) -> bool {
        matches!(self, NavigationResult::Unchanged)
    }

    /// Get the redirect target, if the response redirected.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            NavigationResult::Redirected { to, .. } => Some(to),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
