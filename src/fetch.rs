//! Remote template fetching.
//!
//! A response can ask for a template that is not embedded in the page
//! ([`Response::remote_template`](crate::Response::remote_template)). The
//! router then asks the configured [`TemplateFetcher`] for
//! `<base url><name>.<extension>`. A fetcher either answers right away or
//! reports [`TemplateFetch::Pending`]; a pending fetch is finished later by
//! handing its result to
//! [`Spa::complete_template_fetch`](crate::Spa::complete_template_fetch)
//! together with the [`FetchTicket`] it was issued under.
//!
//! Tickets remember the navigation that issued them. A completion arriving
//! after the user moved on still caches the template text, but the stale view
//! is not rendered.

use std::fmt;
use thiserror::Error;

/// Identifies one template fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Numeric id of the ticket.
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fetch that did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("template fetch failed with status {status}")]
pub struct FetchError {
    /// Status reported by the transport.
    pub status: u16,
}

impl FetchError {
    /// Failure with the given status.
    pub const fn new(status: u16) -> Self {
        Self { status }
    }
}

/// Answer of a [`TemplateFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateFetch {
    /// The outcome is known now.
    Ready(Result<String, FetchError>),
    /// The outcome will be delivered through `complete_template_fetch`.
    Pending,
}

/// Transport for remote templates.
pub trait TemplateFetcher {
    /// Start fetching `url` under `ticket`.
    fn fetch(&mut self, ticket: FetchTicket, url: &str) -> TemplateFetch;
}

impl<F> TemplateFetcher for F
where
    F: FnMut(FetchTicket, &str) -> TemplateFetch,
{
    fn fetch(&mut self, ticket: FetchTicket, url: &str) -> TemplateFetch {
        self(ticket, url)
    }
}

/// Conventional URL of a remote template.
pub fn template_url(base: &str, name: &str, extension: &str) -> String {
    format!("{base}{name}.{extension}")
}
