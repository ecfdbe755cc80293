//! Single-threaded async driver (feature `tokio`).
//!
//! [`run`] starts an application and keeps it going: it ticks the router on
//! hash-change events or on the polling interval, drains the preload stack
//! at the interval the application asks for, and hands fetched templates
//! back. Events come in through an unbounded channel of [`DriverEvent`]s.
//!
//! The application is shared as `Rc<RefCell<Spa<_>>>` so the embedding code
//! can keep using it between events; the driver never holds the borrow
//! across an await point. Run it on a current-thread runtime, typically
//! inside a [`LocalSet`](tokio::task::LocalSet).
//!
//! ```no_run
//! use spa_navigator::driver::{run, DriverEvent};
//! use spa_navigator::{MemoryHost, Spa, SpaConfig};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! # async fn demo() -> Result<(), spa_navigator::SpaError> {
//! let spa = Rc::new(RefCell::new(Spa::new(MemoryHost::new(), SpaConfig::default())?));
//! let (events, rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! let local = tokio::task::LocalSet::new();
//! local
//!     .run_until(async move {
//!         let driver = tokio::task::spawn_local(run(Rc::clone(&spa), rx));
//!         events.send(DriverEvent::HashChanged).ok();
//!         events.send(DriverEvent::Shutdown).ok();
//!         driver.await.ok();
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

use crate::error::SpaError;
use crate::fetch::{FetchError, FetchTicket};
use crate::host::Host;
use crate::{debug_log, error_log, info_log, Spa};
use std::cell::RefCell;
use std::future;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Input of the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// The host reported a hash change.
    HashChanged,
    /// A pending remote template fetch finished.
    TemplateFetched {
        /// Ticket the fetch was issued under.
        ticket: FetchTicket,
        /// Template text or failure.
        result: Result<String, FetchError>,
    },
    /// Stop the driver.
    Shutdown,
}

fn repeating(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn next_tick(timer: &mut Option<(Duration, Interval)>) {
    match timer {
        Some((_, timer)) => {
            timer.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

/// Start `spa` and drive it until [`DriverEvent::Shutdown`] arrives or the
/// channel closes.
///
/// The first router or fetch-completion error stops the driver. A failed
/// preload step is logged and the drain goes on.
pub async fn run<H: Host>(
    spa: Rc<RefCell<Spa<H>>>,
    mut events: UnboundedReceiver<DriverEvent>,
) -> Result<(), SpaError> {
    spa.borrow_mut().start()?;
    let mode = spa.borrow().trigger_mode();
    info_log!("Driver running ({:?})", mode);

    let mut polling = mode
        .and_then(|mode| mode.polling_interval())
        .map(|period| (period, repeating(period)));
    let mut preloading: Option<(Duration, Interval)> = None;

    loop {
        // The drain interval is chosen by the response that started the
        // preload run, so it is re-read after every step.
        let wanted = spa.borrow().preload_interval();
        if wanted != preloading.as_ref().map(|(period, _)| *period) {
            preloading = wanted.map(|period| (period, repeating(period)));
        }

        tokio::select! {
            event = events.recv() => match event {
                Some(DriverEvent::HashChanged) => {
                    spa.borrow_mut().tick()?;
                }
                Some(DriverEvent::TemplateFetched { ticket, result }) => {
                    spa.borrow_mut().complete_template_fetch(ticket, result)?;
                }
                Some(DriverEvent::Shutdown) | None => break,
            },
            () = next_tick(&mut polling) => {
                spa.borrow_mut().tick()?;
            }
            () = next_tick(&mut preloading) => {
                if let Err(err) = spa.borrow_mut().preload_tick() {
                    error_log!("Preload step failed: {}", err);
                }
            }
        }
    }

    debug_log!("Driver stopped");
    Ok(())
}
