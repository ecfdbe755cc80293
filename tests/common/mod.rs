//! Test utilities for router, preload and driver tests
//!
//! Provides fixtures, helpers, and assertion utilities for unit and integration tests.

#![allow(dead_code)]

use serde_json::json;
use spa_navigator::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared, ordered record of what ran
pub type Log = Rc<RefCell<Vec<String>>>;

/// Create an empty log
pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Snapshot of a log's entries
pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Shared call counter
pub fn counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

/// Install env_logger once so `RUST_LOG=spa_navigator=trace` shows the router's chatter
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Host carrying inline templates, given without the `spa__` prefix
pub fn host_with_templates(templates: &[(&str, &str)]) -> MemoryHost {
    templates
        .iter()
        .fold(MemoryHost::new(), |host, (name, markup)| {
            host.with_inline_template(format!("spa__{name}"), *markup)
        })
}

/// Application with default configuration
pub fn app(host: MemoryHost) -> Spa<MemoryHost> {
    init_logging();
    Spa::new(host, SpaConfig::default()).expect("host has a container")
}

/// Application with custom configuration
pub fn app_with(host: MemoryHost, config: SpaConfig) -> Spa<MemoryHost> {
    init_logging();
    Spa::new(host, config).expect("host has a container")
}

/// The canonical app: `home` template, root route to a `home` handler
/// returning `{title: "Hi"}`
pub fn home_app() -> Spa<MemoryHost> {
    let mut spa = app(host_with_templates(&[("home", "<h1>{{title}}</h1>")]));
    spa.add_controller(
        Controller::new("home").handler(|_req| Some(Response::new().with("title", json!("Hi")))),
    );
    spa.add_routes([Route::root("home")]);
    spa
}

/// Hook that appends `tag` to `log`
pub fn recorder(log: &Log, tag: &str) -> impl Fn(&Request, Option<&Response>) + 'static {
    let log = Rc::clone(log);
    let tag = tag.to_string();
    move |_req, _res| log.borrow_mut().push(tag.clone())
}

/// Set the location hash and run a tick
pub fn navigate(spa: &mut Spa<MemoryHost>, hash: &str) -> NavigationResult {
    spa.host_mut().set_location_hash(hash);
    spa.tick().expect("navigation succeeds")
}

/// Wrapped view markup, as the container receives it
pub fn wrapped(html: &str) -> String {
    format!("<div id=\"spa__wrap\">{html}</div>")
}

/// The default not-found view
pub fn not_found_view() -> String {
    wrapped("<h1>404 Page not found</h1>")
}

/// Assert that a route parameter has the expected value
pub fn assert_param_equals(params: &RouteParams, key: &str, expected: &str) {
    let value = params.get(key);
    assert!(value.is_some(), "Parameter '{}' not found in RouteParams", key);
    assert_eq!(value.unwrap(), expected, "Parameter '{}' has wrong value", key);
}
