//! The application object.
//!
//! [`Spa`] owns everything one single page application needs: the route
//! table, the controller and callback registries, the system caches, the
//! application memo, the preload scheduler and the [`Host`] it renders into.
//! Instances share nothing, so several can run side by side.
//!
//! # Navigation cycle
//!
//! Each [`tick`](Spa::tick) compares the current location hash with the path
//! of the last cycle. When it changed, one cycle runs:
//!
//! 1. **Match** the path against the route table. No route renders the
//!    not-found view and ends the cycle.
//! 2. **Leave** the previous path (`beforeUnload` with the previous request
//!    and response) and run `beforeFilter` on the new request.
//! 3. **Invoke** the controller action through the response cache, keyed by
//!    path. A response is committed only when it enables caching.
//! 4. Run `afterFilter`, whether or not a response came back. No response
//!    renders the not-found view.
//! 5. **Render** unless the response asked for nothing: `beforeRender`, pick
//!    the template, fetch it remotely when asked and missing, render through
//!    the view cache, write the container, `afterRender`.
//! 6. Harvest links for **preloading** if asked, and scroll to the top.
//! 7. **Redirect** if asked. An in-app redirect clears the previous-path
//!    marker so even a redirect to the same path is seen as a change.
//!
//! Route misses and empty responses are not errors. Missing templates,
//! empty renders, unknown controllers or actions and failed remote fetches
//! are returned as [`SpaError`]. A failed remote fetch still records the
//! path, so later ticks leave it alone until the hash changes.
//!
//! Cycles never overlap: [`tick`](Spa::tick) takes `&mut self`, and hooks
//! only see the request and response.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{Controller, MemoryHost, Response, Route, Spa, SpaConfig};
//! use serde_json::json;
//!
//! let host = MemoryHost::new().with_inline_template("spa__home", "<h1>{{title}}</h1>");
//! let mut spa = Spa::new(host, SpaConfig::default())?;
//!
//! spa.add_controller(
//!     Controller::new("home").handler(|_req| Some(Response::new().with("title", json!("Hi")))),
//! );
//! spa.add_routes([Route::root("home")]);
//! spa.start()?;
//!
//! assert_eq!(spa.host().container(), "<div id=\"spa__wrap\"><h1>Hi</h1></div>");
//! # Ok::<(), spa_navigator::SpaError>(())
//! ```

use crate::callbacks::{Callbacks, Controller, ControllerRegistry, Hook};
use crate::config::SpaConfig;
use crate::error::{NavigationResult, SpaError};
use crate::fetch::{template_url, FetchError, FetchTicket, TemplateFetch, TemplateFetcher};
use crate::host::Host;
use crate::memo::{
    Memo, SystemCache, PRELOADED_PATHS_BUCKET, RESPONSES_BUCKET, TEMPLATES_BUCKET, VIEWS_BUCKET,
};
use crate::params::{RouteParams, HASH_BANG};
use crate::preload::{harvest_images, harvest_links, PreloadOrigin, PreloadScheduler, PreloadStep};
use crate::render::{
    render_view, PlaceholderRenderer, RenderEngine, DEFAULT_NOT_FOUND_MARKUP, NOT_FOUND_TEMPLATE,
};
use crate::response::{Request, Response};
use crate::route::{Route, RouteTable};
use crate::trigger::TriggerMode;
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A view waiting for its remote template.
struct PendingView {
    navigation_id: u64,
    template: String,
    url: String,
    request: Arc<Request>,
    response: Arc<Response>,
}

/// A single page application bound to a [`Host`].
pub struct Spa<H: Host> {
    host: H,
    config: SpaConfig,
    routes: RouteTable,
    controllers: ControllerRegistry,
    system: SystemCache,
    memo: Memo<Value>,
    renderer: Box<dyn RenderEngine>,
    fetcher: Option<Box<dyn TemplateFetcher>>,
    preload: PreloadScheduler,
    trigger: Option<TriggerMode>,
    previous_path: Option<String>,
    previous_request: Option<Arc<Request>>,
    previous_response: Option<Arc<Response>>,
    navigation_id: u64,
    next_ticket: u64,
    pending: HashMap<FetchTicket, PendingView>,
}

impl<H: Host> Spa<H> {
    /// Create an application rendering into `host`.
    ///
    /// Inline templates whose id starts with the configured prefix are
    /// loaded into the template cache, prefix stripped. A `404` template is
    /// provided unless the host defines one.
    pub fn new(host: H, config: SpaConfig) -> Result<Self, SpaError> {
        if !host.has_container() {
            error_log!("Cannot create application: container does not exist");
            return Err(SpaError::MissingContainer);
        }

        let mut system = SystemCache::new();
        for (id, markup) in host.inline_templates() {
            if let Some(name) = id.strip_prefix(config.inline_template_prefix.as_str()) {
                trace_log!("inline template loaded: {}", name);
                system.add_template(name, markup);
            }
        }
        system.add_template(NOT_FOUND_TEMPLATE, DEFAULT_NOT_FOUND_MARKUP);

        #[cfg(feature = "cache")]
        let routes = RouteTable::with_cache_capacity(config.route_cache_capacity);
        #[cfg(not(feature = "cache"))]
        let routes = RouteTable::new();

        Ok(Self {
            host,
            routes,
            controllers: ControllerRegistry::new(config.chain_order),
            system,
            memo: Memo::new(),
            renderer: Box::new(PlaceholderRenderer),
            fetcher: None,
            preload: PreloadScheduler::new(config.preload_capacity),
            trigger: None,
            previous_path: None,
            previous_request: None,
            previous_response: None,
            navigation_id: 0,
            next_ticket: 0,
            pending: HashMap::new(),
            config,
        })
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Append routes. The first matching route wins; the last route is the
    /// root route.
    pub fn add_routes(&mut self, routes: impl IntoIterator<Item = Route>) {
        self.routes.add_routes(routes);
    }

    /// Merge a controller, chaining onto an existing one of the same name.
    pub fn add_controller(&mut self, controller: Controller) {
        info_log!("Registering controller '{}'", controller.name());
        self.controllers.add_controller(controller);
    }

    /// Merge several controllers.
    pub fn add_controllers(&mut self, controllers: impl IntoIterator<Item = Controller>) {
        for controller in controllers {
            self.add_controller(controller);
        }
    }

    /// Merge global callbacks.
    pub fn add_callbacks(&mut self, callbacks: Callbacks) {
        info_log!("Registering global callbacks");
        self.controllers.add_callbacks(callbacks);
    }

    /// Replace the render engine.
    pub fn set_renderer(&mut self, renderer: impl RenderEngine + 'static) {
        self.renderer = Box::new(renderer);
    }

    /// Set the transport for remote templates.
    pub fn set_template_fetcher(&mut self, fetcher: impl TemplateFetcher + 'static) {
        self.fetcher = Some(Box::new(fetcher));
    }

    /// Add a template unless one with that name is already cached.
    pub fn add_template(&mut self, name: &str, text: impl Into<String>) {
        self.system.add_template(name, text);
    }

    // ========================================================================
    // Running
    // ========================================================================

    /// Start the application and process the current path.
    ///
    /// Returns the trigger the caller should drive [`tick`](Self::tick)
    /// with, or `None` when the application was already running.
    pub fn start(&mut self) -> Result<Option<TriggerMode>, SpaError> {
        if self.trigger.is_some() {
            debug_log!("Application already running");
            return Ok(None);
        }
        let mode = TriggerMode::select(self.host.supports_hash_change(), self.config.polling_interval);
        self.trigger = Some(mode);
        info_log!("Application started ({:?})", mode);
        self.tick()?;
        Ok(Some(mode))
    }

    /// Return `true` once [`start`](Self::start) has been called.
    pub fn is_running(&self) -> bool {
        self.trigger.is_some()
    }

    /// Trigger chosen at start.
    pub fn trigger_mode(&self) -> Option<TriggerMode> {
        self.trigger
    }

    /// Current path: the location hash, with a bare `#` read as empty.
    pub fn current_path(&self) -> String {
        let hash = self.host.location_hash();
        if hash == "#" {
            String::new()
        } else {
            hash
        }
    }

    /// Run a navigation cycle if the path changed since the last one.
    pub fn tick(&mut self) -> Result<NavigationResult, SpaError> {
        let path = self.current_path();
        if self.previous_path.as_deref() == Some(path.as_str()) {
            return Ok(NavigationResult::Unchanged);
        }
        self.run_cycle(&path)
    }

    fn run_cycle(&mut self, path: &str) -> Result<NavigationResult, SpaError> {
        self.navigation_id += 1;
        debug_log!("Navigation #{} to '{}'", self.navigation_id, path);

        // Step 1: Match
        let Some(route) = self.routes.route_for(path).cloned() else {
            debug_log!("No route for '{}'", path);
            self.render_not_found()?;
            self.previous_path = Some(path.to_string());
            return Ok(NavigationResult::NotFound {
                path: path.to_string(),
            });
        };
        let request = Arc::new(self.build_request(path, &route));

        // Step 2: Leave the previous path, filter the new one
        if let Some(previous) = &self.previous_request {
            self.controllers.run_callbacks(
                Hook::BeforeUnload,
                previous,
                self.previous_response.as_deref(),
            );
        }
        self.controllers
            .run_callbacks(Hook::BeforeFilter, &request, None);

        // Step 3: Invoke through the response cache
        let response = self.invoke_cached(&request)?;
        self.controllers
            .run_callbacks(Hook::AfterFilter, &request, response.as_deref());

        // Step 4: Render
        let outcome = match &response {
            Some(response) => self.respond(&route, &request, response),
            None => {
                debug_log!("{}.{} found nothing", request.controller, request.action);
                self.render_not_found().map(|()| NavigationResult::NotFound {
                    path: path.to_string(),
                })
            }
        };
        // A failed remote fetch still ends the cycle, so it is not retried
        // until the path changes
        if let Err(err) = &outcome {
            if !matches!(err, SpaError::RemoteTemplate { .. }) {
                return outcome;
            }
        }

        // Step 5: Remember where we are
        self.previous_request = Some(request);
        self.previous_response = response;
        self.previous_path = match &outcome {
            Ok(NavigationResult::Redirected { to, .. }) if !is_page_url(to) => None,
            _ => Some(path.to_string()),
        };
        outcome
    }

    fn build_request(&self, path: &str, route: &Route) -> Request {
        Request::new(
            path,
            route.controller.clone(),
            route.action_or(&self.config.default_action),
        )
        .with_params(RouteParams::from_hash(path, self.config.param_style))
        .with_previous(self.previous_request.clone())
    }

    fn invoke_cached(&mut self, request: &Request) -> Result<Option<Arc<Response>>, SpaError> {
        let controllers = &self.controllers;
        self.system.responses.try_memoize_with(
            RESPONSES_BUCKET,
            request.path.as_str(),
            true,
            |_| controllers.invoke(request).map(|r| r.map(Arc::new)),
            |response| {
                response
                    .as_ref()
                    .is_some_and(|r| r.options.cache.is_enabled())
            },
        )
    }

    fn respond(
        &mut self,
        route: &Route,
        request: &Arc<Request>,
        response: &Arc<Response>,
    ) -> Result<NavigationResult, SpaError> {
        if response.options.render_nothing {
            debug_log!("template bypassed for '{}'", request.path);
            return Ok(self
                .redirect_after(&request.path, response)
                .unwrap_or_else(|| NavigationResult::NothingRendered {
                    path: request.path.clone(),
                }));
        }

        self.controllers
            .run_callbacks(Hook::BeforeRender, request, Some(response));
        let template = template_name_for(route, response);

        if response.options.remote_template && self.system.template(&template).is_none() {
            return self.fetch_remote(template, request, response);
        }
        self.show_view(&template, request, response)
    }

    /// Render, write the container and run everything that follows a render.
    fn show_view(
        &mut self,
        template: &str,
        request: &Arc<Request>,
        response: &Arc<Response>,
    ) -> Result<NavigationResult, SpaError> {
        let view = self.render_response(template, response)?;
        self.host.render_into_container(&view);
        self.controllers
            .run_callbacks(Hook::AfterRender, request, Some(response));

        if response.options.preload_paths {
            self.schedule_preload(&view, request, response);
        }
        self.host.scroll_to_top();

        Ok(self
            .redirect_after(&request.path, response)
            .unwrap_or_else(|| NavigationResult::Rendered {
                path: request.path.clone(),
                template: template.to_string(),
            }))
    }

    fn render_response(&mut self, template: &str, response: &Response) -> Result<String, SpaError> {
        let SystemCache {
            views, templates, ..
        } = &mut self.system;
        let engine = &*self.renderer;
        let source = templates
            .get(TEMPLATES_BUCKET, template)
            .map(String::as_str);

        match response.options.cache.view_key(template) {
            Some(key) => views.try_memoize_with(
                VIEWS_BUCKET,
                key.as_str(),
                true,
                |_| render_view(engine, template, source, &response.data),
                |_| true,
            ),
            None => render_view(engine, template, source, &response.data),
        }
    }

    fn render_not_found(&mut self) -> Result<(), SpaError> {
        let response = Response::new().template(NOT_FOUND_TEMPLATE).cache(true);
        let view = self.render_response(NOT_FOUND_TEMPLATE, &response)?;
        self.host.render_into_container(&view);
        Ok(())
    }

    fn redirect_after(&mut self, path: &str, response: &Response) -> Option<NavigationResult> {
        let target = response.options.redirect_to.as_deref()?;
        self.redirect_to(target);
        Some(NavigationResult::Redirected {
            path: path.to_string(),
            to: target.to_string(),
        })
    }

    /// Send the page elsewhere.
    ///
    /// Targets containing `://` are absolute URLs and replace the page; the
    /// previous-path marker stays, so polling does not assign it again.
    /// Anything else is an in-app path and becomes the `#!` hash; the
    /// previous-path marker is cleared so the next tick always runs.
    pub fn redirect_to(&mut self, target: &str) {
        if is_page_url(target) {
            debug_log!("redirecting page: {}", target);
            self.host.assign_url(target);
            return;
        }
        let hash = if target.starts_with(HASH_BANG) {
            target.to_string()
        } else {
            format!("{HASH_BANG}{target}")
        };
        debug_log!("redirecting to path: {}", hash);
        self.host.set_location_hash(&hash);
        self.previous_path = None;
    }

    // ========================================================================
    // Remote templates
    // ========================================================================

    fn fetch_remote(
        &mut self,
        template: String,
        request: &Arc<Request>,
        response: &Arc<Response>,
    ) -> Result<NavigationResult, SpaError> {
        let url = template_url(
            &self.config.template_base_url,
            &template,
            &self.config.template_extension,
        );
        let Some(fetcher) = self.fetcher.as_mut() else {
            error_log!("No template fetcher for remote template '{}'", template);
            return Err(SpaError::NoTemplateFetcher { name: template });
        };

        self.next_ticket += 1;
        let ticket = FetchTicket::new(self.next_ticket);
        debug_log!("Fetching template '{}' from {} ({})", template, url, ticket);

        match fetcher.fetch(ticket, &url) {
            TemplateFetch::Ready(result) => {
                self.store_remote_template(&template, &url, result)?;
                self.show_view(&template, request, response)
            }
            TemplateFetch::Pending => {
                self.pending.insert(
                    ticket,
                    PendingView {
                        navigation_id: self.navigation_id,
                        template,
                        url,
                        request: Arc::clone(request),
                        response: Arc::clone(response),
                    },
                );
                Ok(NavigationResult::Pending {
                    path: request.path.clone(),
                    ticket,
                })
            }
        }
    }

    fn store_remote_template(
        &mut self,
        name: &str,
        url: &str,
        result: Result<String, FetchError>,
    ) -> Result<(), SpaError> {
        match result {
            Ok(text) => {
                self.system.add_template(name, text);
                Ok(())
            }
            Err(err) => {
                error_log!("Remote template '{}' failed: {}", name, err);
                Err(SpaError::RemoteTemplate {
                    name: name.to_string(),
                    url: url.to_string(),
                    status: err.status,
                })
            }
        }
    }

    /// Deliver the outcome of a pending remote template fetch.
    ///
    /// The template text is cached either way. The view is rendered only if
    /// no other navigation started since the fetch was issued; otherwise the
    /// result is [`NavigationResult::Superseded`].
    pub fn complete_template_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<String, FetchError>,
    ) -> Result<NavigationResult, SpaError> {
        let pending = self
            .pending
            .remove(&ticket)
            .ok_or(SpaError::UnknownFetch(ticket))?;
        self.store_remote_template(&pending.template, &pending.url, result)?;

        if pending.navigation_id != self.navigation_id {
            warn_log!(
                "Template fetch {} for '{}' arrived after a newer navigation",
                ticket,
                pending.request.path
            );
            return Ok(NavigationResult::Superseded {
                path: pending.request.path.clone(),
            });
        }

        self.show_view(&pending.template, &pending.request, &pending.response)
    }

    /// Number of remote template fetches not completed yet.
    pub fn pending_fetches(&self) -> usize {
        self.pending.len()
    }

    // ========================================================================
    // Preloading
    // ========================================================================

    fn schedule_preload(&mut self, view: &str, request: &Arc<Request>, response: &Arc<Response>) {
        let delay = response
            .options
            .preload_stack_delay
            .unwrap_or(self.config.preload_pop_delay);
        let Self {
            system, preload, ..
        } = self;

        system
            .preloaded_paths
            .memoize(PRELOADED_PATHS_BUCKET, request.path.as_str(), |_| {
                let links = harvest_links(view);
                debug_log!("{} path(s) harvested from '{}'", links.len(), request.path);
                let origin = PreloadOrigin {
                    request: Arc::clone(request),
                    response: Arc::clone(response),
                };
                if preload.schedule(links.iter().cloned(), delay, origin) {
                    debug_log!("Preload timer started ({:?})", delay);
                }
                links
            });
    }

    /// Interval at which [`preload_tick`](Self::preload_tick) should be
    /// called, `None` while there is nothing to preload.
    pub fn preload_interval(&self) -> Option<Duration> {
        self.preload.interval()
    }

    /// Run one step of the preload drain.
    ///
    /// Pops and preloads one path. When the stack is empty the run ends and
    /// `afterPreload` runs with the request and response that started it.
    pub fn preload_tick(&mut self) -> Result<PreloadStep, SpaError> {
        let step = self.preload.next_step();
        match &step {
            PreloadStep::Idle => {}
            PreloadStep::Path(path) => self.preload_path(path)?,
            PreloadStep::Finished(origin) => {
                debug_log!("preload stack empty");
                if let Some(origin) = origin {
                    self.controllers.run_callbacks(
                        Hook::AfterPreload,
                        &origin.request,
                        Some(&origin.response),
                    );
                }
            }
        }
        Ok(step)
    }

    fn preload_path(&mut self, path: &str) -> Result<(), SpaError> {
        let Some(route) = self.routes.route_for(path).cloned() else {
            trace_log!("preload skipped, no route: {}", path);
            return Ok(());
        };
        let request = self.build_request(path, &route);

        let Some(response) = self.invoke_cached(&request)? else {
            trace_log!("preload skipped, no response: {}", path);
            return Ok(());
        };
        if response.options.render_nothing {
            return Ok(());
        }

        let template = template_name_for(&route, &response);
        if response.options.remote_template && self.system.template(&template).is_none() {
            trace_log!("preload skipped, remote template not loaded: {}", template);
            return Ok(());
        }
        let view = self.render_response(&template, &response)?;

        let limit = response
            .options
            .preload_images
            .limit(self.config.preload_images_limit);
        for src in harvest_images(&view, limit) {
            trace_log!("preload image: {}", src);
            self.host.preload_image(&src);
        }
        debug_log!("preload path done: {}", path);
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// The application memo, isolated from the system caches.
    pub fn memo(&self) -> &Memo<Value> {
        &self.memo
    }

    /// Mutable access to the application memo.
    pub fn memo_mut(&mut self) -> &mut Memo<Value> {
        &mut self.memo
    }

    /// The system caches (responses, views, templates, preloaded paths).
    pub fn system_cache(&self) -> &SystemCache {
        &self.system
    }

    /// Mutable access to the system caches, for explicit invalidation.
    pub fn system_cache_mut(&mut self) -> &mut SystemCache {
        &mut self.system
    }

    /// Text of a cached template.
    pub fn template(&self, name: &str) -> Option<&str> {
        self.system.template(name)
    }

    /// Render template text with the current engine, bypassing every cache.
    pub fn render(&self, template: &str, data: &Map<String, Value>) -> Option<String> {
        self.renderer.render(template, data)
    }

    /// Path of the last completed cycle, cleared by redirects.
    pub fn previous_path(&self) -> Option<&str> {
        self.previous_path.as_deref()
    }

    /// Request of the last cycle that matched a route.
    pub fn previous_request(&self) -> Option<&Arc<Request>> {
        self.previous_request.as_ref()
    }

    /// Id of the latest navigation cycle.
    pub fn navigation_id(&self) -> u64 {
        self.navigation_id
    }

    /// The route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The active configuration.
    pub fn config(&self) -> &SpaConfig {
        &self.config
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

/// Absolute URLs replace the page instead of moving the hash.
fn is_page_url(target: &str) -> bool {
    target.contains("://")
}

/// Template for a response: the explicit override, else the route's
/// conventional name.
fn template_name_for(route: &Route, response: &Response) -> String {
    response
        .options
        .template
        .clone()
        .unwrap_or_else(|| route.template_name())
}

impl<H: Host + fmt::Debug> fmt::Debug for Spa<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spa")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("routes", &self.routes.len())
            .field("controllers", &self.controllers)
            .field("trigger", &self.trigger)
            .field("previous_path", &self.previous_path)
            .field("navigation_id", &self.navigation_id)
            .field("pending", &self.pending.len())
            .finish()
    }
}
