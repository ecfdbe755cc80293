//! Controllers, lifecycle hooks and their registries.
//!
//! Hooks exist at two levels: on a [`Controller`] (run only for requests
//! routed to it) and application-wide [`Callbacks`]. For any hook the
//! controller level runs before the global level.
//!
//! Registration is additive. Registering a controller or a callback bundle a
//! second time appends to what is already there instead of replacing it; the
//! [`ChainOrder`] decides whether the newest or the oldest registration runs
//! first. A hook returning [`HookFlow::Stop`] skips the remaining hooks of its
//! level.
//!
//! # Hooks
//!
//! | Hook | Runs | Response |
//! |------|------|----------|
//! | [`BeforeUnload`](Hook::BeforeUnload) | before leaving a path, with the previous request | previous response |
//! | [`BeforeFilter`](Hook::BeforeFilter) | before the action | never |
//! | [`AfterFilter`](Hook::AfterFilter) | after the action, even when it found nothing | if any |
//! | [`BeforeRender`](Hook::BeforeRender) | before the view is rendered | always |
//! | [`AfterRender`](Hook::AfterRender) | after the view is in the container | always |
//! | [`AfterPreload`](Hook::AfterPreload) | once the preload stack is drained | originating response |
//!
//! # Example
//!
//! ```
//! use spa_navigator::{Callbacks, Controller, Response};
//! use serde_json::json;
//!
//! let home = Controller::new("home")
//!     .handler(|_req| Some(Response::new().with("title", json!("Hi"))))
//!     .after_render(|req, _res| println!("rendered {}", req.path));
//!
//! let logging = Callbacks::new().before_filter(|req, _| println!("-> {}", req.path));
//! # let _ = (home, logging);
//! ```

use crate::error::SpaError;
use crate::response::{Request, Response};
use crate::{debug_log, trace_log};
use std::collections::HashMap;
use std::fmt;

/// Name of the action registered by [`Controller::handler`].
pub const DEFAULT_ACTION: &str = "handler";

// ============================================================================
// Hook
// ============================================================================

/// Lifecycle points at which callbacks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Leaving the previous path.
    BeforeUnload,
    /// Before the controller action.
    BeforeFilter,
    /// After the controller action.
    AfterFilter,
    /// Before rendering the view.
    BeforeRender,
    /// After the view has been placed in the container.
    AfterRender,
    /// The preload stack has been drained.
    AfterPreload,
}

impl Hook {
    /// Conventional name of the hook.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeUnload => "beforeUnload",
            Self::BeforeFilter => "beforeFilter",
            Self::AfterFilter => "afterFilter",
            Self::BeforeRender => "beforeRender",
            Self::AfterRender => "afterRender",
            Self::AfterPreload => "afterPreload",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the remaining hooks of the same level should run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookFlow {
    /// Run the next hook.
    #[default]
    Continue,
    /// Skip the remaining hooks of this level.
    Stop,
}

/// Conversion of hook return values into a [`HookFlow`].
///
/// Lets plain closures returning `()` be registered as hooks.
pub trait IntoHookFlow {
    /// Convert into a flow decision.
    fn into_hook_flow(self) -> HookFlow;
}

impl IntoHookFlow for () {
    fn into_hook_flow(self) -> HookFlow {
        HookFlow::Continue
    }
}

impl IntoHookFlow for HookFlow {
    fn into_hook_flow(self) -> HookFlow {
        self
    }
}

/// Order in which repeated registrations of the same hook or action run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChainOrder {
    /// The latest registration runs first ("new wraps old").
    #[default]
    NewestFirst,
    /// Registrations run in the order they were made.
    OldestFirst,
}

/// Boxed hook function.
pub type HookFn = Box<dyn Fn(&Request, Option<&Response>) -> HookFlow>;

/// Boxed controller action.
pub type ActionFn = Box<dyn Fn(&Request) -> Option<Response>>;

fn box_hook<F, R>(hook: F) -> HookFn
where
    F: Fn(&Request, Option<&Response>) -> R + 'static,
    R: IntoHookFlow,
{
    Box::new(move |request, response| hook(request, response).into_hook_flow())
}

fn ordered<T>(items: &[T], order: ChainOrder) -> Box<dyn Iterator<Item = &T> + '_> {
    match order {
        ChainOrder::NewestFirst => Box::new(items.iter().rev()),
        ChainOrder::OldestFirst => Box::new(items.iter()),
    }
}

// ============================================================================
// HookSet
// ============================================================================

/// Hook functions of one level, in registration order.
#[derive(Default)]
pub struct HookSet {
    hooks: HashMap<Hook, Vec<HookFn>>,
}

impl HookSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook function.
    pub fn add(&mut self, hook: Hook, f: HookFn) {
        self.hooks.entry(hook).or_default().push(f);
    }

    /// Append every hook of `other` after the existing ones.
    pub fn extend(&mut self, other: Self) {
        for (hook, fns) in other.hooks {
            self.hooks.entry(hook).or_default().extend(fns);
        }
    }

    /// Run the functions registered for `hook`.
    ///
    /// Returns the number of functions that ran.
    pub fn run(
        &self,
        hook: Hook,
        order: ChainOrder,
        request: &Request,
        response: Option<&Response>,
    ) -> usize {
        let Some(fns) = self.hooks.get(&hook) else {
            return 0;
        };
        let mut ran = 0;
        for f in ordered(fns, order) {
            ran += 1;
            if f(request, response) == HookFlow::Stop {
                trace_log!("{} chain stopped after {} hook(s)", hook, ran);
                break;
            }
        }
        ran
    }

    /// Number of functions registered for `hook`.
    pub fn len(&self, hook: Hook) -> usize {
        self.hooks.get(&hook).map_or(0, Vec::len)
    }

    /// Return `true` if no function is registered at all.
    pub fn is_empty(&self) -> bool {
        self.hooks.values().all(Vec::is_empty)
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (hook, fns) in &self.hooks {
            map.entry(hook, &fns.len());
        }
        map.finish()
    }
}

macro_rules! hook_builders {
    ($($(#[$doc:meta])* $method:ident => $hook:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $method<F, R>(self, f: F) -> Self
            where
                F: Fn(&Request, Option<&Response>) -> R + 'static,
                R: IntoHookFlow,
            {
                self.on(Hook::$hook, f)
            }
        )*
    };
}

// ============================================================================
// Callbacks
// ============================================================================

/// A bundle of application-wide hooks.
#[derive(Debug, Default)]
pub struct Callbacks {
    hooks: HookSet,
}

impl Callbacks {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function for `hook`.
    #[must_use]
    pub fn on<F, R>(mut self, hook: Hook, f: F) -> Self
    where
        F: Fn(&Request, Option<&Response>) -> R + 'static,
        R: IntoHookFlow,
    {
        self.hooks.add(hook, box_hook(f));
        self
    }

    hook_builders! {
        /// Register a `beforeUnload` hook.
        before_unload => BeforeUnload,
        /// Register a `beforeFilter` hook.
        before_filter => BeforeFilter,
        /// Register an `afterFilter` hook.
        after_filter => AfterFilter,
        /// Register a `beforeRender` hook.
        before_render => BeforeRender,
        /// Register an `afterRender` hook.
        after_render => AfterRender,
        /// Register an `afterPreload` hook.
        after_preload => AfterPreload,
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Named bundle of actions and controller-level hooks.
pub struct Controller {
    name: String,
    actions: HashMap<String, Vec<ActionFn>>,
    hooks: HookSet,
}

impl Controller {
    /// Create a controller without actions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: HashMap::new(),
            hooks: HookSet::new(),
        }
    }

    /// Controller name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register an action.
    ///
    /// An action returning `None` means there is nothing to show for the
    /// request, which renders the not-found view.
    #[must_use]
    pub fn action<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Request) -> Option<Response> + 'static,
    {
        self.actions.entry(name.into()).or_default().push(Box::new(f));
        self
    }

    /// Register the default action, named [`DEFAULT_ACTION`].
    #[must_use]
    pub fn handler<F>(self, f: F) -> Self
    where
        F: Fn(&Request) -> Option<Response> + 'static,
    {
        self.action(DEFAULT_ACTION, f)
    }

    /// Register a function for `hook`.
    #[must_use]
    pub fn on<F, R>(mut self, hook: Hook, f: F) -> Self
    where
        F: Fn(&Request, Option<&Response>) -> R + 'static,
        R: IntoHookFlow,
    {
        self.hooks.add(hook, box_hook(f));
        self
    }

    hook_builders! {
        /// Register a `beforeUnload` hook.
        before_unload => BeforeUnload,
        /// Register a `beforeFilter` hook.
        before_filter => BeforeFilter,
        /// Register an `afterFilter` hook.
        after_filter => AfterFilter,
        /// Register a `beforeRender` hook.
        before_render => BeforeRender,
        /// Register an `afterRender` hook.
        after_render => AfterRender,
        /// Register an `afterPreload` hook.
        after_preload => AfterPreload,
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("name", &self.name)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks)
            .finish()
    }
}

// ============================================================================
// ControllerRegistry
// ============================================================================

#[derive(Default)]
struct ControllerEntry {
    actions: HashMap<String, Vec<ActionFn>>,
    hooks: HookSet,
}

/// All registered controllers plus the global callbacks.
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, ControllerEntry>,
    callbacks: HookSet,
    order: ChainOrder,
}

impl ControllerRegistry {
    /// Create an empty registry.
    pub fn new(order: ChainOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Chain order used for hooks and repeated actions.
    pub fn order(&self) -> ChainOrder {
        self.order
    }

    /// Merge a controller into the registry.
    pub fn add_controller(&mut self, controller: Controller) {
        let Controller {
            name,
            actions,
            hooks,
        } = controller;
        let entry = self.controllers.entry(name).or_default();
        for (action, fns) in actions {
            entry.actions.entry(action).or_default().extend(fns);
        }
        entry.hooks.extend(hooks);
    }

    /// Merge a bundle of global hooks.
    pub fn add_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks.extend(callbacks.hooks);
    }

    /// Return `true` if a controller with this name is registered.
    pub fn contains(&self, controller: &str) -> bool {
        self.controllers.contains_key(controller)
    }

    /// Return `true` if the controller defines the action.
    pub fn has_action(&self, controller: &str, action: &str) -> bool {
        self.controllers
            .get(controller)
            .is_some_and(|entry| entry.actions.contains_key(action))
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Return `true` if no controller is registered.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Call the request's action.
    ///
    /// Every function registered under the action runs; the first `Some`
    /// in chain order is the response.
    pub fn invoke(&self, request: &Request) -> Result<Option<Response>, SpaError> {
        let entry =
            self.controllers
                .get(&request.controller)
                .ok_or_else(|| SpaError::UnknownController {
                    name: request.controller.clone(),
                })?;
        let fns = entry
            .actions
            .get(&request.action)
            .ok_or_else(|| SpaError::UnknownAction {
                controller: request.controller.clone(),
                action: request.action.clone(),
            })?;

        debug_log!("Invoking {}.{}", request.controller, request.action);
        let mut response = None;
        for f in ordered(fns, self.order) {
            let result = f(request);
            if response.is_none() {
                response = result;
            }
        }
        Ok(response)
    }

    /// Run a hook for the request's controller, then globally.
    pub fn run_callbacks(&self, hook: Hook, request: &Request, response: Option<&Response>) {
        if let Some(entry) = self.controllers.get(&request.controller) {
            if entry.hooks.run(hook, self.order, request, response) > 0 {
                debug_log!("callback {}.{}()", request.controller, hook);
            }
        }
        if self.callbacks.run(hook, self.order, request, response) > 0 {
            debug_log!("callback {}()", hook);
        }
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.controllers.keys().collect::<Vec<_>>())
            .field("callbacks", &self.callbacks)
            .field("order", &self.order)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
