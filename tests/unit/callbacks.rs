//! Unit tests for controllers and hooks
//!
//! Tests for src/callbacks.rs - verifying chain order, stop semantics and
//! action dispatch.

#[cfg(test)]
mod callbacks_tests {
    use crate::common::{entries, log, recorder};
    use spa_navigator::{
        Callbacks, ChainOrder, Controller, ControllerRegistry, Hook, HookFlow, Request, Response,
        SpaError,
    };

    fn request(controller: &str, action: &str) -> Request {
        Request::new("#!/x", controller, action)
    }

    #[test]
    fn test_controller_hooks_run_before_global() {
        let calls = log();
        let mut registry = ControllerRegistry::new(ChainOrder::NewestFirst);
        registry.add_callbacks(Callbacks::new().before_filter(recorder(&calls, "global")));
        registry.add_controller(Controller::new("c").before_filter(recorder(&calls, "controller")));

        registry.run_callbacks(Hook::BeforeFilter, &request("c", "handler"), None);
        assert_eq!(entries(&calls), vec!["controller", "global"]);
    }

    #[test]
    fn test_stop_skips_only_its_own_level() {
        let calls = log();
        let mut registry = ControllerRegistry::new(ChainOrder::OldestFirst);
        let stop = recorder(&calls, "c.stop");
        registry.add_controller(
            Controller::new("c")
                .after_filter(move |req, res| {
                    stop(req, res);
                    HookFlow::Stop
                })
                .after_filter(recorder(&calls, "c.skipped")),
        );
        registry.add_callbacks(Callbacks::new().after_filter(recorder(&calls, "global")));

        registry.run_callbacks(Hook::AfterFilter, &request("c", "handler"), None);
        assert_eq!(entries(&calls), vec!["c.stop", "global"]);
    }

    #[test]
    fn test_other_controllers_hooks_do_not_run() {
        let calls = log();
        let mut registry = ControllerRegistry::new(ChainOrder::default());
        registry.add_controller(Controller::new("a").before_render(recorder(&calls, "a")));
        registry.add_controller(Controller::new("b"));

        registry.run_callbacks(Hook::BeforeRender, &request("b", "handler"), None);
        assert!(entries(&calls).is_empty());
    }

    #[test]
    fn test_all_actions_run_first_response_wins() {
        let calls = log();
        let mut registry = ControllerRegistry::new(ChainOrder::NewestFirst);
        let first = recorder(&calls, "old");
        registry.add_controller(Controller::new("c").handler(move |req| {
            first(req, None);
            Some(Response::new().template("old"))
        }));
        let second = recorder(&calls, "new");
        registry.add_controller(Controller::new("c").handler(move |req| {
            second(req, None);
            None
        }));

        let response = registry.invoke(&request("c", "handler")).unwrap().unwrap();
        assert_eq!(response.options.template.as_deref(), Some("old"));
        assert_eq!(entries(&calls), vec!["new", "old"]);
    }

    #[test]
    fn test_unknown_action() {
        let mut registry = ControllerRegistry::new(ChainOrder::default());
        registry.add_controller(Controller::new("c").action("list", |_| None));

        assert!(registry.has_action("c", "list"));
        let err = registry.invoke(&request("c", "show")).unwrap_err();
        assert!(matches!(err, SpaError::UnknownAction { ref action, .. } if action == "show"));
    }

    #[test]
    fn test_hook_names() {
        assert_eq!(Hook::BeforeUnload.to_string(), "beforeUnload");
        assert_eq!(Hook::AfterPreload.name(), "afterPreload");
    }
}
