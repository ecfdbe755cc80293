//! Integration tests for the navigation cycle
//!
//! Route matching, hook ordering, response and view caching, not-found
//! handling and redirects, driven through `MemoryHost`.

mod common;

use common::*;
use serde_json::json;
use spa_navigator::*;
use std::rc::Rc;

// ---- end to end ----

#[test]
fn test_root_route_renders_home_once() {
    let mut spa = home_app();

    let mode = spa.start().unwrap();
    assert_eq!(mode, Some(TriggerMode::HashChange));
    assert_eq!(spa.host().renders(), [wrapped("<h1>Hi</h1>")]);

    // Ticks without a path change do nothing
    assert_eq!(spa.tick().unwrap(), NavigationResult::Unchanged);
    assert_eq!(spa.tick().unwrap(), NavigationResult::Unchanged);
    assert_eq!(spa.host().render_count(), 1);
    assert_eq!(spa.host().scroll_count(), 1);
}

#[test]
fn test_polling_fallback_selected_without_hash_change() {
    let mut spa = app(MemoryHost::new().without_hash_change());
    spa.add_routes([Route::root("home")]);
    spa.add_controller(Controller::new("home").handler(|_| None));

    let mode = spa.start().unwrap();
    assert!(mode.unwrap().is_polling());
    assert_eq!(spa.trigger_mode().and_then(|m| m.polling_interval()).unwrap().as_millis(), 333);
}

#[test]
fn test_first_registered_route_wins() {
    let mut spa = app(host_with_templates(&[("A", "<p>A</p>"), ("B", "<p>B</p>")]));
    spa.add_routes([
        Route::new("^/a$", "A").unwrap(),
        Route::new("^/a/.*$", "B").unwrap(),
    ]);
    spa.add_controllers([
        Controller::new("A").handler(|_| Some(Response::new())),
        Controller::new("B").handler(|_| Some(Response::new())),
    ]);

    let result = navigate(&mut spa, "#!/a");
    assert_eq!(
        result,
        NavigationResult::Rendered {
            path: "#!/a".into(),
            template: "A".into()
        }
    );

    navigate(&mut spa, "#!/a/1");
    assert_eq!(spa.host().container(), wrapped("<p>B</p>"));
}

#[test]
fn test_anchor_paths_go_to_root_route() {
    let mut spa = home_app();
    navigate(&mut spa, "#not-a-bang");
    assert_eq!(spa.host().container(), wrapped("<h1>Hi</h1>"));
}

#[test]
fn test_action_route_uses_action_template() {
    let mut spa = app(host_with_templates(&[("products__show", "<p>{{id}}</p>")]));
    spa.add_routes([Route::new("^/products/", "products").unwrap().action("show")]);
    spa.add_controller(Controller::new("products").action("show", |req| {
        let id = req.params.get("products")?.to_string();
        Some(Response::new().with("id", json!(id)))
    }));

    navigate(&mut spa, "#!/products/42");
    assert_eq!(spa.host().container(), wrapped("<p>42</p>"));
}

#[test]
fn test_request_carries_params_and_history() {
    let seen = log();
    let mut spa = app(host_with_templates(&[("item", "<p>item</p>")]));
    spa.add_routes([Route::new("^/id/", "item").unwrap(), Route::root("item")]);

    let s = Rc::clone(&seen);
    spa.add_controller(Controller::new("item").handler(move |req| {
        assert_param_equals(&req.params, "id", "42");
        s.borrow_mut().push(req.previous_path().unwrap_or("-").to_string());
        Some(Response::new())
    }));

    let s = Rc::clone(&seen);
    spa.add_callbacks(Callbacks::new().before_filter(move |req, res| {
        assert!(res.is_none());
        s.borrow_mut().push(format!("{}:{}", req.controller, req.action));
    }));

    navigate(&mut spa, "#!/id/42/name/joe");
    navigate(&mut spa, "#!/id/42/name/ann");

    assert_eq!(
        entries(&seen),
        vec!["item:handler", "-", "item:handler", "#!/id/42/name/joe"]
    );
    let last = spa.previous_request().unwrap();
    assert_eq!(last.params.get("name"), Some("ann"));
    assert_eq!(last.history().count(), 1);
}

#[test]
fn test_query_param_style_decodes() {
    let config = SpaConfig::new().param_style(ParamStyle::Query);
    let mut spa = app_with(host_with_templates(&[("search", "<p>{{q}}</p>")]), config);
    spa.add_routes([Route::new("^q=", "search").unwrap()]);
    spa.add_controller(Controller::new("search").handler(|req| {
        Some(Response::new().with("q", json!(req.params.get("q")?)))
    }));

    navigate(&mut spa, "#!q=red+shoes%21");
    assert_eq!(spa.host().container(), wrapped("<p>red shoes!</p>"));
}

// ---- hooks ----

#[test]
fn test_hook_order_through_a_cycle() {
    let calls = log();
    let mut spa = home_app();
    spa.add_controller(
        Controller::new("home")
            .before_filter(recorder(&calls, "c.beforeFilter"))
            .after_filter(recorder(&calls, "c.afterFilter"))
            .before_render(recorder(&calls, "c.beforeRender"))
            .after_render(recorder(&calls, "c.afterRender")),
    );
    spa.add_callbacks(
        Callbacks::new()
            .before_filter(recorder(&calls, "g.beforeFilter"))
            .after_filter(recorder(&calls, "g.afterFilter"))
            .before_render(recorder(&calls, "g.beforeRender"))
            .after_render(recorder(&calls, "g.afterRender")),
    );

    spa.start().unwrap();
    assert_eq!(
        entries(&calls),
        vec![
            "c.beforeFilter",
            "g.beforeFilter",
            "c.afterFilter",
            "g.afterFilter",
            "c.beforeRender",
            "g.beforeRender",
            "c.afterRender",
            "g.afterRender",
        ]
    );
}

#[test]
fn test_new_after_render_runs_before_old() {
    let calls = log();
    let mut spa = home_app();
    spa.add_controller(Controller::new("home").after_render(recorder(&calls, "f1")));
    spa.add_controller(Controller::new("home").after_render(recorder(&calls, "f2")));

    spa.start().unwrap();
    assert_eq!(entries(&calls), vec!["f2", "f1"]);
}

#[test]
fn test_oldest_first_chain_order() {
    let calls = log();
    let config = SpaConfig::new().chain_order(ChainOrder::OldestFirst);
    let mut spa = app_with(host_with_templates(&[("home", "home")]), config);
    spa.add_routes([Route::root("home")]);
    spa.add_controller(Controller::new("home").handler(|_| Some(Response::new())));
    spa.add_callbacks(Callbacks::new().after_render(recorder(&calls, "f1")));
    spa.add_callbacks(Callbacks::new().after_render(recorder(&calls, "f2")));

    spa.start().unwrap();
    assert_eq!(entries(&calls), vec!["f1", "f2"]);
}

#[test]
fn test_before_unload_sees_previous_request() {
    let calls = log();
    let mut spa = app(host_with_templates(&[("a", "a"), ("b", "b")]));
    spa.add_routes([Route::new("^/a", "a").unwrap(), Route::new("^/b", "b").unwrap()]);

    let c = Rc::clone(&calls);
    spa.add_controller(
        Controller::new("a")
            .handler(|_| Some(Response::new().with("from", json!("a"))))
            .before_unload(move |req, res| {
                let from = res.and_then(|r| r.data.get("from")).cloned();
                c.borrow_mut().push(format!("unload {} {:?}", req.path, from));
            }),
    );
    spa.add_controller(Controller::new("b").handler(|_| Some(Response::new())));

    navigate(&mut spa, "#!/a");
    assert!(entries(&calls).is_empty());

    navigate(&mut spa, "#!/b");
    assert_eq!(entries(&calls), vec!["unload #!/a Some(String(\"a\"))"]);
}

// ---- not found ----

#[test]
fn test_route_miss_and_empty_response_render_same_view() {
    let calls = log();
    let mut spa = app(MemoryHost::new());
    spa.add_routes([Route::new("^/missing$", "ghost").unwrap()]);
    spa.add_controller(Controller::new("ghost").handler(|_| None));
    spa.add_callbacks(
        Callbacks::new()
            .before_filter(recorder(&calls, "beforeFilter"))
            .after_filter(recorder(&calls, "afterFilter"))
            .before_render(recorder(&calls, "beforeRender")),
    );

    let miss = navigate(&mut spa, "#!/nowhere");
    assert!(miss.is_not_found());
    assert!(entries(&calls).is_empty());
    let miss_view = spa.host().container().to_string();

    let empty = navigate(&mut spa, "#!/missing");
    assert!(empty.is_not_found());
    assert_eq!(entries(&calls), vec!["beforeFilter", "afterFilter"]);
    assert_eq!(spa.host().container(), miss_view);
    assert_eq!(miss_view, not_found_view());
}

#[test]
fn test_custom_not_found_template() {
    let mut spa = app(host_with_templates(&[("404", "<h2>Nope</h2>")]));
    navigate(&mut spa, "#!/gone");
    assert_eq!(spa.host().container(), wrapped("<h2>Nope</h2>"));
}

#[test]
fn test_not_found_view_is_cached() {
    let mut spa = app(MemoryHost::new());
    navigate(&mut spa, "#!/one");
    assert_eq!(spa.system_cache().view("404"), Some(not_found_view().as_str()));
}

// ---- caching ----

#[test]
fn test_cached_response_skips_handler() {
    let calls = counter();
    let mut spa = app(host_with_templates(&[("p", "<p>{{n}}</p>"), ("home", "home")]));
    spa.add_routes([Route::new("^/p", "p").unwrap(), Route::root("home")]);
    spa.add_controller(Controller::new("home").handler(|_| Some(Response::new())));

    let c = Rc::clone(&calls);
    spa.add_controller(Controller::new("p").handler(move |_| {
        c.set(c.get() + 1);
        Some(Response::new().with("n", json!(c.get())).cache(true))
    }));

    navigate(&mut spa, "#!/p");
    navigate(&mut spa, "");
    navigate(&mut spa, "#!/p");

    assert_eq!(calls.get(), 1);
    assert_eq!(spa.host().container(), wrapped("<p>1</p>"));
    assert!(spa.system_cache().response("#!/p").is_some());
}

#[test]
fn test_uncached_response_reinvokes_handler() {
    let calls = counter();
    let mut spa = app(host_with_templates(&[("p", "<p>{{n}}</p>"), ("home", "home")]));
    spa.add_routes([Route::new("^/p", "p").unwrap(), Route::root("home")]);
    spa.add_controller(Controller::new("home").handler(|_| Some(Response::new())));

    let c = Rc::clone(&calls);
    spa.add_controller(Controller::new("p").handler(move |_| {
        c.set(c.get() + 1);
        Some(Response::new().with("n", json!(c.get())))
    }));

    navigate(&mut spa, "#!/p");
    navigate(&mut spa, "");
    navigate(&mut spa, "#!/p");

    assert_eq!(calls.get(), 2);
    assert_eq!(spa.host().container(), wrapped("<p>2</p>"));
    assert!(spa.system_cache().response("#!/p").is_none());
}

#[test]
fn test_keyed_view_cache() {
    let renders = counter();
    let mut spa = app(host_with_templates(&[("product", "<p>{{id}}</p>")]));
    spa.add_routes([Route::new("^/product/", "product").unwrap()]);
    spa.add_controller(Controller::new("product").handler(|req| {
        let id = req.params.get("product")?.to_string();
        Some(Response::new().with("id", json!(id.clone())).cache(CacheMode::keyed(id)))
    }));

    let r = Rc::clone(&renders);
    spa.set_renderer(move |template: &str, data: &serde_json::Map<String, serde_json::Value>| {
        r.set(r.get() + 1);
        PlaceholderRenderer.render(template, data)
    });

    navigate(&mut spa, "#!/product/1");
    navigate(&mut spa, "#!/product/2");
    navigate(&mut spa, "#!/product/1");

    assert_eq!(renders.get(), 2);
    assert_eq!(spa.system_cache().view("product-1"), Some(wrapped("<p>1</p>").as_str()));
    assert_eq!(spa.system_cache().view("product-2"), Some(wrapped("<p>2</p>").as_str()));
    assert_eq!(spa.host().container(), wrapped("<p>1</p>"));
}

#[test]
fn test_invalidated_response_runs_handler_again() {
    let calls = counter();
    let mut spa = app(host_with_templates(&[("p", "p"), ("home", "home")]));
    spa.add_routes([Route::new("^/p", "p").unwrap(), Route::root("home")]);
    spa.add_controller(Controller::new("home").handler(|_| Some(Response::new())));
    let c = Rc::clone(&calls);
    spa.add_controller(Controller::new("p").handler(move |_| {
        c.set(c.get() + 1);
        Some(Response::new().cache(true))
    }));

    navigate(&mut spa, "#!/p");
    navigate(&mut spa, "");
    assert!(spa.system_cache_mut().invalidate_response("#!/p"));
    navigate(&mut spa, "#!/p");

    assert_eq!(calls.get(), 2);
}

// ---- options ----

#[test]
fn test_render_nothing_skips_render_hooks() {
    let calls = log();
    let mut spa = app(MemoryHost::new());
    spa.add_routes([Route::new("^/popup$", "popup").unwrap()]);
    spa.add_controller(
        Controller::new("popup")
            .handler(|_| Some(Response::new().render_nothing()))
            .before_render(recorder(&calls, "beforeRender"))
            .after_filter(recorder(&calls, "afterFilter")),
    );

    let result = navigate(&mut spa, "#!/popup");
    assert_eq!(
        result,
        NavigationResult::NothingRendered {
            path: "#!/popup".into()
        }
    );
    assert_eq!(entries(&calls), vec!["afterFilter"]);
    assert_eq!(spa.host().render_count(), 0);
}

#[test]
fn test_redirect_to_hash_path() {
    let mut spa = app(host_with_templates(&[("login", "<p>login</p>")]));
    spa.add_routes([
        Route::new("^/account$", "account").unwrap(),
        Route::new("^/login$", "login").unwrap(),
    ]);
    spa.add_controllers([
        Controller::new("account").handler(|_| Some(Response::new().render_nothing().redirect_to("/login"))),
        Controller::new("login").handler(|_| Some(Response::new())),
    ]);

    let result = navigate(&mut spa, "#!/account");
    assert_eq!(result.redirect_target(), Some("/login"));
    assert_eq!(spa.host().location_hash(), "#!/login");
    assert_eq!(spa.previous_path(), None);

    assert!(spa.tick().unwrap().is_rendered());
    assert_eq!(spa.host().container(), wrapped("<p>login</p>"));
}

#[test]
fn test_redirect_to_same_path_runs_again() {
    let calls = counter();
    let mut spa = app(host_with_templates(&[("self", "<p>self</p>")]));
    spa.add_routes([Route::new("^/self$", "self").unwrap()]);
    let c = Rc::clone(&calls);
    spa.add_controller(Controller::new("self").handler(move |_| {
        c.set(c.get() + 1);
        let response = Response::new();
        Some(if c.get() == 1 { response.redirect_to("/self") } else { response })
    }));

    navigate(&mut spa, "#!/self");
    assert!(spa.tick().unwrap().is_rendered());
    assert_eq!(calls.get(), 2);
    assert_eq!(spa.tick().unwrap(), NavigationResult::Unchanged);
}

#[test]
fn test_redirect_to_absolute_url() {
    let mut spa = app(MemoryHost::new());
    spa.add_routes([Route::new("^/out$", "out").unwrap()]);
    spa.add_controller(Controller::new("out").handler(|_| {
        Some(Response::new().render_nothing().redirect_to("https://example.com/"))
    }));

    navigate(&mut spa, "#!/out");
    assert_eq!(spa.host().assigned_urls(), ["https://example.com/".to_string()]);
    assert_eq!(spa.host().location_hash(), "#!/out");

    // The hash did not move, so polling ticks leave the page alone
    assert_eq!(spa.previous_path(), Some("#!/out"));
    for _ in 0..3 {
        assert!(spa.tick().unwrap().is_idle());
    }
    assert_eq!(spa.host().assigned_urls().len(), 1);
}

#[test]
fn test_long_navigation_history_drops_cleanly() {
    let mut spa = home_app();
    for i in 0..30_000 {
        navigate(&mut spa, if i % 2 == 0 { "#a" } else { "#b" });
    }
    assert_eq!(spa.previous_request().map(|req| req.history().count()), Some(29_999));
    drop(spa);
}

// ---- errors ----

#[test]
fn test_missing_template_is_an_error() {
    let mut spa = app(MemoryHost::new());
    spa.add_routes([Route::root("bare")]);
    spa.add_controller(Controller::new("bare").handler(|_| Some(Response::new())));

    let err = spa.start().unwrap_err();
    assert_eq!(err.to_string(), "template not found >> bare");
    // The cycle did not complete, so the next tick retries
    assert!(matches!(spa.tick(), Err(SpaError::TemplateNotFound { .. })));
}

#[test]
fn test_empty_render_is_an_error() {
    let mut spa = app(host_with_templates(&[("blank", "{{nothing}}")]));
    spa.add_routes([Route::root("blank")]);
    spa.add_controller(
        Controller::new("blank").handler(|_| Some(Response::new().with("nothing", json!("")))),
    );

    assert!(matches!(spa.start(), Err(SpaError::TemplateRender { .. })));
}

#[test]
fn test_unknown_controller_is_an_error() {
    let mut spa = app(MemoryHost::new());
    spa.add_routes([Route::root("nobody")]);
    assert!(matches!(spa.start(), Err(SpaError::UnknownController { .. })));
}

#[test]
fn test_invalid_route_pattern_is_an_error() {
    assert!(matches!(
        Route::new("^/(unclosed", "x"),
        Err(SpaError::InvalidPattern { .. })
    ));
}

// ---- isolation ----

#[test]
fn test_instances_share_nothing() {
    let mut first = home_app();
    let mut second = app(host_with_templates(&[("home", "<h1>other</h1>")]));
    second.add_routes([Route::root("home")]);
    second.add_controller(Controller::new("home").handler(|_| Some(Response::new().cache(true))));

    first.start().unwrap();
    second.start().unwrap();
    first.memo_mut().memoize("app", "k", |_| json!(1));

    assert_eq!(first.host().container(), wrapped("<h1>Hi</h1>"));
    assert_eq!(second.host().container(), wrapped("<h1>other</h1>"));
    assert!(second.memo().get("app", "k").is_none());
    assert!(first.system_cache().response("").is_none());
    assert!(second.system_cache().response("").is_some());
}
