//! Unit tests for route resolution
//!
//! Tests for src/route.rs - verifying first-match order, the root route and
//! template naming.

#[cfg(test)]
mod route_tests {
    use spa_navigator::{Route, RouteTable};

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.add_routes([
            Route::new("^/products/\\d+$", "products").unwrap().action("show"),
            Route::new("^/products", "products").unwrap(),
            Route::root("home"),
        ]);
        table
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = table();
        let route = table.route_for("#!/products/12").unwrap();
        assert_eq!(route.action.as_deref(), Some("show"));

        let route = table.route_for("#!/products/new").unwrap();
        assert_eq!(route.action, None);
    }

    #[test]
    fn test_root_paths() {
        let table = table();
        assert_eq!(table.resolve(""), Some(2));
        assert_eq!(table.resolve("#"), Some(2));
        assert_eq!(table.resolve("#top"), Some(2));
    }

    #[test]
    fn test_bare_hash_bang_has_no_route() {
        let table = table();
        assert_eq!(table.resolve("#!"), None);
        assert_eq!(table.resolve("#!/unknown"), None);
        assert_eq!(table.resolve("/products"), None);
    }

    #[test]
    fn test_empty_table_has_no_root() {
        let table = RouteTable::new();
        assert!(table.is_empty());
        assert_eq!(table.resolve(""), None);
        assert!(table.root().is_none());
    }

    #[test]
    fn test_appending_moves_the_root() {
        let mut table = table();
        assert_eq!(table.route_for("").map(|r| r.controller.clone()), Some("home".into()));

        table.add_routes([Route::root("landing")]);
        assert_eq!(table.route_for("").map(|r| r.controller.clone()), Some("landing".into()));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_template_names() {
        let table = table();
        let names: Vec<String> = table.routes().iter().map(Route::template_name).collect();
        assert_eq!(names, vec!["products__show", "products", "home"]);
    }

    #[test]
    fn test_root_route_never_matches_a_remainder() {
        let root = Route::root("home");
        assert!(!root.matches(""));
        assert!(!root.matches("/home"));
        assert_eq!(root.pattern(), None);
        assert_eq!(root.action_or("handler"), "handler");
    }
}
