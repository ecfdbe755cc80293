//! Unit tests for the route resolution cache
//!
//! Tests for src/cache.rs - verifying hits, misses, eviction and clearing.

#[cfg(test)]
mod cache_tests {
    use spa_navigator::{Route, RouteCache, RouteTable};

    #[test]
    fn test_cache_hit_miss() {
        let mut cache = RouteCache::with_capacity(4);
        assert_eq!(cache.get("#!/a"), None);
        cache.insert("#!/a".to_string(), Some(0));
        cache.insert("#!/missing".to_string(), None);

        assert_eq!(cache.get("#!/a"), Some(Some(0)));
        assert_eq!(cache.get("#!/missing"), Some(None));
        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_cache_eviction() {
        let mut cache = RouteCache::with_capacity(2);
        cache.insert("a".to_string(), Some(0));
        cache.insert("b".to_string(), Some(1));
        cache.get("a");
        cache.insert("c".to_string(), Some(2));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(Some(0)));
    }

    #[test]
    fn test_zero_capacity_still_caches_one_path() {
        let mut cache = RouteCache::with_capacity(0);
        cache.insert("a".to_string(), Some(0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_table_uses_and_clears_cache() {
        let mut table = RouteTable::with_cache_capacity(8);
        table.add_routes([Route::new("^/a", "a").unwrap(), Route::root("home")]);

        table.route_for("#!/a");
        table.route_for("#!/a");
        assert_eq!(table.cache_stats().hits, 1);
        assert_eq!(table.cache_stats().misses, 1);

        table.add_routes([Route::new("^/b", "b").unwrap()]);
        assert_eq!(table.cache_stats().invalidations, 2);
        assert_eq!(table.route_for("#!/a").map(|r| r.controller.as_str()), Some("a"));
        assert_eq!(table.cache_stats().misses, 2);
    }
}
