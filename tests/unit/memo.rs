//! Unit tests for the memo store
//!
//! Tests for src/memo.rs - verifying bucket isolation, conditional commits,
//! bypass and key canonicalisation.

#[cfg(test)]
mod memo_tests {
    use spa_navigator::{Memo, MemoKey, Response, SystemCache};
    use std::cell::Cell;

    #[test]
    fn test_hit_does_not_call_getter() {
        let mut memo: Memo<String> = Memo::new();
        let calls = Cell::new(0);
        let getter = |key: &str| {
            calls.set(calls.get() + 1);
            key.to_uppercase()
        };

        assert_eq!(memo.memoize("b", "abc", getter), "ABC");
        assert_eq!(memo.memoize("b", "abc", getter), "ABC");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_uncommitted_value_is_still_returned() {
        let mut memo: Memo<Option<Response>> = Memo::new();
        let value = memo.memoize_if("responses", "#!/a", |_| None, Option::is_some);
        assert_eq!(value, None);
        assert!(!memo.contains("responses", "#!/a"));

        let value = memo.memoize_if("responses", "#!/a", |_| Some(Response::new()), Option::is_some);
        assert!(value.is_some());
        assert!(memo.contains("responses", "#!/a"));
    }

    #[test]
    fn test_bypass_removes_existing_entry() {
        let mut memo: Memo<u32> = Memo::new();
        memo.memoize("b", "k", |_| 1);
        assert_eq!(memo.bypass("b", "k", |_| 2), 2);
        assert_eq!(memo.get("b", "k"), None);
        assert_eq!(memo.memoize("b", "k", |_| 3), 3);
    }

    #[test]
    fn test_invalidate_returns_old_value() {
        let mut memo: Memo<u32> = Memo::new();
        memo.memoize("b", "k", |_| 7);
        assert_eq!(memo.invalidate("b", "k"), Some(7));
        assert_eq!(memo.invalidate("b", "k"), None);
        assert_eq!(memo.invalidate("missing", "k"), None);
    }

    #[test]
    fn test_sequence_and_string_keys_meet() {
        let mut memo: Memo<u32> = Memo::new();
        memo.memoize("b", &vec!["product", "42"], |_| 1);
        assert_eq!(memo.get("b", "product,42"), Some(&1));
        assert_eq!(["a", "b", "c"].memo_key(), "a,b,c");
        assert_eq!(Vec::<u32>::new().memo_key(), "");
    }

    #[test]
    fn test_clear_empties_every_bucket() {
        let mut memo: Memo<u32> = Memo::new();
        memo.memoize("one", "k", |_| 1);
        memo.memoize("two", "k", |_| 2);
        memo.clear();
        assert!(memo.is_empty("one"));
        assert!(memo.is_empty("two"));
    }

    #[test]
    fn test_system_cache_invalidation() {
        let mut cache = SystemCache::new();
        cache.add_template("home", "<p>home</p>");
        assert_eq!(cache.template("home"), Some("<p>home</p>"));
        assert!(!cache.invalidate_view("home"));
        assert!(!cache.invalidate_response("#!/home"));
        assert_eq!(cache.preloaded_paths("#!/home"), None);
    }
}
