//! Unit tests for RouteParams
//!
//! Tests for src/params.rs - verifying both parameter styles, absent
//! values and typed access.

#[cfg(test)]
mod params_tests {
    use crate::common::assert_param_equals;
    use spa_navigator::{ParamStyle, RouteParams};

    #[test]
    fn test_segments_without_leading_slash() {
        let params = RouteParams::from_hash("#!id/42", ParamStyle::Segments);
        assert_param_equals(&params, "id", "42");
    }

    #[test]
    fn test_segments_odd_key_is_present_without_value() {
        let params = RouteParams::from_hash("#!/product/7/details", ParamStyle::Segments);
        assert_param_equals(&params, "product", "7");
        assert!(params.contains("details"));
        assert_eq!(params.get("details"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_segments_are_not_decoded() {
        let params = RouteParams::from_hash("#!/q/a%20b", ParamStyle::Segments);
        assert_param_equals(&params, "q", "a%20b");
    }

    #[test]
    fn test_query_decodes_plus_and_escapes() {
        let params = RouteParams::from_hash("#!name=jo+e%21&city=K%C3%B6ln", ParamStyle::Query);
        assert_param_equals(&params, "name", "jo e!");
        assert_param_equals(&params, "city", "Köln");
    }

    #[test]
    fn test_query_skips_pairs_without_value_separator() {
        let params = RouteParams::from_hash("#!flag&id=1", ParamStyle::Query);
        assert!(!params.contains("flag"));
        assert_param_equals(&params, "id", "1");
    }

    #[test]
    fn test_non_hash_bang_paths_have_no_params() {
        for path in ["", "#", "#anchor", "/plain/path"] {
            assert!(RouteParams::from_hash(path, ParamStyle::Segments).is_empty(), "{path}");
            assert!(RouteParams::from_hash(path, ParamStyle::Query).is_empty(), "{path}");
        }
    }

    #[test]
    fn test_typed_access() {
        let params = RouteParams::from_hash("#!/page/3/sort/name", ParamStyle::Segments);
        assert_eq!(params.get_as::<u32>("page"), Some(3));
        assert_eq!(params.get_as::<u32>("sort"), None);
        assert_eq!(params.get_as::<u32>("missing"), None);
    }
}
