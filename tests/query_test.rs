use pansou::SearchError;
use pansou::filter::FilterState;
use pansou::query::build_query;

fn filters_with(pairs: &[(&str, &str)]) -> FilterState {
    let mut filters = FilterState::default();
    for &(dimension, value) in pairs {
        filters.update(dimension, value);
    }
    filters
}

#[test]
fn build_query_is_idempotent() {
    let filters = filters_with(&[
        ("cloud_disk_type", "quark"),
        ("file_type", "video"),
        ("exact_match", "true"),
        ("time_range", "week"),
    ]);
    let a = build_query("盘古", 2, 30, &filters).unwrap();
    let b = build_query("盘古", 2, 30, &filters).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.cache_key(), b.cache_key());
    assert_eq!(a.wire_params(), b.wire_params());
}

#[test]
fn all_platforms_serialize_pan_type_zero() {
    let query = build_query("盘古", 1, 30, &FilterState::default()).unwrap();
    assert_eq!(query.pan_type, 0);
    assert!(
        query
            .wire_params()
            .contains(&("pan_type", "0".to_string()))
    );
}

#[test]
fn pan_type_mapping_table() {
    for (name, code) in [("baidu", 1u8), ("quark", 2), ("aliyun", 3), ("thunder", 4)] {
        let filters = filters_with(&[("cloud_disk_type", name)]);
        assert_eq!(build_query("x", 1, 15, &filters).unwrap().pan_type, code);
    }
}

#[test]
fn exact_match_is_asymmetric_on_the_wire() {
    let query = build_query("x", 1, 15, &FilterState::default()).unwrap();
    assert!(query.wire_params().iter().all(|(k, _)| *k != "exact"));

    let filters = filters_with(&[("exact_match", "true")]);
    let query = build_query("x", 1, 15, &filters).unwrap();
    assert!(query.wire_params().contains(&("exact", "1".to_string())));
}

#[test]
fn unmapped_values_are_omitted() {
    let filters = filters_with(&[("file_type", "software"), ("time_range", "today")]);
    let query = build_query("x", 1, 15, &filters).unwrap();
    assert_eq!(query.file_type, None);
    assert_eq!(query.time_filter, None);

    let keys: Vec<_> = query.wire_params().into_iter().map(|(k, _)| k).collect();
    assert!(!keys.contains(&"file_type"));
    assert!(!keys.contains(&"time_filter"));
}

#[test]
fn mapped_values_pass_through() {
    let filters = filters_with(&[("file_type", "archive"), ("time_range", "half_month")]);
    let query = build_query("x", 1, 15, &filters).unwrap();
    assert_eq!(query.file_type, Some("archive"));
    assert_eq!(query.time_filter, Some("half_month"));
}

#[test]
fn keyword_is_trimmed_and_required() {
    let filters = FilterState::default();
    assert_eq!(build_query("  盘古  ", 1, 15, &filters).unwrap().keyword, "盘古");
    assert!(matches!(
        build_query("   ", 1, 15, &filters),
        Err(SearchError::InvalidArgument(_))
    ));
    assert!(matches!(
        build_query("x", 0, 15, &filters),
        Err(SearchError::InvalidArgument(_))
    ));
    assert!(matches!(
        build_query("x", 1, 0, &filters),
        Err(SearchError::InvalidArgument(_))
    ));
}

#[test]
fn cache_key_is_order_independent() {
    let a = filters_with(&[("cloud_disk_type", "quark"), ("time_range", "week")]);
    let b = filters_with(&[("time_range", "week"), ("cloud_disk_type", "quark")]);
    let qa = build_query("x", 1, 30, &a).unwrap();
    let qb = build_query("x", 1, 30, &b).unwrap();
    assert_eq!(qa.cache_key(), qb.cache_key());
    assert_eq!(
        qa.cache_key(),
        "keyword=x&limit=30&page=1&pan_type=2&time_filter=week"
    );
}

#[test]
fn default_filters_produce_minimal_wire_params() {
    let query = build_query("盘古", 1, 30, &FilterState::default()).unwrap();
    assert_eq!(
        query.wire_params(),
        vec![
            ("keyword", "盘古".to_string()),
            ("page", "1".to_string()),
            ("limit", "30".to_string()),
            ("pan_type", "0".to_string()),
        ]
    );
}
