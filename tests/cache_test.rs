use std::time::Duration;

use pansou::cache::SearchCache;
use pansou::model::ResponseEnvelope;

fn envelope(total: u64) -> ResponseEnvelope {
    ResponseEnvelope {
        results: Vec::new(),
        total,
    }
}

#[test]
fn evicts_least_recently_accessed_first() {
    let mut cache = SearchCache::new(2, Duration::from_secs(300));
    cache.put("a".into(), envelope(1));
    cache.put("b".into(), envelope(2));

    // 访问 a 之后，b 成为最久未用的一条
    assert!(cache.get("a").is_some());
    cache.put("c".into(), envelope(3));

    assert!(cache.get("b").is_none());
    assert!(cache.get("a").is_some());
    assert!(cache.get("c").is_some());
    assert_eq!(cache.len(), 2);
}

#[test]
fn expired_entries_are_dropped_on_read() {
    let mut cache = SearchCache::new(4, Duration::from_millis(20));
    cache.put("a".into(), envelope(1));
    std::thread::sleep(Duration::from_millis(40));
    assert!(cache.get("a").is_none());
    assert_eq!(cache.len(), 0);
}

#[test]
fn fresh_entries_survive_reads() {
    let mut cache = SearchCache::new(4, Duration::from_secs(300));
    cache.put("a".into(), envelope(7));
    assert_eq!(cache.get("a").unwrap().total, 7);
    assert_eq!(cache.get("a").unwrap().total, 7);
    assert_eq!(cache.len(), 1);
}

#[test]
fn clear_empties_everything() {
    let mut cache = SearchCache::new(4, Duration::from_secs(300));
    cache.put("a".into(), envelope(1));
    cache.put("b".into(), envelope(2));
    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.get("a").is_none());
}

#[test]
fn same_key_last_writer_wins() {
    let mut cache = SearchCache::new(4, Duration::from_secs(300));
    cache.put("a".into(), envelope(1));
    cache.put("a".into(), envelope(2));
    assert_eq!(cache.get("a").unwrap().total, 2);
    assert_eq!(cache.len(), 1);
}
