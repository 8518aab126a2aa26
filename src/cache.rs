use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::model::ResponseEnvelope;

/// 搜索结果缓存：LRU + TTL。
///
/// 过期条目在读取时惰性清理，不起定时器。
/// 同键重复写入直接覆盖（同键意味着同一组请求参数，响应可互换）。
pub struct SearchCache {
    ttl: Duration,
    inner: LruCache<String, CacheEntry>,
}

#[derive(Clone)]
struct CacheEntry {
    inserted_at: Instant,
    data: ResponseEnvelope,
}

impl SearchCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity =
            NonZeroUsize::new(capacity.max(1)).expect("cache capacity should be non-zero");
        Self {
            ttl,
            inner: LruCache::new(capacity),
        }
    }

    /// 命中则刷新访问序并返回克隆；过期条目当场淘汰。
    pub fn get(&mut self, key: &str) -> Option<ResponseEnvelope> {
        let mut expired = false;
        let result = if let Some(entry) = self.inner.get(key) {
            if entry.inserted_at.elapsed() <= self.ttl {
                Some(entry.data.clone())
            } else {
                expired = true;
                None
            }
        } else {
            None
        };

        if expired {
            self.inner.pop(key);
        }

        result
    }

    /// 写入；容量已满时先淘汰最久未访问的一条。
    pub fn put(&mut self, key: String, data: ResponseEnvelope) {
        self.inner.put(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                data,
            },
        );
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
