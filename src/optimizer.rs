use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::debug;
use tokio::sync::Semaphore;

use crate::error::SearchError;
use crate::model::ResponseEnvelope;

type SharedRequest = Shared<BoxFuture<'static, Result<ResponseEnvelope, SearchError>>>;

/// API 请求优化器：同键在途请求去重 + 可选的限流队列。
#[derive(Clone)]
pub struct RequestOptimizer {
    pending: Arc<Mutex<HashMap<String, SharedRequest>>>,
    semaphore: Arc<Semaphore>,
    admission_delay: Duration,
    last_admitted: Arc<tokio::sync::Mutex<Option<Instant>>>,
}

impl RequestOptimizer {
    pub fn new(max_concurrent: usize, admission_delay: Duration) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            admission_delay,
            last_admitted: Arc::new(tokio::sync::Mutex::new(None)),
        }
    }

    /// 同键去重：已有同键请求在途时直接共享其结果。
    ///
    /// 结算（成功或失败）后登记即被移除，下一次同键调用重新发请求。
    pub async fn dedupe<F>(&self, key: &str, request: F) -> Result<ResponseEnvelope, SearchError>
    where
        F: Future<Output = Result<ResponseEnvelope, SearchError>> + Send + 'static,
    {
        let shared = {
            let mut pending = self.pending.lock().unwrap();
            if let Some(in_flight) = pending.get(key) {
                debug!("request already in flight, sharing result: {}", key);
                in_flight.clone()
            } else {
                let registry = Arc::clone(&self.pending);
                let owned_key = key.to_string();
                let shared: SharedRequest = async move {
                    let result = request.await;
                    registry.lock().unwrap().remove(&owned_key);
                    result
                }
                .boxed()
                .shared();
                pending.insert(key.to_string(), shared.clone());
                shared
            }
        };
        shared.await
    }

    /// 限流队列：并发许可之内放行，相邻放行之间保持固定间隔，
    /// 平滑突发流量。
    pub async fn enqueue<F>(&self, request: F) -> Result<ResponseEnvelope, SearchError>
    where
        F: Future<Output = Result<ResponseEnvelope, SearchError>> + Send,
    {
        let _permit = self.semaphore.clone().acquire_owned().await.unwrap();
        self.pace().await;
        request.await
    }

    async fn pace(&self) {
        let mut last = self.last_admitted.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.admission_delay {
                tokio::time::sleep(self.admission_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// 在途请求数（供观测）
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// 丢弃全部在途登记。不取消已发出的网络调用，
    /// 只是让后续同键请求不再共享旧结果。
    pub fn cancel_pending(&self) {
        self.pending.lock().unwrap().clear();
    }
}
