use std::time::Duration;

use async_trait::async_trait;
use log::info;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::SearchError;
use crate::model::ResponseEnvelope;
use crate::query::QueryDescriptor;

pub mod models;

use models::{
    CachedResourcesResponse, CheckStatusResponse, FeedbackRequest, FeedbackResponse,
    SearchResponse, ShareLinkResponse, StatsResponse,
};

/// 反馈提交结果（已归一化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackReply {
    pub deleted: bool,
    pub message: Option<String>,
}

/// 资源统计（已归一化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceStats {
    pub total: u64,
    pub yesterday: u64,
}

/// 远端 API 的抽象。编排器只依赖这层接口，测试里用脚本化实现替换。
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// GET /api/search 联网检索
    async fn search(&self, query: &QueryDescriptor) -> Result<ResponseEnvelope, SearchError>;

    /// GET /api/cached_resources 服务端本地库检索
    async fn search_cached(&self, query: &QueryDescriptor)
    -> Result<ResponseEnvelope, SearchError>;

    /// GET /api/check_resource_status 资源有效性校验
    async fn check_resource_status(
        &self,
        resource_id: &str,
        pan_type: u8,
    ) -> Result<CheckStatusResponse, SearchError>;

    /// POST /api/get_share 获取分享链接（百度/夸克）
    async fn get_share(
        &self,
        platform: &str,
        resource_id: &str,
    ) -> Result<ShareLinkResponse, SearchError>;

    /// POST /api/report_invalid_resource 失效反馈
    async fn report_invalid(&self, req: &FeedbackRequest) -> Result<FeedbackReply, SearchError>;

    /// GET /api/resource_stats 资源统计
    async fn resource_stats(&self) -> Result<ResourceStats, SearchError>;
}

/// 基于 reqwest 的实现
pub struct HttpApiClient {
    base: String,
    client: reqwest::Client,
}

impl HttpApiClient {
    /// 按配置构建客户端：全局超时 + 可选代理。
    pub fn new(cfg: &Config) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .hickory_dns(true);

        if let Some(proxy_url) = &cfg.proxy {
            if !proxy_url.is_empty() {
                info!("Using proxy: {}", proxy_url);
                let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                    SearchError::InvalidArgument(format!("invalid proxy url {}: {}", proxy_url, e))
                })?;
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::Network(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            base: cfg.api_base.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SearchError> {
        let resp = self
            .client
            .get(self.url(path))
            .query(params)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        decode(resp).await
    }
}

/// 非 2xx 与解不开的报文一律按服务端错误处理（fail closed）。
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, SearchError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(SearchError::Server(format!(
            "unexpected http status: {}",
            status
        )));
    }
    resp.json::<T>()
        .await
        .map_err(|e| SearchError::Server(format!("malformed response: {}", e)))
}

/// status 判定：success 之外的值一律按错误处理，不做鸭子类型兜底。
fn ensure_success(status: &str, message: Option<String>) -> Result<(), SearchError> {
    match status {
        "success" => Ok(()),
        "error" => Err(SearchError::Server(
            message.unwrap_or_else(|| "搜索失败".to_string()),
        )),
        other => Err(SearchError::Server(format!(
            "unknown response status: {}",
            other
        ))),
    }
}

#[async_trait]
impl SearchApi for HttpApiClient {
    async fn search(&self, query: &QueryDescriptor) -> Result<ResponseEnvelope, SearchError> {
        let resp: SearchResponse = self.get_json("/api/search", &query.wire_params()).await?;
        ensure_success(&resp.status, resp.message)?;
        Ok(ResponseEnvelope {
            results: resp.results.unwrap_or_default(),
            total: resp.total.unwrap_or(0),
        })
    }

    async fn search_cached(
        &self,
        query: &QueryDescriptor,
    ) -> Result<ResponseEnvelope, SearchError> {
        // 本地库接口的关键词参数叫 title，且只认这四个参数
        let params = [
            ("title", query.keyword.clone()),
            ("pan_type", query.pan_type.to_string()),
            ("limit", query.limit.to_string()),
            ("page", query.page.to_string()),
        ];
        let resp: CachedResourcesResponse =
            self.get_json("/api/cached_resources", &params).await?;
        ensure_success(&resp.status, resp.message)?;
        Ok(ResponseEnvelope {
            results: resp.resources.unwrap_or_default(),
            total: resp.total.unwrap_or(0),
        })
    }

    async fn check_resource_status(
        &self,
        resource_id: &str,
        pan_type: u8,
    ) -> Result<CheckStatusResponse, SearchError> {
        let params = [
            ("resource_id", resource_id.to_string()),
            ("pan_type", pan_type.to_string()),
        ];
        self.get_json("/api/check_resource_status", &params).await
    }

    async fn get_share(
        &self,
        platform: &str,
        resource_id: &str,
    ) -> Result<ShareLinkResponse, SearchError> {
        let resp = self
            .client
            .post(self.url("/api/get_share"))
            .query(&[
                ("platform", platform.to_string()),
                ("resource_id", resource_id.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        decode(resp).await
    }

    async fn report_invalid(&self, req: &FeedbackRequest) -> Result<FeedbackReply, SearchError> {
        let resp = self
            .client
            .post(self.url("/api/report_invalid_resource"))
            .json(req)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        let reply: FeedbackResponse = decode(resp).await?;
        match reply.status.as_str() {
            "success" => Ok(FeedbackReply {
                deleted: reply.is_deleted.unwrap_or(false),
                message: reply.message,
            }),
            "error" => Err(SearchError::Server(
                reply
                    .message
                    .unwrap_or_else(|| "提交失败，请稍后重试".to_string()),
            )),
            other => Err(SearchError::Server(format!(
                "unknown response status: {}",
                other
            ))),
        }
    }

    async fn resource_stats(&self) -> Result<ResourceStats, SearchError> {
        let resp: StatsResponse = self.get_json("/api/resource_stats", &[]).await?;
        ensure_success(&resp.status, None)?;
        Ok(ResourceStats {
            total: resp.total.unwrap_or(0),
            yesterday: resp.yesterday.unwrap_or(0),
        })
    }
}
