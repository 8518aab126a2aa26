// models.rs
use serde::{Deserialize, Serialize};

use crate::model::ResourceItem;

// ======================
// /api/search 响应
// ======================
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Option<Vec<ResourceItem>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ======================
// /api/cached_resources 响应（服务端本地库检索）
// ======================
#[derive(Debug, Deserialize)]
pub struct CachedResourcesResponse {
    pub status: String,
    #[serde(default)]
    pub resources: Option<Vec<ResourceItem>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ======================
// /api/check_resource_status 响应
// ======================
#[derive(Debug, Clone, Deserialize)]
pub struct CheckStatusResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub share_url: Option<String>,
}

// ======================
// /api/get_share 响应
// ======================
#[derive(Debug, Clone, Deserialize)]
pub struct ShareLinkResponse {
    #[serde(default)]
    pub share_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ======================
// /api/report_invalid_resource 请求/响应
// ======================
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub resource_id: String,
    pub pan_type: u8,
    pub invalid_type: u8,
    pub description: String,
    pub contact_info: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackResponse {
    pub status: String,
    #[serde(default)]
    pub is_deleted: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

// ======================
// /api/resource_stats 响应
// ======================
#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub status: String,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub yesterday: Option<u64>,
}
