use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// ================= 资源条目 =================

/// 服务端返回的资源条目，收到后只读。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub resource_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
    pub pan_type: u8,
    #[serde(default)]
    pub share_url: Option<String>,
    #[serde(default)]
    pub share_pwd: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// pan_type 数字 -> 网盘名
pub fn pan_type_name(pan_type: u8) -> &'static str {
    match pan_type {
        1 => "百度网盘",
        2 => "夸克网盘",
        3 => "阿里云盘",
        4 => "迅雷网盘",
        _ => "未知网盘",
    }
}

impl ResourceItem {
    /// 展示用的映射副本：标题回退、网盘名、时间回退，原始数据不动。
    pub fn display(&self) -> DisplayItem {
        let title = self
            .file_name
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_default();
        let updated_at = self
            .updated_at
            .clone()
            .or_else(|| self.created_at.clone())
            .unwrap_or_default();
        DisplayItem {
            resource_id: self.resource_id.clone(),
            title,
            file_size: self.file_size.clone().unwrap_or_default(),
            pan_type: self.pan_type,
            pan_type_name: pan_type_name(self.pan_type),
            updated_at: format_date(&updated_at),
        }
    }
}

/// 结果卡片的展示数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub resource_id: String,
    pub title: String,
    pub file_size: String,
    pub pan_type: u8,
    pub pan_type_name: &'static str,
    pub updated_at: String,
}

/// 卡片时间格式化；解析不了就原样展示。
pub fn format_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw).or_else(|_| DateTime::parse_from_rfc2822(raw))
    {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return naive.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    raw.to_string()
}

/// ================= 归一化响应 =================

/// 解析层产出的归一化搜索响应。
/// 缺 results 置空、缺 total 置 0 都已在 api 层完成。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseEnvelope {
    pub results: Vec<ResourceItem>,
    pub total: u64,
}
