use crate::error::SearchError;
use crate::filter::FilterState;

/// 一次搜索请求的规范化描述。
///
/// 由 (keyword, page, limit, 筛选状态) 唯一确定，构造后不再变化；
/// 既是请求参数的来源，也是缓存键的来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub keyword: String,
    pub page: u32,
    pub limit: u32,
    pub pan_type: u8,
    pub file_type: Option<&'static str>,
    pub exact: bool,
    pub time_filter: Option<&'static str>,
}

/// (keyword, page, limit, 筛选状态) -> QueryDescriptor
pub fn build_query(
    keyword: &str,
    page: u32,
    limit: u32,
    filters: &FilterState,
) -> Result<QueryDescriptor, SearchError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(SearchError::InvalidArgument(
            "keyword must not be empty".into(),
        ));
    }
    if page == 0 {
        return Err(SearchError::InvalidArgument("page must be >= 1".into()));
    }
    if limit == 0 {
        return Err(SearchError::InvalidArgument("limit must be >= 1".into()));
    }

    Ok(QueryDescriptor {
        keyword: keyword.to_string(),
        page,
        limit,
        pan_type: filters.cloud_disk_type.pan_type(),
        file_type: filters.file_type.param(),
        exact: filters.exact_match,
        time_filter: filters.time_range.param(),
    })
}

impl QueryDescriptor {
    /// 上送给服务端的字面参数，顺序固定。
    ///
    /// exact 为 false 时整个参数缺省，不能上送 `exact=0` ——
    /// 缺省与 false 在服务端的默认语义可能不同。
    pub fn wire_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("keyword", self.keyword.clone()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("pan_type", self.pan_type.to_string()),
        ];
        if let Some(file_type) = self.file_type {
            params.push(("file_type", file_type.to_string()));
        }
        if self.exact {
            params.push(("exact", "1".to_string()));
        }
        if let Some(time_filter) = self.time_filter {
            params.push(("time_filter", time_filter.to_string()));
        }
        params
    }

    /// 缓存键：参数按名字典序排列后拼接，
    /// 同一逻辑组合与设置顺序无关，必然得到同一字符串。
    pub fn cache_key(&self) -> String {
        let mut params = self.wire_params();
        params.sort_by(|a, b| a.0.cmp(b.0));
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}
