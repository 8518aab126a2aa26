use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use tokio::sync::{Mutex, RwLock};

use crate::api::{FeedbackReply, ResourceStats, SearchApi};
use crate::api::models::FeedbackRequest;
use crate::cache::SearchCache;
use crate::config::Config;
use crate::error::SearchError;
use crate::filter::FilterState;
use crate::host::HostServices;
use crate::model::{ResourceItem, ResponseEnvelope};
use crate::optimizer::RequestOptimizer;
use crate::query::{self, QueryDescriptor};

/// ================= 常量 =================

/// 浮层消息自动消失时间
pub const NOTICE_DISMISS: Duration = Duration::from_millis(2600);
/// "资源已删除"提示展示时间
pub const DELETED_NOTICE_DISMISS: Duration = Duration::from_millis(3000);
/// 反馈成功后弹窗自动关闭延迟（供 UI 使用）
pub const FEEDBACK_CLOSE_DELAY: Duration = Duration::from_millis(1200);

/// 搜索模式：联网检索或服务端本地库检索
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Online,
    Local,
}

impl SearchMode {
    fn cache_prefix(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Local => "local",
        }
    }
}

/// ================= 浮层消息 =================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// 一条带过期时间的浮层消息，到期后读不到（惰性丢弃，不起定时器）。
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    expires_at: Instant,
}

impl Notice {
    fn new(text: impl Into<String>, level: NoticeLevel, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            level,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// ================= UI 状态 =================

/// UI 可见状态；`SearchSession::state` 返回其快照。
#[derive(Debug, Clone)]
pub struct UiState {
    pub keyword: String,
    pub page: u32,
    pub results: Vec<ResourceItem>,
    pub total_count: u64,
    pub total_pages: u32,
    pub searched: bool,
    pub loading: bool,
    pub mode: SearchMode,
    pub stats: ResourceStats,
    /// 已提交过失效反馈的资源 id，对应卡片按钮置灰
    pub feedback_done: HashSet<String>,
    notice: Option<Notice>,
}

impl UiState {
    /// 当前应展示的浮层消息；过期即拿不到。
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired())
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            page: 1,
            results: Vec::new(),
            total_count: 0,
            total_pages: 1,
            searched: false,
            loading: false,
            mode: SearchMode::default(),
            stats: ResourceStats::default(),
            feedback_done: HashSet::new(),
            notice: None,
        }
    }
}

/// ================= 动作与反馈结果 =================

/// 卡片动作（打开/复制）的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// 副作用已执行，携带实际使用的链接文本
    Done(String),
    /// 已有动作在途，本次直接忽略
    Busy,
    /// 校验未通过、链接缺失或超时，提示已发浮层
    Rejected,
}

/// 失效反馈表单
#[derive(Debug, Clone)]
pub struct FeedbackForm {
    /// 失效原因分类，1..=3
    pub invalid_type: u8,
    pub description: String,
    pub contact_info: String,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self {
            invalid_type: 1,
            description: String::new(),
            contact_info: String::new(),
        }
    }
}

/// 反馈提交的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// 服务端已确认失效并删除，卡片已从结果集中移除
    Deleted,
    /// 反馈已登记，资源仍然有效
    Acknowledged { message: String },
    /// 提交失败（网络/服务端/参数），附带提示
    Failed { message: String },
}

/// ================= 会话编排 =================

/// 搜索编排器。
///
/// Clone 后共享同一份状态（句柄式结构，所有字段都在 Arc 里）；
/// 方法只要 &self，网络等待期间不持任何锁。
#[derive(Clone)]
pub struct SearchSession {
    api: Arc<dyn SearchApi>,
    host: Arc<dyn HostServices>,
    cfg: Arc<Config>,
    filters: Arc<RwLock<FilterState>>,
    cache: Arc<Mutex<SearchCache>>,
    optimizer: RequestOptimizer,
    ui: Arc<RwLock<UiState>>,
    /// 单调递增的搜索代号；发布前校验，迟到的旧响应直接丢弃
    generation: Arc<AtomicU64>,
    /// 全局"动作在途"标记，打开/复制共用
    action_busy: Arc<AtomicBool>,
}

impl SearchSession {
    pub fn new(cfg: Config, api: Arc<dyn SearchApi>, host: Arc<dyn HostServices>) -> Self {
        let cache = SearchCache::new(cfg.cache_capacity, Duration::from_millis(cfg.cache_ttl_ms));
        let optimizer = RequestOptimizer::new(
            cfg.max_concurrent,
            Duration::from_millis(cfg.request_delay_ms),
        );
        Self {
            api,
            host,
            cfg: Arc::new(cfg),
            filters: Arc::new(RwLock::new(FilterState::default())),
            cache: Arc::new(Mutex::new(cache)),
            optimizer,
            ui: Arc::new(RwLock::new(UiState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            action_busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// UI 状态快照
    pub async fn state(&self) -> UiState {
        self.ui.read().await.clone()
    }

    // ====== 筛选 ======

    pub async fn update_filter(&self, dimension: &str, value: &str) {
        self.filters.write().await.update(dimension, value);
    }

    /// 重置筛选并整体清空结果缓存，防止跨筛选的陈旧命中。
    pub async fn reset_filters(&self) {
        self.filters.write().await.reset();
        self.cache.lock().await.clear();
    }

    pub async fn has_active_filters(&self) -> bool {
        self.filters.read().await.has_active_filters()
    }

    pub async fn filter_labels(&self) -> Vec<String> {
        self.filters.read().await.labels()
    }

    /// 切换联网/本地库检索，页码回到 1
    pub async fn set_mode(&self, mode: SearchMode) {
        let mut ui = self.ui.write().await;
        ui.mode = mode;
        ui.page = 1;
    }

    // ====== 搜索 ======

    /// 发起一次搜索并把结果发布到 UI 状态。
    ///
    /// 空关键词直接忽略（与输入框行为一致）；所有失败都收敛成
    /// 浮层提示，不向外抛。
    pub async fn search(&self, keyword: &str, page: u32) {
        let keyword = keyword.trim().to_string();
        if keyword.is_empty() {
            debug!("empty keyword, search skipped");
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let filters = *self.filters.read().await;
        let query = match query::build_query(&keyword, page, self.cfg.page_size, &filters) {
            Ok(q) => q,
            Err(e) => {
                warn!("query rejected: {}", e);
                return;
            }
        };
        let mode = self.ui.read().await.mode;

        {
            let mut ui = self.ui.write().await;
            // 已有更新的搜索在途时本次直接作废
            if self.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            ui.keyword = keyword;
            ui.page = page;
            ui.searched = true;
            ui.loading = true;
        }

        let key = format!("{}:{}", mode.cache_prefix(), query.cache_key());

        if self.cfg.enable_cache {
            if let Some(hit) = self.cache.lock().await.get(&key) {
                debug!("cache hit: {}", key);
                self.publish(generation, hit).await;
                return;
            }
        }

        match self.fetch(&key, query, mode).await {
            Ok(envelope) => {
                if self.cfg.enable_cache {
                    self.cache.lock().await.put(key, envelope.clone());
                }
                self.publish(generation, envelope).await;
            }
            Err(e) => {
                error!("search failed: {}", e);
                self.publish_failure(generation).await;
            }
        }
    }

    /// 翻页：沿用当前关键词重新检索。
    pub async fn go_to_page(&self, page: u32) {
        let keyword = self.ui.read().await.keyword.clone();
        self.search(&keyword, page).await;
    }

    /// 按开关选择直连 / 去重 / 限流队列
    async fn fetch(
        &self,
        key: &str,
        query: QueryDescriptor,
        mode: SearchMode,
    ) -> Result<ResponseEnvelope, SearchError> {
        let api = Arc::clone(&self.api);
        let request = async move {
            match mode {
                SearchMode::Online => api.search(&query).await,
                SearchMode::Local => api.search_cached(&query).await,
            }
        };
        if self.cfg.enable_dedup {
            self.optimizer.dedupe(key, request).await
        } else if self.cfg.enable_queue {
            self.optimizer.enqueue(request).await
        } else {
            request.await
        }
    }

    async fn publish(&self, generation: u64, envelope: ResponseEnvelope) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale search response (generation {})", generation);
            return;
        }
        let mut ui = self.ui.write().await;
        ui.loading = false;
        ui.total_count = envelope.total;
        ui.total_pages = total_pages(envelope.total, self.cfg.page_size);
        ui.results = envelope.results;
    }

    async fn publish_failure(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale search failure (generation {})", generation);
            return;
        }
        let mut ui = self.ui.write().await;
        ui.loading = false;
        ui.results.clear();
        ui.total_count = 0;
        ui.total_pages = 1;
        ui.notice = Some(Notice::new(
            "搜索失败，请稍后重试",
            NoticeLevel::Error,
            NOTICE_DISMISS,
        ));
    }

    // ====== 卡片动作 ======

    /// 打开分享链接。动作标记未释放时直接忽略本次点击。
    pub async fn open_link(&self, resource_id: &str) -> ActionOutcome {
        let Some(_guard) = ActionGuard::acquire(&self.action_busy) else {
            return ActionOutcome::Busy;
        };
        let Some(item) = self.find_item(resource_id).await else {
            self.notice("资源不可用", NoticeLevel::Error).await;
            return ActionOutcome::Rejected;
        };

        let url = match self.resolve_with_timeout(&item).await {
            Some(url) => url,
            None => return ActionOutcome::Rejected,
        };

        if self.host.shell_open_external(&url) {
            ActionOutcome::Done(url)
        } else {
            self.notice("无法打开链接", NoticeLevel::Error).await;
            ActionOutcome::Rejected
        }
    }

    /// 复制分享链接，带提取码时一并附上。
    pub async fn copy_link(&self, resource_id: &str) -> ActionOutcome {
        let Some(_guard) = ActionGuard::acquire(&self.action_busy) else {
            return ActionOutcome::Busy;
        };
        let Some(item) = self.find_item(resource_id).await else {
            self.notice("资源不可用", NoticeLevel::Error).await;
            return ActionOutcome::Rejected;
        };

        let mut text = match self.resolve_with_timeout(&item).await {
            Some(url) => url,
            None => return ActionOutcome::Rejected,
        };
        if let Some(pwd) = item.share_pwd.as_deref().filter(|p| !p.is_empty()) {
            text.push_str(&format!(" 提取码：{}", pwd));
        }

        if self.host.copy_text(&text) {
            self.notice("链接已复制", NoticeLevel::Info).await;
            ActionOutcome::Done(text)
        } else {
            self.notice("复制失败", NoticeLevel::Error).await;
            ActionOutcome::Rejected
        }
    }

    async fn find_item(&self, resource_id: &str) -> Option<ResourceItem> {
        self.ui
            .read()
            .await
            .results
            .iter()
            .find(|r| r.resource_id == resource_id)
            .cloned()
    }

    /// 校验 + 取链接整体限时，超时后动作标记照常释放。
    async fn resolve_with_timeout(&self, item: &ResourceItem) -> Option<String> {
        let timeout = Duration::from_millis(self.cfg.action_timeout_ms);
        match tokio::time::timeout(timeout, self.resolve_share_url(item)).await {
            Ok(url) => url,
            Err(_) => {
                warn!("link resolution timed out for {}", item.resource_id);
                self.notice("操作超时，请稍后重试", NoticeLevel::Error).await;
                None
            }
        }
    }

    /// 校验资源有效性并拿到可用的分享链接。
    /// 拿不到时负责发浮层提示并返回 None。
    async fn resolve_share_url(&self, item: &ResourceItem) -> Option<String> {
        let check = match self
            .api
            .check_resource_status(&item.resource_id, item.pan_type)
            .await
        {
            Ok(c) => c,
            Err(e) => {
                error!("resource status check failed: {}", e);
                self.notice("校验或获取链接失败", NoticeLevel::Error).await;
                return None;
            }
        };
        if !check.valid {
            let msg = check.message.unwrap_or_else(|| "资源不可用".to_string());
            self.notice(&msg, NoticeLevel::Error).await;
            return None;
        }

        // 阿里云盘/迅雷网盘直接用校验接口带回的链接
        if item.pan_type == 3 || item.pan_type == 4 {
            return match check.share_url {
                Some(url) if !url.is_empty() => Some(url),
                _ => {
                    self.notice("未获取到分享链接", NoticeLevel::Error).await;
                    None
                }
            };
        }

        // 百度/夸克需要再取一次分享链接
        let platform = if item.pan_type == 1 { "baidu" } else { "quark" };
        match self.api.get_share(platform, &item.resource_id).await {
            Ok(share) => match share.share_url {
                Some(url) if !url.is_empty() => Some(url),
                _ => {
                    let msg = share.message.unwrap_or_else(|| "资源不可用".to_string());
                    self.notice(&msg, NoticeLevel::Error).await;
                    None
                }
            },
            Err(e) => {
                error!("share link fetch failed: {}", e);
                self.notice("校验或获取链接失败", NoticeLevel::Error).await;
                None
            }
        }
    }

    // ====== 失效反馈 ======

    /// 提交失效反馈。
    ///
    /// 服务端确认删除时把卡片从结果集移除并提示；
    /// 否则把资源记入"已反馈"集合。
    pub async fn submit_feedback(&self, resource_id: &str, form: &FeedbackForm) -> FeedbackOutcome {
        if !(1..=3).contains(&form.invalid_type) {
            warn!("invalid feedback reason: {}", form.invalid_type);
            return FeedbackOutcome::Failed {
                message: "提交失败，请稍后重试".to_string(),
            };
        }
        let Some(item) = self.find_item(resource_id).await else {
            return FeedbackOutcome::Failed {
                message: "资源不存在".to_string(),
            };
        };

        let req = FeedbackRequest {
            resource_id: item.resource_id.clone(),
            pan_type: item.pan_type,
            invalid_type: form.invalid_type,
            description: form.description.clone(),
            contact_info: form.contact_info.clone(),
        };

        match self.api.report_invalid(&req).await {
            Ok(FeedbackReply { deleted: true, .. }) => {
                let mut ui = self.ui.write().await;
                ui.results.retain(|r| r.resource_id != item.resource_id);
                ui.notice = Some(Notice::new(
                    "该资源已确认失效并自动删除",
                    NoticeLevel::Info,
                    DELETED_NOTICE_DISMISS,
                ));
                FeedbackOutcome::Deleted
            }
            Ok(_) => {
                self.ui
                    .write()
                    .await
                    .feedback_done
                    .insert(item.resource_id.clone());
                FeedbackOutcome::Acknowledged {
                    message: "该资源仍然有效,感谢你的反馈。".to_string(),
                }
            }
            Err(e) => {
                error!("feedback submit failed: {}", e);
                let message = match e {
                    SearchError::Server(msg) => msg,
                    _ => "提交失败，请稍后重试".to_string(),
                };
                FeedbackOutcome::Failed { message }
            }
        }
    }

    // ====== 统计 ======

    /// 拉取页脚统计；失败只记 debug，不打扰用户。
    pub async fn fetch_stats(&self) -> Option<ResourceStats> {
        match self.api.resource_stats().await {
            Ok(stats) => {
                self.ui.write().await.stats = stats;
                Some(stats)
            }
            Err(e) => {
                debug!("resource stats unavailable: {}", e);
                None
            }
        }
    }

    async fn notice(&self, text: &str, level: NoticeLevel) {
        self.ui.write().await.notice = Some(Notice::new(text, level, NOTICE_DISMISS));
    }
}

fn total_pages(total: u64, limit: u32) -> u32 {
    total.div_ceil(limit as u64).clamp(1, u32::MAX as u64) as u32
}

/// 动作标记的 RAII 守卫：拿不到说明已有动作在途。
struct ActionGuard(Arc<AtomicBool>);

impl ActionGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
