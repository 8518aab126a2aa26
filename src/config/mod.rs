use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ================= config.toml =================
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// 资源搜索服务地址
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub proxy: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// 卡片动作（校验 + 取链接）的整体超时，防止动作按钮永久锁死
    #[serde(default = "default_action_timeout")]
    pub action_timeout_ms: u64,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_ms: u64,
    #[serde(default = "default_enabled")]
    pub enable_cache: bool,
    #[serde(default = "default_enabled")]
    pub enable_dedup: bool,
    #[serde(default)]
    pub enable_queue: bool,

    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,
}

impl Config {
    /// 加载完成后收尾：去掉 api_base 末尾的斜杠
    pub fn finalize(&mut self) {
        while self.api_base.ends_with('/') {
            self.api_base.pop();
        }
    }

    /// 从 toml 读取；文件不存在时退回默认配置。
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut cfg: Config = if path.exists() {
            toml::from_str(&fs::read_to_string(path)?)?
        } else {
            log::info!("config {} not found, using defaults", path.display());
            Config::default()
        };
        cfg.finalize();
        Ok(cfg)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            page_size: default_page_size(),
            proxy: None,
            request_timeout_secs: default_request_timeout(),
            action_timeout_ms: default_action_timeout(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_ms: default_cache_ttl(),
            enable_cache: true,
            enable_dedup: true,
            enable_queue: false,
            max_concurrent: default_max_concurrent(),
            request_delay_ms: default_request_delay(),
        }
    }
}

fn default_api_base() -> String {
    "https://pansoo.cn".into()
}
fn default_page_size() -> u32 {
    30
}
fn default_request_timeout() -> u64 {
    30
}
fn default_action_timeout() -> u64 {
    10_000
}
fn default_cache_capacity() -> usize {
    50
}
fn default_cache_ttl() -> u64 {
    300_000
}
fn default_enabled() -> bool {
    true
}
fn default_max_concurrent() -> usize {
    3
}
fn default_request_delay() -> u64 {
    100
}
