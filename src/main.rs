// main.rs
// 功能：
// 1. 读取 config.toml（接口地址 / 缓存 / 限流配置）
// 2. 构建 SearchSession（HTTP 客户端 + 终端宿主）
// 3. 按命令行参数执行一次检索并输出结果卡片
// 4. --stats 时额外输出资源统计

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use pansou::api::HttpApiClient;
use pansou::config::Config;
use pansou::host::HostServices;
use pansou::session::{SearchMode, SearchSession};

#[derive(Parser)]
#[command(name = "pansou")]
struct Args {
    /// 搜索关键词
    keyword: String,

    /// config.toml 路径
    #[arg(long, default_value = "config/config.toml")]
    config: PathBuf,

    /// 页码
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// 网盘类型（all/baidu/quark/aliyun/thunder）
    #[arg(long)]
    pan: Option<String>,

    /// 文件类型（document/video/audio/image/archive/application）
    #[arg(long)]
    file_type: Option<String>,

    /// 时间范围（week/half_month/month/half_year/year）
    #[arg(long)]
    time: Option<String>,

    /// 精确匹配
    #[arg(long)]
    exact: bool,

    /// 检索服务端本地库而不是联网搜索
    #[arg(long)]
    local: bool,

    /// 顺带输出资源统计
    #[arg(long)]
    stats: bool,
}

/// 终端宿主：剪贴板/打开链接降级成标准输出。
struct ConsoleHost;

impl HostServices for ConsoleHost {
    fn copy_text(&self, text: &str) -> bool {
        println!("{}", text);
        true
    }

    fn shell_open_external(&self, url: &str) -> bool {
        println!("{}", url);
        true
    }

    fn show_notification(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_text_file(&self, text: &str) -> io::Result<PathBuf> {
        let file_path = std::env::temp_dir().join(format!(
            "{}.txt",
            chrono::Utc::now().timestamp_millis()
        ));
        std::fs::write(&file_path, text)?;
        Ok(file_path)
    }

    fn write_image_file(&self, _base64_url: &str) -> io::Result<PathBuf> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "image write not supported in cli host",
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = Config::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    let api = Arc::new(HttpApiClient::new(&cfg)?);
    let session = SearchSession::new(cfg, api, Arc::new(ConsoleHost));

    if let Some(pan) = &args.pan {
        session.update_filter("cloud_disk_type", pan).await;
    }
    if let Some(file_type) = &args.file_type {
        session.update_filter("file_type", file_type).await;
    }
    if let Some(time) = &args.time {
        session.update_filter("time_range", time).await;
    }
    if args.exact {
        session.update_filter("exact_match", "true").await;
    }
    if args.local {
        session.set_mode(SearchMode::Local).await;
    }

    session.search(&args.keyword, args.page).await;

    let state = session.state().await;
    if let Some(notice) = state.notice() {
        eprintln!("{}", notice.text);
    }
    println!(
        "共 {} 条结果，第 {}/{} 页",
        state.total_count, state.page, state.total_pages
    );
    for item in &state.results {
        let card = item.display();
        println!(
            "[{}] {}  {}  {}",
            card.pan_type_name, card.title, card.file_size, card.updated_at
        );
    }

    if args.stats {
        if let Some(stats) = session.fetch_stats().await {
            println!("资源总量 {}，昨日新增 {}", stats.total, stats.yesterday);
        }
    }

    Ok(())
}
