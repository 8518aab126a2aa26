// 盘搜客户端核心：筛选 -> 查询编译 -> 缓存/去重 -> 远端检索 -> 状态发布

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod host;
pub mod model;
pub mod optimizer;
pub mod query;
pub mod session;

pub use error::SearchError;
pub use session::SearchSession;
