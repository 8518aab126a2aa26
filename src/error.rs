/// 统一错误分类。
///
/// 变体只携带 String：去重层把同一个在途请求共享给多个等待者，
/// 失败结果必须能 Clone 分发。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("host capability unavailable: {0}")]
    HostUnavailable(String),
}
