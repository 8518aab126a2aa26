use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

/// ================= 宿主能力 =================

/// 桌面启动器运行时注入的能力面：剪贴板、外部打开、通知、文件读写。
///
/// 返回 false 表示该能力在当前宿主里不可用，调用方自行降级提示。
pub trait HostServices: Send + Sync {
    /// 复制文本到剪贴板
    fn copy_text(&self, text: &str) -> bool;

    /// 用系统默认方式打开外部链接
    fn shell_open_external(&self, url: &str) -> bool;

    /// 系统通知
    fn show_notification(&self, message: &str);

    /// 读文件
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// 文本写入宿主的下载目录，返回落盘路径
    fn write_text_file(&self, text: &str) -> io::Result<PathBuf>;

    /// 图片（data URL）写入宿主的下载目录，返回落盘路径
    fn write_image_file(&self, base64_url: &str) -> io::Result<PathBuf>;
}

/// 没有宿主时的兜底实现：全部拒绝，只记日志。
#[derive(Debug, Default)]
pub struct NoopHost;

impl HostServices for NoopHost {
    fn copy_text(&self, _text: &str) -> bool {
        warn!("host runtime absent, copy_text unavailable");
        false
    }

    fn shell_open_external(&self, url: &str) -> bool {
        warn!("host runtime absent, cannot open {}", url);
        false
    }

    fn show_notification(&self, message: &str) {
        info!("[notification] {}", message);
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        Err(unsupported(&format!("read_file {}", path.display())))
    }

    fn write_text_file(&self, _text: &str) -> io::Result<PathBuf> {
        Err(unsupported("write_text_file"))
    }

    fn write_image_file(&self, _base64_url: &str) -> io::Result<PathBuf> {
        Err(unsupported("write_image_file"))
    }
}

fn unsupported(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("host runtime absent: {}", what),
    )
}

/// 拆分 `data:image/<ext>;base64,<payload>`，给宿主实现落盘用。
/// 不是图片 data URL 时返回 None。
pub fn split_image_data_url(base64_url: &str) -> Option<(&str, &str)> {
    let rest = base64_url.strip_prefix("data:image/")?;
    let (ext, payload) = rest.split_once(";base64,")?;
    if ext.is_empty() || ext.len() > 20 || !ext.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((ext, payload))
}
