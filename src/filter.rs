use log::warn;

/// ================= 筛选维度 =================

/// 网盘类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloudDiskType {
    #[default]
    All,
    Baidu,
    Quark,
    Aliyun,
    Thunder,
}

impl CloudDiskType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "baidu" => Some(Self::Baidu),
            "quark" => Some(Self::Quark),
            "aliyun" => Some(Self::Aliyun),
            "thunder" => Some(Self::Thunder),
            _ => None,
        }
    }

    /// 网盘类型 -> pan_type 数字，"全部"固定上送 0
    pub fn pan_type(self) -> u8 {
        match self {
            Self::All => 0,
            Self::Baidu => 1,
            Self::Quark => 2,
            Self::Aliyun => 3,
            Self::Thunder => 4,
        }
    }

    fn label(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Baidu => Some("百度网盘"),
            Self::Quark => Some("夸克网盘"),
            Self::Aliyun => Some("阿里云盘"),
            Self::Thunder => Some("迅雷网盘"),
        }
    }
}

/// 文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    #[default]
    All,
    Document,
    Video,
    Audio,
    Image,
    Archive,
    Application,
    Software,
    Other,
}

impl FileType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "document" => Some(Self::Document),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "image" => Some(Self::Image),
            "archive" => Some(Self::Archive),
            "application" => Some(Self::Application),
            "software" => Some(Self::Software),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// 文件类型 -> file_type 参数；映射表之外的取值不上送
    pub fn param(self) -> Option<&'static str> {
        match self {
            Self::Document => Some("document"),
            Self::Video => Some("video"),
            Self::Audio => Some("audio"),
            Self::Image => Some("image"),
            Self::Archive => Some("archive"),
            Self::Application => Some("application"),
            Self::All | Self::Software | Self::Other => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Document => "文档",
            Self::Video => "视频",
            Self::Audio => "音频",
            Self::Image => "图片",
            Self::Archive => "压缩包",
            Self::Application => "应用/软件",
            Self::Software => "software",
            Self::Other => "other",
        }
    }
}

/// 更新时间范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    All,
    Today,
    Week,
    HalfMonth,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl TimeRange {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "half_month" => Some(Self::HalfMonth),
            "month" => Some(Self::Month),
            "quarter" => Some(Self::Quarter),
            "half_year" => Some(Self::HalfYear),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    /// 时间范围 -> time_filter 参数；映射表之外的取值不上送
    pub fn param(self) -> Option<&'static str> {
        match self {
            Self::Week => Some("week"),
            Self::HalfMonth => Some("half_month"),
            Self::Month => Some("month"),
            Self::HalfYear => Some("half_year"),
            Self::Year => Some("year"),
            Self::All | Self::Today | Self::Quarter => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "一周内",
            Self::HalfMonth => "半月内",
            Self::Month => "一月内",
            Self::Quarter => "quarter",
            Self::HalfYear => "半年内",
            Self::Year => "一年内",
        }
    }
}

/// ================= 筛选状态 =================

/// 四个互相独立的筛选维度，默认值均为"不过滤"。
/// 只在会话内存活，不持久化。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub cloud_disk_type: CloudDiskType,
    pub file_type: FileType,
    pub exact_match: bool,
    pub time_range: TimeRange,
}

impl FilterState {
    /// 按维度名更新单个筛选器。
    ///
    /// 未知维度与非法取值都只记一条 warn 后忽略，状态不变。
    pub fn update(&mut self, dimension: &str, value: &str) {
        match dimension {
            "cloud_disk_type" => match CloudDiskType::parse(value) {
                Some(v) => self.cloud_disk_type = v,
                None => warn!("invalid cloud_disk_type value: {}", value),
            },
            "file_type" => match FileType::parse(value) {
                Some(v) => self.file_type = v,
                None => warn!("invalid file_type value: {}", value),
            },
            "exact_match" => match value {
                "true" | "1" => self.exact_match = true,
                "false" | "0" => self.exact_match = false,
                _ => warn!("invalid exact_match value: {}", value),
            },
            "time_range" => match TimeRange::parse(value) {
                Some(v) => self.time_range = v,
                None => warn!("invalid time_range value: {}", value),
            },
            _ => warn!("unknown filter dimension: {}", dimension),
        }
    }

    /// 全部恢复默认值
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_active_filters(&self) -> bool {
        self.cloud_disk_type != CloudDiskType::All
            || self.file_type != FileType::All
            || self.exact_match
            || self.time_range != TimeRange::All
    }

    /// 当前生效筛选条件的展示标签
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if let Some(name) = self.cloud_disk_type.label() {
            labels.push(format!("网盘: {}", name));
        }
        if self.file_type != FileType::All {
            labels.push(format!("类型: {}", self.file_type.label()));
        }
        if self.exact_match {
            labels.push("精确匹配".to_string());
        }
        if self.time_range != TimeRange::All {
            labels.push(format!("时间: {}", self.time_range.label()));
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_dimension_is_ignored() {
        let mut filters = FilterState::default();
        filters.update("sort_order", "desc");
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn invalid_value_is_ignored() {
        let mut filters = FilterState::default();
        filters.update("cloud_disk_type", "quark");
        filters.update("cloud_disk_type", "dropbox");
        assert_eq!(filters.cloud_disk_type, CloudDiskType::Quark);
        filters.update("exact_match", "maybe");
        assert!(!filters.exact_match);
    }

    #[test]
    fn has_active_filters_detects_each_dimension() {
        let mut filters = FilterState::default();
        assert!(!filters.has_active_filters());

        filters.update("file_type", "video");
        assert!(filters.has_active_filters());

        filters.reset();
        filters.update("exact_match", "true");
        assert!(filters.has_active_filters());

        filters.reset();
        filters.update("time_range", "week");
        assert!(filters.has_active_filters());
        assert!(!FilterState::default().has_active_filters());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut filters = FilterState::default();
        filters.update("cloud_disk_type", "baidu");
        filters.update("file_type", "archive");
        filters.update("exact_match", "1");
        filters.update("time_range", "year");
        filters.reset();
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn labels_render_active_filters() {
        let mut filters = FilterState::default();
        assert!(filters.labels().is_empty());

        filters.update("cloud_disk_type", "quark");
        filters.update("exact_match", "true");
        filters.update("time_range", "half_month");
        assert_eq!(
            filters.labels(),
            vec![
                "网盘: 夸克网盘".to_string(),
                "精确匹配".to_string(),
                "时间: 半月内".to_string(),
            ]
        );
    }
}
