use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 记录所有已拉取文件中最新的修改时间，只用于展示"最后更新"
///
/// 克隆后共享同一份状态
#[derive(Debug, Clone, Default)]
pub struct Freshness {
    latest: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl Freshness {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个时间戳；只有更新的时间会覆盖，返回是否覆盖
    pub fn observe(&self, timestamp: DateTime<Utc>) -> bool {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        match *latest {
            Some(current) if current >= timestamp => false,
            _ => {
                *latest = Some(timestamp);
                true
            }
        }
    }

    /// 登记 `Last-Modified` 响应头，无法解析的值直接忽略
    pub fn observe_header(&self, header: &str) -> bool {
        match parse_http_date(header) {
            Some(timestamp) => self.observe(timestamp),
            None => {
                debug!("无法解析 Last-Modified: {}", header);
                false
            }
        }
    }

    pub fn latest(&self) -> Option<DateTime<Utc>> {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 形如 `Mar 5, 2025` 的展示文本
    pub fn display(&self) -> Option<String> {
        self.latest().map(|ts| ts.format("%b %-d, %Y").to_string())
    }
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%a, %d %b %Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn only_newer_timestamps_win() {
        let freshness = Freshness::new();
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();

        assert!(freshness.observe(older));
        assert!(freshness.observe(newer));
        assert!(!freshness.observe(older));
        assert_eq!(freshness.latest(), Some(newer));
        assert_eq!(freshness.display().as_deref(), Some("Mar 5, 2025"));
    }

    #[test]
    fn parses_http_date_header() {
        let freshness = Freshness::new();
        assert!(freshness.observe_header("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(
            freshness.latest(),
            Some(Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap())
        );
        assert!(!freshness.observe_header("yesterday"));
    }

    #[test]
    fn clones_share_state() {
        let freshness = Freshness::new();
        let clone = freshness.clone();
        clone.observe(Utc.with_ymd_and_hms(2020, 2, 2, 0, 0, 0).unwrap());
        assert!(freshness.latest().is_some());
    }
}
