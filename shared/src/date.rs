//! 时间类型模块
//!
//! - `Timestamp`: 可序列化的毫秒时间戳
//! - `parse_backend_datetime`: 兼容后端返回的带时区 / 不带时区两种格式
//! - 展示用格式化（`January 5, 2025` / `10:20 AM`）

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.as_millis() as i64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 两个时间戳之间的差值，负数按 0 处理
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = (self.0 - rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

// =========================================================
// 解析与格式化
// =========================================================

/// 解析后端时间字符串
///
/// 接受 RFC 3339（`2025-01-05T10:20:30Z`）以及无时区的本地时间
/// （`2025-01-05T10:20:30.123456`），后者按 UTC 处理。
pub fn parse_backend_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `January 5, 2025`
pub fn format_long_date(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}

/// `Jan 5, 2025`
pub fn format_short_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// `10:20 AM`
pub fn format_time(dt: &DateTime<Utc>) -> String {
    dt.format("%-I:%M %p").to_string()
}

/// 无法解析时原样返回
pub fn display_date(raw: &str) -> String {
    parse_backend_datetime(raw)
        .map(|dt| format_long_date(&dt))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_formats() {
        let zoned = parse_backend_datetime("2025-01-05T10:20:30Z").unwrap();
        let local = parse_backend_datetime("2025-01-05T10:20:30.123456").unwrap();
        assert_eq!(zoned.timestamp(), local.timestamp());
        assert!(parse_backend_datetime("yesterday").is_none());
    }

    #[test]
    fn test_display_formats() {
        let dt = parse_backend_datetime("2025-01-05T14:07:00").unwrap();
        assert_eq!(format_long_date(&dt), "January 5, 2025");
        assert_eq!(format_short_date(&dt), "Jan 5, 2025");
        assert_eq!(format_time(&dt), "2:07 PM");
        assert_eq!(display_date("n/a"), "n/a");
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let a = Timestamp::new(1_000);
        let b = a + Duration::from_millis(700);
        assert_eq!(b.as_millis(), 1_700);
        assert_eq!(b - a, Duration::from_millis(700));
        assert_eq!(a - b, Duration::ZERO);
    }
}
