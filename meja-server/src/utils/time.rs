//! 时间工具函数: 业务时区转换
//!
//! 存储层只保存 `i64` Unix millis，按日统计时在这里换算成业务时区的日期。

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;

/// 解析 IANA 时区名 (如 `Asia/Jakarta`)
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse().ok()
}

/// Unix millis → 业务时区日期
pub fn local_date(millis: i64, tz: Tz) -> NaiveDate {
    match tz.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.date_naive(),
        None => chrono::DateTime::from_timestamp_millis(millis)
            .map(|dt| dt.date_naive())
            .unwrap_or_default(),
    }
}
