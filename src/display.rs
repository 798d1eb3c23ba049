//! 展示辅助模块
//!
//! 历史列表渲染时用到的小工具：内容截断、扫描时间的友好格式与命令行 JSON 输出。
//! 时间格式使用 `chrono` 的本地时区；`format_date_at` 接收显式的“现在”，便于测试。

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use crate::error::AppError;

/// 截断文本，超长时追加省略号
///
/// 按 Unicode 字符计数；未超过 `max_len` 时原样返回，
/// 否则保留前 `max_len` 个字符并追加 `...`（结果长度为 `max_len + 3`）。
pub fn truncate_text(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// 把命令行结果格式化为缩进 JSON
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Output(e.to_string()))
}

/// 按当前本地时间格式化扫描时间戳（毫秒）
pub fn format_date(timestamp_ms: i64) -> String {
    format_date_at(timestamp_ms, &Local::now())
}

/// 以 `now` 所在时区与日期为基准格式化时间戳（毫秒）
///
/// - 今天：`Today, 3:05 PM`
/// - 昨天：`Yesterday, 9:41 AM`
/// - 更早：`4/22/2025 12:07 AM`
pub fn format_date_at<Tz>(timestamp_ms: i64, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Some(at) = now.timezone().timestamp_millis_opt(timestamp_ms).single() else {
        log::warn!("无法解析的时间戳: {timestamp_ms}");
        return timestamp_ms.to_string();
    };

    let time = at.format("%-I:%M %p");
    let today = now.date_naive();
    let day = at.date_naive();

    if day >= today {
        return format!("Today, {time}");
    }
    if today.pred_opt().is_some_and(|yesterday| day >= yesterday) {
        return format!("Yesterday, {time}");
    }
    format!("{} {time}", day.format("%-m/%-d/%Y"))
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::*;

    fn ms<Tz: TimeZone>(tz: &Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        tz.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("valid test date")
            .timestamp_millis()
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_text("Short text", 20), "Short text");
        assert_eq!(truncate_text("exact", 5), "exact");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_text("abcdefghij", 5), "abcde...");
        assert_eq!(truncate_text("Truncate me please", 10), "Truncate m...");
        let long = "This is a very long text that should be truncated";
        let out = truncate_text(long, 20);
        assert_eq!(out.chars().count(), 23);
        assert_eq!(out, "This is a very long ...");
    }

    #[test]
    fn pretty_json_output_and_failure() {
        let ok = to_pretty_json(&vec!["a", "b"]).expect("serialize list");
        assert!(ok.contains("\"a\""));

        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 2), 3);
        let err = to_pretty_json(&bad).expect_err("tuple keys cannot be JSON keys");
        assert!(matches!(err, AppError::Output(_)));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_text("二维码扫描历史", 3), "二维码...");
    }

    #[test]
    fn today_yesterday_and_older() {
        let now = Utc.with_ymd_and_hms(2025, 4, 24, 12, 0, 0).single().expect("now");

        assert_eq!(format_date_at(ms(&Utc, 2025, 4, 24, 9, 5), &now), "Today, 9:05 AM");
        assert_eq!(format_date_at(ms(&Utc, 2025, 4, 24, 0, 0), &now), "Today, 12:00 AM");
        assert_eq!(format_date_at(ms(&Utc, 2025, 4, 23, 23, 30), &now), "Yesterday, 11:30 PM");
        assert_eq!(format_date_at(ms(&Utc, 2025, 4, 22, 0, 7), &now), "4/22/2025 12:07 AM");
    }

    #[test]
    fn uses_the_time_zone_of_now() {
        let tz = FixedOffset::east_opt(8 * 3600).expect("offset");
        let now = tz.with_ymd_and_hms(2025, 4, 24, 1, 0, 0).single().expect("now");
        // UTC 4/23 16:30 即 +08:00 的 4/24 00:30
        let ts = ms(&Utc, 2025, 4, 23, 16, 30);
        assert_eq!(format_date_at(ts, &now), "Today, 12:30 AM");
    }

    #[test]
    fn future_timestamps_count_as_today() {
        let now = Utc.with_ymd_and_hms(2025, 4, 24, 12, 0, 0).single().expect("now");
        assert_eq!(format_date_at(ms(&Utc, 2025, 4, 25, 13, 0), &now), "Today, 1:00 PM");
    }
}
