//! 扫描历史存储模块
//!
//! # 设计思路
//!
//! 历史记录以一个序列化块的形式保存在键值槽位的单个 key 下，
//! 所有修改都是整表“读取 → 修改 → 写回”。历史规模由手动扫描决定，
//! 每次修改 O(n) 的代价可以接受。
//!
//! # 实现思路
//!
//! - 持久化原语抽象为 `KvSlot`，落盘实现基于 `rusqlite`，测试使用内存实现。
//! - `HistoryStore` 显式构造、按引用传递，不依赖全局状态。
//! - 数据库路径由 `config.json` 决定，缺省落在数据目录下。

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::qr::{ParsedQrCode, QrCodeType};

pub mod config;
mod history;
mod schema;
mod slot;

pub use history::*;
pub use slot::*;

// ============================================================================
// 数据模型
// ============================================================================

/// 一条扫描历史
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanHistoryItem {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: QrCodeType,
    /// 扫描时间（Unix 毫秒）
    pub timestamp: i64,
}

/// 待保存的扫描记录（尚未分配 id）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScan {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: QrCodeType,
    pub timestamp: i64,
}

impl NewScan {
    pub fn from_parsed(parsed: &ParsedQrCode, timestamp: i64) -> Self {
        Self {
            content: parsed.content.clone(),
            kind: parsed.kind,
            timestamp,
        }
    }

    /// 以当前时间作为扫描时间
    pub fn now(parsed: &ParsedQrCode) -> Self {
        Self::from_parsed(parsed, Utc::now().timestamp_millis())
    }
}

// ============================================================================
// 存储初始化
// ============================================================================

/// 打开数据目录下配置的历史数据库
///
/// 创建父目录、初始化 schema，返回可直接使用的 `HistoryStore`。
pub fn open_history_store(data_dir: &Path) -> Result<HistoryStore<SqliteSlot>, AppError> {
    let db_path = config::resolve_db_path(data_dir)?;
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Storage(format!("创建数据库目录失败: {}", e))
        })?;
    }
    log::info!("数据库路径: {}", db_path.display());

    let slot = SqliteSlot::open(&db_path)?;
    Ok(HistoryStore::new(slot))
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::qr::classify;

    #[test]
    fn history_item_serializes_type_as_tag_string() {
        let item = ScanHistoryItem {
            id: "abc".to_string(),
            content: "https://x.com".to_string(),
            kind: QrCodeType::Url,
            timestamp: 2000,
        };
        let json = serde_json::to_value(&item).expect("serialize item");
        assert_eq!(
            json,
            serde_json::json!({"id": "abc", "content": "https://x.com", "type": "URL", "timestamp": 2000})
        );
    }

    #[test]
    fn new_scan_mirrors_parsed_code() {
        let parsed = classify("  geo:1,2 ");
        let scan = NewScan::from_parsed(&parsed, 7);
        assert_eq!(scan.content, "geo:1,2");
        assert_eq!(scan.kind, QrCodeType::Geo);
        assert_eq!(scan.timestamp, 7);
        assert!(NewScan::now(&parsed).timestamp > 0);
    }

    #[test]
    fn open_history_store_persists_to_data_dir() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("qr-scanner-open-test-{nanos}"));

        let saved = {
            let store = open_history_store(&dir).expect("open store");
            store.append(NewScan::from_parsed(&classify("tel:+1"), 1)).expect("append")
        };
        assert!(dir.join("history.db").exists());

        let reopened = open_history_store(&dir).expect("reopen store");
        assert_eq!(reopened.list(), vec![saved]);

        drop(reopened);
        let _ = std::fs::remove_dir_all(dir);
    }
}
