//! 扫描历史子模块
//!
//! ## 职责
//! - 在单个键值槽位上维护扫描历史列表（最新在前）
//! - 提供追加、列出、搜索、按 id 删除、清空
//!
//! ## 输入/输出
//! - 输入：`NewScan`、条目 id、搜索关键字
//! - 输出：`ScanHistoryItem`、`Vec<ScanHistoryItem>` 或 `Result<(), AppError>`
//!
//! ## 错误语义
//! - 写入失败原样返回 `AppError::Storage`，不做重试
//! - `list` 对损坏数据采取容错策略：记录警告并返回空列表；
//!   需要区分损坏的调用方使用 `list_strict`，得到 `AppError::Corrupt`
//!
//! ## 并发
//! 每次修改都是“整表读取 → 修改 → 整表写回”。同一个 `HistoryStore` 实例内
//! 的修改由 `write_lock` 串行化；指向同一数据库的多个实例之间仍是后写者胜出。

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

use super::slot::KvSlot;
use super::{NewScan, ScanHistoryItem};

/// 历史列表所在的 key
pub const HISTORY_KEY: &str = "scan_history";

/// 当前写入的数据格式版本
const BLOB_VERSION: u32 = 1;

#[derive(Serialize)]
struct HistoryBlob<'a> {
    v: u32,
    items: &'a [ScanHistoryItem],
}

#[derive(Deserialize)]
struct VersionedHistory {
    v: u32,
    items: Vec<ScanHistoryItem>,
}

fn encode_history(items: &[ScanHistoryItem]) -> Result<String, AppError> {
    serde_json::to_string(&HistoryBlob { v: BLOB_VERSION, items })
        .map_err(|e| AppError::Storage(format!("序列化历史失败: {}", e)))
}

/// 解析持久化数据：带版本的信封 `{"v":1,"items":[...]}`，或旧版裸数组
fn decode_history(blob: &str) -> Result<Vec<ScanHistoryItem>, AppError> {
    let value: serde_json::Value = serde_json::from_str(blob)
        .map_err(|e| AppError::Corrupt(format!("JSON 解析失败: {}", e)))?;

    if value.is_array() {
        return serde_json::from_value(value)
            .map_err(|e| AppError::Corrupt(format!("旧版历史格式无效: {}", e)));
    }

    let versioned: VersionedHistory = serde_json::from_value(value)
        .map_err(|e| AppError::Corrupt(format!("历史格式无效: {}", e)))?;
    if versioned.v != BLOB_VERSION {
        return Err(AppError::Corrupt(format!(
            "不支持的历史格式版本: current={}, expected={}",
            versioned.v, BLOB_VERSION
        )));
    }
    Ok(versioned.items)
}

fn fresh_id(existing: &[ScanHistoryItem]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !existing.iter().any(|item| item.id == id) {
            return id;
        }
    }
}

fn matches_query(item: &ScanHistoryItem, needle: &str) -> bool {
    item.content.to_lowercase().contains(needle)
}

/// 扫描历史存储
///
/// 显式构造后以引用传给调用方，不存在进程级全局句柄。
pub struct HistoryStore<S> {
    slot: S,
    write_lock: Mutex<()>,
}

impl<S: KvSlot> HistoryStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot, write_lock: Mutex::new(()) }
    }

    /// 底层槽位
    pub fn slot(&self) -> &S {
        &self.slot
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        self.write_lock.lock().map_err(|e| {
            AppError::Storage(format!("获取历史写锁失败: {}", e))
        })
    }

    fn load(&self) -> Result<Vec<ScanHistoryItem>, AppError> {
        match self.slot.get(HISTORY_KEY)? {
            Some(blob) => decode_history(&blob),
            None => Ok(Vec::new()),
        }
    }

    /// 修改前读取：损坏数据按空列表处理（随后会被覆盖），读取失败则向上返回
    fn load_for_update(&self) -> Result<Vec<ScanHistoryItem>, AppError> {
        match self.load() {
            Err(AppError::Corrupt(reason)) => {
                log::warn!("历史数据已损坏，将以空列表重建: {}", reason);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn persist(&self, items: &[ScanHistoryItem]) -> Result<(), AppError> {
        let blob = encode_history(items)?;
        self.slot.set(HISTORY_KEY, &blob).inspect_err(|e| {
            log::error!("写入扫描历史失败: {}", e);
        })
    }

    /// 追加一条扫描记录到列表头部，返回带 id 的记录
    pub fn append(&self, scan: NewScan) -> Result<ScanHistoryItem, AppError> {
        let _guard = self.lock()?;
        let mut items = self.load_for_update()?;

        let item = ScanHistoryItem {
            id: fresh_id(&items),
            content: scan.content,
            kind: scan.kind,
            timestamp: scan.timestamp,
        };
        items.insert(0, item.clone());

        self.persist(&items)?;
        log::debug!("已保存扫描记录 {} ({})，共 {} 条", item.id, item.kind, items.len());
        Ok(item)
    }

    /// 全部历史，最新在前；读取或解析失败时返回空列表
    pub fn list(&self) -> Vec<ScanHistoryItem> {
        self.load().unwrap_or_else(|e| {
            log::warn!("读取扫描历史失败，返回空列表: {}", e);
            Vec::new()
        })
    }

    /// 全部历史，最新在前；损坏数据返回 `AppError::Corrupt`
    pub fn list_strict(&self) -> Result<Vec<ScanHistoryItem>, AppError> {
        self.load()
    }

    /// 按内容做不区分大小写的子串过滤，保持原有顺序；空关键字返回全部
    pub fn search(&self, query: &str) -> Vec<ScanHistoryItem> {
        let needle = query.trim().to_lowercase();
        let items = self.list();
        if needle.is_empty() {
            return items;
        }
        items.into_iter().filter(|item| matches_query(item, &needle)).collect()
    }

    /// 删除指定 id 的记录；id 不存在时不报错
    pub fn delete_by_id(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.lock()?;
        let mut items = self.load_for_update()?;

        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            log::debug!("删除的记录不存在: {}", id);
        }

        self.persist(&items)
    }

    /// 清空历史
    pub fn clear(&self) -> Result<(), AppError> {
        let _guard = self.lock()?;
        self.persist(&[])?;
        log::debug!("扫描历史已清空");
        Ok(())
    }
}
