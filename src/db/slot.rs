//! 键值槽位子模块
//!
//! ## 职责
//! - 定义持久化原语 `KvSlot`：按 key 读取/整体覆盖一个字符串值
//! - `SqliteSlot`：基于 `rusqlite` 的落盘实现
//! - `MemorySlot`：内存实现，测试中可切换为“写入失败”模式
//!
//! ## 错误语义
//! - 读写失败映射为 `AppError::Storage`
//! - 打开连接、初始化 schema、获取锁失败映射为 `AppError::Database`

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::AppError;

use super::schema;

/// 单 key 持久化原语
pub trait KvSlot: Send + Sync {
    /// 读取 key 对应的值；不存在时返回 `Ok(None)`
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// 整体覆盖 key 对应的值
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

impl<T: KvSlot + ?Sized> KvSlot for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        (**self).set(key, value)
    }
}

// ============================================================================
// SQLite 实现
// ============================================================================

/// SQLite 键值槽位，连接由 `Mutex` 保护
pub struct SqliteSlot(Mutex<Connection>);

impl SqliteSlot {
    /// 打开（或创建）数据库文件并初始化 schema
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let conn = Connection::open(path).map_err(|e| {
            AppError::Database(format!("打开数据库失败: {}", e))
        })?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            AppError::Database(format!("创建内存数据库失败: {}", e))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, AppError> {
        schema::initialize_schema(&conn)?;
        Ok(Self(Mutex::new(conn)))
    }

    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> Result<T, AppError>) -> Result<T, AppError> {
        let conn = self.0.lock().map_err(|e| {
            AppError::Database(format!("获取数据库锁失败: {}", e))
        })?;
        op(&conn)
    }
}

impl KvSlot for SqliteSlot {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
                .optional()
                .map_err(|e| AppError::Storage(format!("读取 '{}' 失败: {}", key, e)))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|e| AppError::Storage(format!("写入 '{}' 失败: {}", key, e)))?;
            Ok(())
        })
    }
}

// ============================================================================
// 内存实现
// ============================================================================

/// 内存键值槽位
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开后所有写入都返回 `AppError::Storage`，模拟磁盘满/配额耗尽
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KvSlot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries.lock().map_err(|e| {
            AppError::Storage(format!("获取内存槽位锁失败: {}", e))
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("写入 '{}' 失败: 存储空间不足", key)));
        }
        let mut entries = self.entries.lock().map_err(|e| {
            AppError::Storage(format!("获取内存槽位锁失败: {}", e))
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
