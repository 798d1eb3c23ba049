//! Schema 初始化子模块
//!
//! ## 职责
//! - 创建键值槽位表 `kv`
//! - 设置 SQLite 运行参数（WAL）
//! - 通过 `PRAGMA user_version` 记录并校验 schema 版本
//!
//! ## 错误语义
//! - DDL 或版本读写失败统一映射为 `AppError::Database`

use rusqlite::Connection;

use crate::error::AppError;

pub(super) const SCHEMA_VERSION: i64 = 1;

fn get_user_version(conn: &Connection) -> Result<i64, AppError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| AppError::Database(format!("读取数据库版本失败: {}", e)))
}

fn set_user_version(conn: &Connection, version: i64) -> Result<(), AppError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| AppError::Database(format!("写入数据库版本失败: {}", e)))
}

fn create_kv_table(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );"
    ).map_err(|e| AppError::Database(format!("创建键值表失败: {}", e)))
}

pub(super) fn initialize_schema(conn: &Connection) -> Result<(), AppError> {
    // WAL 失败不致命：退回默认日志模式继续初始化
    if let Err(e) = conn.execute_batch("PRAGMA journal_mode=WAL;") {
        log::warn!("启用 WAL 失败，使用默认日志模式: {}", e);
    }

    let mut version = get_user_version(conn)?;
    if version < 1 {
        create_kv_table(conn)?;
        set_user_version(conn, 1)?;
        version = 1;
    }

    if version != SCHEMA_VERSION {
        return Err(AppError::Database(format!(
            "数据库版本不匹配: current={}, expected={}",
            version, SCHEMA_VERSION
        )));
    }

    Ok(())
}
