//! 存储配置子模块
//!
//! ## 职责
//! - 定位数据目录与 `config.json`
//! - 读写数据库目录配置（配置缺失或损坏时回退默认值）
//! - 解析最终的数据库文件路径

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 覆盖数据目录的环境变量
pub const DATA_DIR_ENV: &str = "QR_SCANNER_DATA_DIR";

const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "history.db";
const DEFAULT_DIR_NAME: &str = ".qr-scanner";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// 自定义数据库目录；为空时使用数据目录
    #[serde(default)]
    pub db_dir: Option<String>,
}

fn data_dir_from(override_dir: Option<OsString>, home: Option<OsString>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(DEFAULT_DIR_NAME),
        None => PathBuf::from(DEFAULT_DIR_NAME),
    }
}

/// 数据目录：环境变量优先，其次 `$HOME/.qr-scanner`，最后当前目录下的 `.qr-scanner`
pub fn data_dir() -> PathBuf {
    data_dir_from(std::env::var_os(DATA_DIR_ENV), std::env::var_os("HOME"))
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

pub fn load_config_from_path(config_path: &Path) -> StoreConfig {
    if config_path.exists() {
        match fs::read_to_string(config_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(e) => log::warn!("配置文件解析失败，使用默认配置: {}", e),
            },
            Err(e) => log::warn!("读取配置文件失败，使用默认配置: {}", e),
        }
    }
    StoreConfig::default()
}

pub fn load_config(data_dir: &Path) -> StoreConfig {
    load_config_from_path(&config_path(data_dir))
}

pub fn save_config_to_path(config_path: &Path, config: &StoreConfig) -> Result<(), AppError> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("序列化配置失败: {}", e)))?;
    fs::write(config_path, content)?;
    Ok(())
}

pub fn save_config(data_dir: &Path, config: &StoreConfig) -> Result<(), AppError> {
    save_config_to_path(&config_path(data_dir), config)
}

pub fn resolve_db_path_from_config(data_dir: &Path, config: &StoreConfig) -> Result<PathBuf, AppError> {
    if let Some(ref dir) = config.db_dir {
        if !dir.is_empty() {
            let dir_path = PathBuf::from(dir);
            fs::create_dir_all(&dir_path).map_err(|e| {
                AppError::Storage(format!("创建数据库目录 '{}' 失败: {}", dir, e))
            })?;
            return Ok(dir_path.join(DB_FILE));
        }
    }
    Ok(data_dir.join(DB_FILE))
}

pub fn resolve_db_path(data_dir: &Path) -> Result<PathBuf, AppError> {
    let config = load_config(data_dir);
    resolve_db_path_from_config(data_dir, &config)
}
