//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 分类与字段提取是全函数，不会失败，因此没有对应的错误类型。
//! 所有可失败的操作都集中在历史存储与配置上，统一返回 `Result<T, AppError>`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，前端/命令行拿到一致的错误格式。

use serde::Serialize;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 持久化槽位读写失败（磁盘满、配额、目录不可用）
    #[error("存储错误: {0}")]
    Storage(String),

    /// 数据库操作失败
    #[error("数据库错误: {0}")]
    Database(String),

    /// 已持久化的历史数据无法反序列化
    #[error("历史数据已损坏: {0}")]
    Corrupt(String),

    /// 配置文件序列化/解析失败
    #[error("配置错误: {0}")]
    Config(String),

    /// 命令行输出序列化失败
    #[error("输出序列化失败: {0}")]
    Output(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
