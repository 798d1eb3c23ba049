//! 二维码内容识别模块
//!
//! # 设计思路
//!
//! 扫描得到的原始文本经过两步处理：
//! - **分类**：按前缀规则给出唯一的类型标签（URL、WIFI、CONTACT ……）
//! - **字段提取**：按类型把内容拆成结构化字段，供展示层渲染与触发动作
//!
//! 两步都是纯函数，无副作用、可重入，可在任意线程并发调用。
//!
//! # 实现思路
//!
//! - 类型标签为封闭枚举 `QrCodeType`，序列化为大写字符串，与历史存储的格式一致。
//! - 字段记录为带标签的 `ParsedFields` 枚举，调用方穷举匹配，不依赖动态属性。
//! - 子模块按职责拆分：分类归 `classify`，字段拆解归 `extract`。

pub mod classify;
pub mod extract;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use classify::classify;
pub use extract::{extract_fields, ParsedFields};

/// 二维码内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QrCodeType {
    Url,
    Text,
    Wifi,
    Contact,
    Geo,
    Sms,
    Phone,
    Email,
    /// 分类器不会产出，仅用于兼容外部写入的数据
    Other,
}

impl QrCodeType {
    /// 所有类型，按枚举声明顺序
    pub const ALL: [QrCodeType; 9] = [
        QrCodeType::Url,
        QrCodeType::Text,
        QrCodeType::Wifi,
        QrCodeType::Contact,
        QrCodeType::Geo,
        QrCodeType::Sms,
        QrCodeType::Phone,
        QrCodeType::Email,
        QrCodeType::Other,
    ];

    /// 持久化与序列化使用的标签字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            QrCodeType::Url => "URL",
            QrCodeType::Text => "TEXT",
            QrCodeType::Wifi => "WIFI",
            QrCodeType::Contact => "CONTACT",
            QrCodeType::Geo => "GEO",
            QrCodeType::Sms => "SMS",
            QrCodeType::Phone => "PHONE",
            QrCodeType::Email => "EMAIL",
            QrCodeType::Other => "OTHER",
        }
    }
}

impl fmt::Display for QrCodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 分类结果
///
/// `content` 只是去掉首尾空白后的原始文本，不做任何重新编码。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQrCode {
    #[serde(rename = "type")]
    pub kind: QrCodeType,
    pub content: String,
}

impl ParsedQrCode {
    /// 按分类结果拆解结构化字段
    pub fn fields(&self) -> ParsedFields {
        extract_fields(&self.content, self.kind)
    }
}
