//! 前缀分类子模块
//!
//! 规则按顺序匹配，先命中者胜出；全部未命中时归为 `TEXT`。
//! 前缀之间互斥，顺序本身是对外约定，不得调整。

use super::{ParsedQrCode, QrCodeType};

/// 有序前缀规则表
const PREFIX_RULES: &[(QrCodeType, &[&str])] = &[
    (QrCodeType::Url, &["http://", "https://", "www."]),
    (QrCodeType::Wifi, &["WIFI:"]),
    (QrCodeType::Contact, &["BEGIN:VCARD", "MECARD:"]),
    (QrCodeType::Geo, &["geo:"]),
    (QrCodeType::Sms, &["sms:"]),
    (QrCodeType::Phone, &["tel:"]),
    (QrCodeType::Email, &["mailto:"]),
];

/// 判断去空白后的文本属于哪种类型
pub fn detect_type(trimmed: &str) -> QrCodeType {
    PREFIX_RULES
        .iter()
        .find(|(_, prefixes)| prefixes.iter().any(|p| trimmed.starts_with(p)))
        .map(|(kind, _)| *kind)
        .unwrap_or(QrCodeType::Text)
}

/// 去掉首尾空白；扫码器常带出的 BOM（U+FEFF）一并视为空白
fn trim_scanned(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// 对扫描得到的原始文本分类
///
/// 不会失败：任何输入（包括空串）都得到一个合法结果。
pub fn classify(raw: &str) -> ParsedQrCode {
    let trimmed = trim_scanned(raw);
    let kind = detect_type(trimmed);
    log::trace!("分类结果: {} ({} 字符)", kind, trimmed.chars().count());
    ParsedQrCode {
        kind,
        content: trimmed.to_string(),
    }
}
