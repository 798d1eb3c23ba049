//! 字段提取子模块
//!
//! # 设计思路
//!
//! 按类型把内容拆成命名字段，供展示层渲染预览、拼装平台动作。
//! 提取是容错的：任何字段未命中都得到空字符串，函数本身永不失败。
//!
//! # 实现思路
//!
//! - 每种格式写成一组具名正则规则，通过 `once_cell::sync::Lazy` 首次使用时编译。
//! - vCard 与 meCard 的分隔规则不同，分成两组规则：
//!   vCard 属性以换行（真实换行或字面 `\n` 转义）结束，meCard 字段以 `;` 结束。
//! - meCard 先按未转义的 `;` 切成字段，再按字段名取值。
//! - GEO / PHONE / EMAIL 的地址部分只做前缀剥离与切分，不做数值或编码校验。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::QrCodeType;

/// 按类型拆解后的结构化字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ParsedFields {
    Url {
        url: String,
    },
    Wifi {
        ssid: String,
        password: String,
        #[serde(rename = "securityType")]
        security_type: String,
    },
    Contact {
        name: String,
        phone: String,
        email: String,
    },
    Geo {
        latitude: String,
        longitude: String,
    },
    Sms {
        phone: String,
        message: String,
    },
    Phone {
        phone: String,
    },
    Email {
        email: String,
        subject: String,
        body: String,
    },
    /// TEXT、OTHER 以及任何兜底情况
    Text {
        text: String,
    },
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("内置提取规则必须是合法正则")
}

// WIFI:S:<ssid>;T:<WPA|WEP|nopass>;P:<password>;;
static WIFI_SSID: Lazy<Regex> = Lazy::new(|| compile(r"S:(.*?);"));
static WIFI_SECURITY: Lazy<Regex> = Lazy::new(|| compile(r"T:(.*?);"));
static WIFI_PASSWORD: Lazy<Regex> = Lazy::new(|| compile(r"P:(.*?);"));

/// vCard 属性：位于文本开头或换行之后，可带 `;TYPE=...` 参数，
/// 值截止到真实换行、字面 `\n` 转义或文本结尾。
fn vcard_property(name: &str) -> Regex {
    compile(&format!(
        r"(?:^|\n|\\n){name}(?:;[^:\r\n]*)?:(.*?)(?:\r?\n|\\n|$)"
    ))
}

static VCARD_FN: Lazy<Regex> = Lazy::new(|| vcard_property("FN"));
static VCARD_N: Lazy<Regex> = Lazy::new(|| vcard_property("N"));
static VCARD_TEL: Lazy<Regex> = Lazy::new(|| vcard_property("TEL"));
static VCARD_EMAIL: Lazy<Regex> = Lazy::new(|| vcard_property("EMAIL"));

/// meCard 字段切分：以未转义的 `;` 为界，`\;` 等转义留在字段内部
static MECARD_TOKEN: Lazy<Regex> = Lazy::new(|| compile(r"(?:\\.|[^;\\])+"));

static SMS_PHONE: Lazy<Regex> = Lazy::new(|| compile(r"sms:(.*?):"));

static EMAIL_SUBJECT: Lazy<Regex> = Lazy::new(|| compile(r"subject=(.*?)(?:&|$)"));
static EMAIL_BODY: Lazy<Regex> = Lazy::new(|| compile(r"body=(.*?)(?:&|$)"));

const MECARD_PREFIX: &str = "MECARD:";

/// 取第一个捕获组，未命中时返回空串
fn capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn strip<'a>(content: &'a str, prefix: &str) -> &'a str {
    content.strip_prefix(prefix).unwrap_or(content)
}

fn unescape_mecard(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn extract_wifi(content: &str) -> ParsedFields {
    ParsedFields::Wifi {
        ssid: capture(&WIFI_SSID, content),
        password: capture(&WIFI_PASSWORD, content),
        security_type: capture(&WIFI_SECURITY, content),
    }
}

fn extract_vcard(content: &str) -> ParsedFields {
    let mut name = capture(&VCARD_FN, content);
    if name.is_empty() {
        name = capture(&VCARD_N, content);
    }
    ParsedFields::Contact {
        name,
        phone: capture(&VCARD_TEL, content),
        email: capture(&VCARD_EMAIL, content),
    }
}

/// 取第一个名为 `name` 的 meCard 字段值并去转义
fn mecard_field(body: &str, name: &str) -> String {
    MECARD_TOKEN
        .find_iter(body)
        .filter_map(|token| token.as_str().split_once(':'))
        .find(|(field, _)| *field == name)
        .map(|(_, value)| unescape_mecard(value))
        .unwrap_or_default()
}

fn extract_mecard(content: &str) -> ParsedFields {
    let body = strip(content, MECARD_PREFIX);
    ParsedFields::Contact {
        name: mecard_field(body, "N"),
        phone: mecard_field(body, "TEL"),
        email: mecard_field(body, "EMAIL"),
    }
}

fn extract_contact(content: &str) -> ParsedFields {
    if content.starts_with(MECARD_PREFIX) {
        extract_mecard(content)
    } else {
        extract_vcard(content)
    }
}

fn extract_geo(content: &str) -> ParsedFields {
    let coords = strip(content, "geo:");
    // 只取前两段，RFC 5870 的海拔等后续分量丢弃
    let mut parts = coords.split(',');
    let latitude = parts.next().unwrap_or_default();
    let longitude = parts.next().unwrap_or_default();
    ParsedFields::Geo {
        latitude: latitude.to_string(),
        longitude: longitude.to_string(),
    }
}

fn extract_sms(content: &str) -> ParsedFields {
    // sms:<phone>:<message>，消息内的冒号原样保留
    let message = content.splitn(3, ':').nth(2).unwrap_or_default();
    ParsedFields::Sms {
        phone: capture(&SMS_PHONE, content),
        message: message.to_string(),
    }
}

fn extract_email(content: &str) -> ParsedFields {
    let address = strip(content, "mailto:").split('?').next().unwrap_or_default();
    ParsedFields::Email {
        email: address.to_string(),
        subject: capture(&EMAIL_SUBJECT, content),
        body: capture(&EMAIL_BODY, content),
    }
}

/// 按类型拆解内容
///
/// # 参数
/// * `content` - 分类后的内容（已去首尾空白）
/// * `kind` - 分类得到的类型
///
/// # 返回
/// 与类型对应的 `ParsedFields` 变体；未命中的字段为空串。
/// 百分号编码不做解码，那是展示层的事。
pub fn extract_fields(content: &str, kind: QrCodeType) -> ParsedFields {
    match kind {
        QrCodeType::Url => ParsedFields::Url { url: content.to_string() },
        QrCodeType::Wifi => extract_wifi(content),
        QrCodeType::Contact => extract_contact(content),
        QrCodeType::Geo => extract_geo(content),
        QrCodeType::Sms => extract_sms(content),
        QrCodeType::Phone => ParsedFields::Phone { phone: strip(content, "tel:").to_string() },
        QrCodeType::Email => extract_email(content),
        QrCodeType::Text | QrCodeType::Other => ParsedFields::Text { text: content.to_string() },
    }
}
