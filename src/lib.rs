//! # 二维码扫描工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        外部协作方（相机解码、界面渲染、系统动作）         │
//! └───────┬──────────────────────────────┬───────────────────┘
//!         │ 原始文本                      │ 展示 / 删除 / 清空
//! ┌───────┼──────────────────────────────┼───────────────────┐
//! │       ↓            核心 (Rust)        ↓                   │
//! │                                                          │
//! │  ┌─ qr ────────── 前缀分类 + 字段提取（纯函数）          │
//! │  │   ├─ classify   有序前缀规则 → QrCodeType             │
//! │  │   └─ extract    具名正则规则 → ParsedFields           │
//! │  │                                                       │
//! │  ├─ db ────────── 扫描历史（单 key 序列化列表）          │
//! │  │   ├─ history    追加 / 列出 / 搜索 / 删除 / 清空      │
//! │  │   ├─ slot       KvSlot: SQLite / 内存                 │
//! │  │   ├─ schema     kv 表 + user_version                  │
//! │  │   └─ config     config.json → 数据库路径              │
//! │  │                                                       │
//! │  ├─ display        截断文本、友好时间                     │
//! │  └─ error ──────── AppError (统一错误类型)               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，存储相关操作的返回类型 |
//! | [`qr`] | 扫描内容分类与按类型的字段提取 |
//! | [`db`] | 扫描历史的持久化、配置与 schema |
//! | [`display`] | 历史列表的文本截断与时间格式化 |

pub mod error;
pub mod db;
pub mod display;
pub mod qr;
