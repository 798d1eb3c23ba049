//! # 二维码扫描工具 — 命令行入口
//!
//! 本文件仅负责日志初始化与命令分发，业务逻辑见 `lib.rs` 架构文档。
//!
//! ```text
//! qr-scanner classify <text>
//! qr-scanner extract <text>
//! qr-scanner scan <text>
//! qr-scanner history [query]
//! qr-scanner delete <id>
//! qr-scanner clear
//! qr-scanner db-dir [dir]
//! ```

use std::process::ExitCode;

use serde::Serialize;

use qr_scanner::db::{self, config, NewScan};
use qr_scanner::display::{format_date, to_pretty_json, truncate_text};
use qr_scanner::error::AppError;
use qr_scanner::qr::{self, ParsedFields, QrCodeType};

const USAGE: &str = "用法: qr-scanner <classify|extract|scan|history|delete|clear|db-dir> [参数]";
const PREVIEW_LEN: usize = 100;

#[derive(Serialize)]
struct Extracted {
    #[serde(rename = "type")]
    kind: QrCodeType,
    content: String,
    fields: ParsedFields,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}

fn required<'a>(arg: Option<&'a String>, what: &str) -> Result<&'a str, String> {
    arg.map(String::as_str).ok_or_else(|| format!("缺少参数 <{what}>\n{USAGE}"))
}

fn run(args: &[String]) -> Result<(), String> {
    let command = args.first().map(String::as_str).unwrap_or_default();
    let data_dir = config::data_dir();

    let result = match command {
        "classify" => {
            let raw = required(args.get(1), "text")?;
            print_json(&qr::classify(raw))
        }
        "extract" => {
            let parsed = qr::classify(required(args.get(1), "text")?);
            let fields = parsed.fields();
            print_json(&Extracted { kind: parsed.kind, content: parsed.content, fields })
        }
        "scan" => {
            let parsed = qr::classify(required(args.get(1), "text")?);
            db::open_history_store(&data_dir)
                .and_then(|store| store.append(NewScan::now(&parsed)))
                .and_then(|item| print_json(&item))
        }
        "history" => db::open_history_store(&data_dir).map(|store| {
            let items = match args.get(1) {
                Some(query) => store.search(query),
                None => store.list(),
            };
            for item in &items {
                println!(
                    "{}  {:<7}  {}  {}",
                    item.id,
                    item.kind,
                    format_date(item.timestamp),
                    truncate_text(&item.content, PREVIEW_LEN).replace('\n', " ")
                );
            }
            log::info!("共 {} 条记录", items.len());
        }),
        "delete" => {
            let id = required(args.get(1), "id")?;
            db::open_history_store(&data_dir).and_then(|store| store.delete_by_id(id))
        }
        "clear" => db::open_history_store(&data_dir).and_then(|store| store.clear()),
        "db-dir" => match args.get(1) {
            Some(dir) => {
                let mut cfg = config::load_config(&data_dir);
                cfg.db_dir = Some(dir.clone()).filter(|d| !d.is_empty());
                config::save_config(&data_dir, &cfg)
            }
            None => config::resolve_db_path(&data_dir).map(|path| println!("{}", path.display())),
        },
        _ => return Err(USAGE.to_string()),
    };

    result.map_err(|err| serde_json::json!({ "error": err }).to_string())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
