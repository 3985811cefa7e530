//! # scan-inspector
//!
//! 加载扫描配置，对内置演示类型执行约定扫描，并打印得到的服务注册表。

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use di_scanning::{Assembly, ScanProfile, ServiceCollection, ServiceProvider};
use infrastructure_common::{registered_crates, Lifetime};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod demo;

/// 未指定配置文件时使用的内置配置
const DEFAULT_PROFILE: &str = include_str!("../config/scan.toml");

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "scan-inspector")]
#[command(about = "按扫描配置注册服务并打印注册表")]
struct Args {
    /// 扫描配置文件路径（TOML 或 JSON），缺省时使用内置配置
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// 日志级别，`RUST_LOG` 优先
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 输出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// 只列出全局类型目录中的类型描述符
    #[arg(long)]
    list_types: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// 注册表中的一行
#[derive(Debug, Serialize)]
struct Row {
    service_type: String,
    implementation: String,
    lifetime: Lifetime,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if args.list_types {
        list_types();
        return Ok(());
    }

    let profile = load_profile(&args)?;
    info!("扫描配置包含 {} 个扫描定义", profile.scans.len());

    let mut services = ServiceCollection::new();
    let added = profile
        .apply_registered(&mut services)
        .context("应用扫描配置失败")?;
    debug!("扫描新增 {} 条注册", added);

    let provider = services
        .build_service_provider()
        .context("构建服务提供者失败")?;

    let rows = rows(&provider);
    match args.format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows).context("序列化注册表失败")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// 加载扫描配置
fn load_profile(args: &Args) -> Result<ScanProfile> {
    match &args.profile {
        Some(path) => {
            info!("加载扫描配置: {}", path.display());
            ScanProfile::load(path)
                .with_context(|| format!("加载扫描配置 {} 失败", path.display()))
        }
        None => {
            info!("使用内置扫描配置");
            ScanProfile::from_toml_str(DEFAULT_PROFILE).context("内置扫描配置无效")
        }
    }
}

/// 按程序集列出全局类型目录的内容
fn list_types() {
    for name in registered_crates() {
        let assembly = Assembly::named(name);
        println!("[{}] {} 个类型", assembly.name(), assembly.len());
        for descriptor in assembly.types() {
            println!("  {descriptor}");
        }
    }
}

fn rows(provider: &ServiceProvider) -> Vec<Row> {
    provider
        .descriptors()
        .iter()
        .map(|descriptor| Row {
            service_type: descriptor.service_type.to_string(),
            implementation: descriptor.implementation.to_string(),
            lifetime: descriptor.lifetime,
        })
        .collect()
}

fn print_table(rows: &[Row]) {
    const HEADERS: [&str; 3] = ["service_type", "implementation", "lifetime"];

    let service_width = rows
        .iter()
        .map(|row| row.service_type.len())
        .chain([HEADERS[0].len()])
        .max()
        .unwrap_or_default();
    let implementation_width = rows
        .iter()
        .map(|row| row.implementation.len())
        .chain([HEADERS[1].len()])
        .max()
        .unwrap_or_default();

    println!(
        "{:<service_width$} | {:<implementation_width$} | {}",
        HEADERS[0], HEADERS[1], HEADERS[2]
    );
    println!(
        "{}-+-{}-+-{}",
        "-".repeat(service_width),
        "-".repeat(implementation_width),
        "-".repeat(HEADERS[2].len())
    );
    for row in rows {
        println!(
            "{:<service_width$} | {:<implementation_width$} | {}",
            row.service_type, row.implementation, row.lifetime
        );
    }
    println!("共 {} 条注册", rows.len());
}
