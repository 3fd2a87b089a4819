use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::params::StitchParameters;
use crate::models::state::RequestState;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info。重复调用为空操作
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n全景拼接日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加一行，带时间戳
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 全景拼接客户端");
    info!("🌐 拼接服务: {}", config.stitch_endpoint());
    info!("⏱️ 请求超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 记录本次提交使用的参数
pub fn log_params(params: &StitchParameters) {
    let fields: Vec<String> = params
        .form_fields()
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    info!("📋 拼接参数: {}", fields.join(", "));
}

/// 打印最终结果
///
/// # 参数
/// - `state`: 最终请求状态
/// - `detail`: 成功时为输出文件路径，失败时为错误消息
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(state: RequestState, detail: &str, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 拼接完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    match state {
        RequestState::Succeeded => info!("✅ 成功: 结果已保存至 {}", detail),
        RequestState::Failed => info!("❌ 失败: {}", truncate_text(detail, 200)),
        other => info!("⚠️ 未完成: 最终状态为 {}", other),
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
