//! 展示层接口
//!
//! 编排器每次状态变化后把会话投影交给展示层；拼接成功后额外发出聚焦信号

use crate::models::state::{SessionView, ViewStatus};
use crate::utils::logging::truncate_text;
use tracing::{error, info};

/// 展示层
pub trait Presenter: Send {
    /// 渲染当前会话投影
    fn render(&mut self, view: &SessionView);

    /// 把拼接结果带到视野中（非必需的副作用）
    fn focus_result(&mut self, _url: &str) {}
}

/// 以日志形式输出状态的展示层，用于命令行
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn render(&mut self, view: &SessionView) {
        let selected = view.previews.iter().filter(|p| p.is_some()).count();
        match &view.status {
            ViewStatus::Idle => info!("状态: 空闲 (已选择 {}/2 张图片)", selected),
            ViewStatus::Loading => info!("⏳ 状态: 正在拼接..."),
            ViewStatus::Error(message) => error!("❌ 状态: 失败 - {}", truncate_text(message, 200)),
            ViewStatus::Success(result) => info!(
                "✅ 状态: 成功 - {} ({}, {} 字节)",
                result.url, result.media_type, result.len
            ),
        }
    }

    fn focus_result(&mut self, url: &str) {
        info!("📌 拼接结果已就绪: {}", url);
    }
}
