//! 命令行应用 - 编排层
//!
//! ## 职责
//!
//! 本模块是命令行入口，驱动一个拼接会话完成一次拼接：
//!
//! 1. **应用初始化**：日志文件、拼接参数、HTTP 客户端、会话
//! 2. **加载图片**：从磁盘读取两张图片并放入输入槽
//! 3. **提交请求**：提交并等待唯一的结果
//! 4. **保存结果**：成功时把结果写入输出文件
//! 5. **结果统计**：输出最终状态并写入日志文件

use crate::clients::HttpStitchClient;
use crate::config::Config;
use crate::models::{load_image_file, load_params, RequestState, StitchParameters};
use crate::orchestrator::session::StitchSession;
use crate::services::{ResultWriter, SlotIndex};
use crate::utils::logging::{
    append_log_line, init_log_file, log_params, log_startup, print_final_stats,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    images: [PathBuf; 2],
    session: StitchSession,
    writer: ResultWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config, image1: PathBuf, image2: PathBuf) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(&config);

        let params = match &config.params_file {
            Some(path) => load_params(Path::new(path)).await?,
            None => StitchParameters::default(),
        };

        let client = HttpStitchClient::new(&config)?;
        let mut session = StitchSession::new(Arc::new(client));
        session.set_params(params);

        Ok(Self {
            writer: ResultWriter::with_path(&config.output_file),
            config,
            images: [image1, image2],
            session,
        })
    }

    /// 运行应用主逻辑，返回最终请求状态
    pub async fn run(&mut self) -> Result<RequestState> {
        self.load_images().await?;

        log_params(self.session.params());

        let state = self.session.submit_and_wait().await;

        let detail = match state {
            RequestState::Succeeded => self.save_output().await?,
            RequestState::Failed => self
                .session
                .error()
                .map(|record| record.message.clone())
                .unwrap_or_default(),
            other => {
                warn!("⚠️ 请求未完成，当前状态: {}", other);
                String::new()
            }
        };

        if let Err(e) = append_log_line(
            &self.config.output_log_file,
            &format!("状态: {} | {}", state, detail),
        ) {
            warn!("写入日志文件失败: {}", e);
        }

        print_final_stats(state, &detail, &self.config.output_log_file);

        Ok(state)
    }

    /// 读取两张图片并放入输入槽
    async fn load_images(&mut self) -> Result<()> {
        info!("\n📁 正在读取图片...");

        for slot in SlotIndex::ALL {
            let path = &self.images[slot.position()];
            let file = load_image_file(path).await?;
            self.session
                .select_file(slot, file)
                .with_context(|| format!("{} 无法使用: {}", slot, path.display()))?;
        }

        Ok(())
    }

    /// 保存拼接结果，返回输出文件路径
    async fn save_output(&self) -> Result<String> {
        let output = self
            .session
            .output()
            .context("成功状态下缺少拼接结果")?;

        match self.writer.write(output).await {
            Ok(written) => {
                info!("💾 已写入 {} 字节", written);
                Ok(self.writer.output_path().display().to_string())
            }
            Err(e) => {
                error!("❌ 保存结果失败: {}", e);
                Err(e.into())
            }
        }
    }
}
