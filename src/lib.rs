//! # Panorama Client
//!
//! 全景拼接客户端：提交两张图片和算法参数到远程拼接服务，取回拼接结果
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（可展示资源），只暴露能力
//! - `BlobStore` - 唯一的资源宿主，提供创建/释放能力
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"，只处理单个对象
//! - `InputSlot` - 校验并持有一张图片及其预览
//! - `response_decoder` - 把服务响应解释为图片或错误消息
//! - `ResultWriter` - 写结果文件能力
//! - `clients/` - `StitchService` trait 与 HTTP 实现
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次请求"的完整处理流程
//! - `StitchCtx` - 上下文封装（请求代号 + 文件名）
//! - `StitchFlow` - 流程编排（调用 → 解码 → 归一化错误 → 回传结果）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 拼接会话状态机，管理资源和单次在途
//! - `orchestrator/app` - 命令行应用
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{HttpStitchClient, StitchPayload, StitchReply, StitchService};
pub use config::Config;
pub use error::{AppError, AppResult, StitchError, ValidationError};
pub use infrastructure::{BlobStore, DisplayHandle};
pub use models::{ImageFile, RequestState, SessionView, StitchParameters, ViewStatus};
pub use orchestrator::{App, Disposition, ErrorRecord, StitchSession};
pub use services::{Presenter, SlotIndex};
pub use workflow::{Completion, StitchCtx, StitchFlow, StitchOutcome};
