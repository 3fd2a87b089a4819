//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责会话状态与请求调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `session` - 拼接会话
//! - 独占两个输入槽、算法参数、请求状态、结果资源和错误记录
//! - 保证同一时刻最多一个请求在途
//! - 用请求代号丢弃过期结果
//! - 每次状态变化后通知展示层
//!
//! ### `app` - 命令行应用
//! - 加载配置、参数和图片
//! - 驱动会话完成一次拼接
//! - 保存结果并输出统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (命令行)
//!     ↓
//! session (状态机)
//!     ↓
//! workflow::StitchFlow (处理单次请求)
//!     ↓
//! services / clients (能力层：输入槽 / 响应解码 / HTTP)
//!     ↓
//! infrastructure (基础设施：BlobStore)
//! ```

pub mod app;
pub mod session;

// 重新导出主要类型
pub use app::App;
pub use session::{Disposition, ErrorRecord, StitchSession};
