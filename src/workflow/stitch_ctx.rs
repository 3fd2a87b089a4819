//! 拼接请求上下文
//!
//! 封装"这是第几代请求、拼的是哪两张图"这一信息

use std::fmt::Display;

/// 拼接请求上下文
///
/// `generation` 单调递增，用于识别并丢弃过期的响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchCtx {
    /// 请求代号
    pub generation: u64,

    /// 图片 1 文件名（仅用于日志显示）
    pub image1: String,

    /// 图片 2 文件名（仅用于日志显示）
    pub image2: String,
}

impl StitchCtx {
    /// 创建新的请求上下文
    pub fn new(generation: u64, image1: impl Into<String>, image2: impl Into<String>) -> Self {
        Self {
            generation,
            image1: image1.into(),
            image2: image2.into(),
        }
    }
}

impl Display for StitchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[请求 #{}]", self.generation)
    }
}
