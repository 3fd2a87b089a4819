//! 输入槽 - 业务能力层
//!
//! 只负责"持有一张图片及其预览"能力，不关心请求流程

use crate::error::ValidationError;
use crate::infrastructure::{BlobStore, DisplayHandle};
use crate::models::image_file::ImageFile;
use std::fmt;
use tracing::{info, warn};

/// 输入槽编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotIndex {
    First,
    Second,
}

impl SlotIndex {
    pub const ALL: [SlotIndex; 2] = [SlotIndex::First, SlotIndex::Second];

    /// 数组下标（0 或 1）
    pub fn position(self) -> usize {
        match self {
            SlotIndex::First => 0,
            SlotIndex::Second => 1,
        }
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "图片 {}", self.position() + 1)
    }
}

/// 输入槽
///
/// 职责：
/// - 校验并持有用户选择的图片
/// - 为当前图片维护唯一的预览资源
/// - 替换图片前先释放旧预览
/// - 不认识请求状态，结果失效由编排器处理
pub struct InputSlot {
    index: SlotIndex,
    store: BlobStore,
    source: Option<ImageFile>,
    preview: Option<DisplayHandle>,
}

impl InputSlot {
    /// 创建空的输入槽
    pub fn new(index: SlotIndex, store: BlobStore) -> Self {
        Self {
            index,
            store,
            source: None,
            preview: None,
        }
    }

    /// 选择图片
    ///
    /// 媒体类型不在接受列表中时返回错误，输入槽保持不变
    pub fn select_file(&mut self, candidate: ImageFile) -> Result<(), ValidationError> {
        if !candidate.is_accepted() {
            warn!(
                "[{}] ⚠️ 拒绝文件 {}: 不支持的类型 {}",
                self.label(),
                candidate.name(),
                candidate.media_type()
            );
            return Err(ValidationError::UnsupportedMediaType {
                media_type: candidate.media_type().to_string(),
            });
        }

        if let Some(previous) = self.preview.take() {
            previous.release();
        }

        let preview = self
            .store
            .create(candidate.media_type(), candidate.shared_bytes());

        info!(
            "[{}] ✓ 已选择 {} ({}, {} 字节)",
            self.label(),
            candidate.name(),
            candidate.media_type(),
            candidate.len()
        );

        self.source = Some(candidate);
        self.preview = Some(preview);

        Ok(())
    }

    /// 清空输入槽；空槽上调用为空操作
    pub fn clear(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
        self.source = None;
    }

    /// 日志中使用的名称，例如 "图片 1"
    pub fn label(&self) -> String {
        self.index.to_string()
    }

    pub fn is_ready(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&ImageFile> {
        self.source.as_ref()
    }

    pub fn preview(&self) -> Option<&DisplayHandle> {
        self.preview.as_ref()
    }
}
