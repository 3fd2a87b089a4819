use crate::models::image_file::{media_type_from_path, ImageFile};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从磁盘读取图片文件，媒体类型根据扩展名推断
pub async fn load_image_file(path: &Path) -> Result<ImageFile> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("无法读取图片文件: {}", path.display()))?;

    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    let media_type = media_type_from_path(path);
    tracing::debug!("读取图片 {} ({}, {} 字节)", name, media_type, bytes.len());

    let file = ImageFile::new(name, media_type, bytes);
    if file.is_empty() {
        tracing::warn!("⚠️ 图片文件为空: {}", path.display());
    }

    Ok(file)
}
