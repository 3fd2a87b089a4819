//! 结果写入服务 - 业务能力层
//!
//! 只负责"把拼接结果保存到磁盘"能力，不关心流程

use crate::error::{AppError, AppResult};
use crate::infrastructure::DisplayHandle;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 结果写入服务
///
/// 职责：
/// - 将拼接结果资源的数据写入文件
/// - 不持有结果资源，只借用句柄读取数据
pub struct ResultWriter {
    output_path: PathBuf,
}

impl ResultWriter {
    /// 使用默认文件名创建
    pub fn new() -> Self {
        Self {
            output_path: PathBuf::from("stitched.jpg"),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// 写入拼接结果
    ///
    /// # 参数
    /// - `result`: 拼接结果资源
    ///
    /// # 返回
    /// 返回写入的字节数
    pub async fn write(&self, result: &DisplayHandle) -> AppResult<usize> {
        let path = self.output_path.display().to_string();
        let bytes = result.bytes().ok_or_else(|| {
            AppError::Other(format!("结果资源 {} 已被释放", result.url()))
        })?;

        debug!(
            "写入结果: {} | {} | {} 字节",
            path,
            result.media_type(),
            bytes.len()
        );

        fs::write(&self.output_path, &bytes)
            .await
            .map_err(|e| AppError::file_write_failed(&path, e))?;

        Ok(bytes.len())
    }
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::BlobStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_write_result_to_disk() {
        let store = BlobStore::new();
        let handle = store.create("image/jpeg", Arc::from(b"panorama".to_vec()));
        let path = std::env::temp_dir().join(format!("panorama_client_{}_out.jpg", std::process::id()));
        let writer = ResultWriter::with_path(&path);

        let written = writer.write(&handle).await.unwrap();

        assert_eq!(written, 8);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"panorama");
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_fails() {
        let store = BlobStore::new();
        let handle = store.create("image/jpeg", Arc::from(b"x".to_vec()));
        let writer = ResultWriter::with_path("/definitely/not/here/out.jpg");

        match writer.write(&handle).await {
            Err(AppError::File(_)) => {}
            other => panic!("应该返回文件错误: {:?}", other),
        }
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(ResultWriter::default().output_path(), Path::new("stitched.jpg"));
    }
}
