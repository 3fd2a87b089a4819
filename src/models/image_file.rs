//! 用户选择的图片文件

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// 输入槽接受的媒体类型
pub const ACCEPTED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/jpg", "image/webp"];

/// 图片文件
///
/// 内容为只读共享字节，克隆不会复制图片数据
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: Arc::from(bytes.into()),
        }
    }

    /// 文件名（用于 multipart 的 filename）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 声明的媒体类型
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 媒体类型是否在接受列表中（忽略大小写和参数部分）
    pub fn is_accepted(&self) -> bool {
        let essence = self
            .media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        ACCEPTED_MEDIA_TYPES.contains(&essence.as_str())
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// 根据扩展名推断媒体类型
///
/// 未知扩展名返回 `application/octet-stream`，由输入槽负责拒绝
pub fn media_type_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
