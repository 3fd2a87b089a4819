//! 可展示资源存储 - 基础设施层
//!
//! 持有所有可展示资源（预览图、拼接结果），只暴露"创建"与"释放"能力

use crate::models::state::ResourceView;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// 可展示资源存储
///
/// 职责：
/// - 为二进制图片分配可展示的资源地址（`blob:panorama/<id>`）
/// - 通过地址解析出图片数据，无需重新读取原始文件
/// - 不认识输入槽 / 请求状态
/// - 不决定何时释放，释放由 `DisplayHandle` 的所有者负责
#[derive(Clone, Default)]
pub struct BlobStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    next_id: u64,
    blobs: HashMap<u64, Blob>,
}

struct Blob {
    bytes: Arc<[u8]>,
}

const URL_PREFIX: &str = "blob:panorama/";

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个可展示资源，返回唯一所有权的句柄
    pub fn create(&self, media_type: impl Into<String>, bytes: Arc<[u8]>) -> DisplayHandle {
        let len = bytes.len();
        let id = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.blobs.insert(id, Blob { bytes });
            id
        };

        debug!("创建资源 {}{} ({} 字节)", URL_PREFIX, id, len);

        DisplayHandle {
            store: self.clone(),
            id,
            media_type: media_type.into(),
            len,
        }
    }

    /// 当前存活的资源数量
    pub fn live_count(&self) -> usize {
        self.lock().blobs.len()
    }

    /// 资源地址是否仍然有效
    pub fn contains(&self, url: &str) -> bool {
        parse_url(url).is_some_and(|id| self.lock().blobs.contains_key(&id))
    }

    /// 通过资源地址取得图片数据
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        let id = parse_url(url)?;
        self.lock().blobs.get(&id).map(|blob| Arc::clone(&blob.bytes))
    }

    /// 释放资源；未创建或已释放的资源为空操作
    fn revoke(&self, id: u64) -> bool {
        let removed = self.lock().blobs.remove(&id).is_some();
        if removed {
            debug!("释放资源 {}{}", URL_PREFIX, id);
        }
        removed
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStore")
            .field("live", &self.live_count())
            .finish()
    }
}

fn parse_url(url: &str) -> Option<u64> {
    url.strip_prefix(URL_PREFIX)?.parse().ok()
}

/// 可展示资源句柄
///
/// 每个资源只有一个句柄。句柄被替换、显式释放或随所有者析构时，资源被释放且只释放一次
pub struct DisplayHandle {
    store: BlobStore,
    id: u64,
    media_type: String,
    len: usize,
}

impl DisplayHandle {
    pub fn url(&self) -> String {
        format!("{}{}", URL_PREFIX, self.id)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// 读取资源数据
    pub fn bytes(&self) -> Option<Arc<[u8]>> {
        self.store.resolve(&self.url())
    }

    pub fn view(&self) -> ResourceView {
        ResourceView {
            url: self.url(),
            media_type: self.media_type.clone(),
            len: self.len,
        }
    }

    /// 显式释放
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.store.revoke(self.id);
    }
}

impl fmt::Debug for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayHandle")
            .field("url", &self.url())
            .field("media_type", &self.media_type)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(data: &[u8]) -> Arc<[u8]> {
        Arc::from(data.to_vec())
    }

    #[test]
    fn test_create_and_resolve() {
        let store = BlobStore::new();
        let handle = store.create("image/png", bytes(b"png-data"));

        assert_eq!(store.live_count(), 1);
        assert!(store.contains(&handle.url()));
        assert_eq!(handle.bytes().as_deref(), Some(&b"png-data"[..]));
        assert_eq!(handle.view().media_type, "image/png");
        assert_eq!(handle.view().len, 8);
    }

    #[test]
    fn test_release_and_drop_free_exactly_once() {
        let store = BlobStore::new();
        let first = store.create("image/jpeg", bytes(b"a"));
        let second = store.create("image/jpeg", bytes(b"b"));
        let first_url = first.url();
        assert_ne!(first_url, second.url());

        first.release();
        assert_eq!(store.live_count(), 1);
        assert!(!store.contains(&first_url));
        assert!(store.resolve(&first_url).is_none());

        drop(second);
        assert_eq!(store.live_count(), 0);

        // 已释放的 id 再次释放为空操作
        assert!(!store.revoke(1));
        assert!(!store.revoke(42));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let store = BlobStore::new();
        let url = store.create("image/png", bytes(b"x")).url();
        let next = store.create("image/png", bytes(b"y"));
        assert_ne!(url, next.url());
    }

    #[test]
    fn test_foreign_urls_do_not_resolve() {
        let store = BlobStore::new();
        let _handle = store.create("image/png", bytes(b"x"));
        assert!(!store.contains("blob:other/1"));
        assert!(!store.contains("blob:panorama/abc"));
        assert!(store.resolve("https://example.com/1").is_none());
    }
}
