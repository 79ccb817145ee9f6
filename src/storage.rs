use std::path::PathBuf;

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;

/// Where uploaded product images live. Behind a trait so handlers and tests
/// never touch the filesystem directly.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes) -> anyhow::Result<()>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
}

/// Disk-backed storage rooted at the configured upload directory.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub async fn new(root: &str) -> anyhow::Result<Self> {
        let root = PathBuf::from(root);
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }

    fn resolve(&self, key: &str) -> anyhow::Result<PathBuf> {
        // Keys are server-generated, but refuse anything that could escape
        // the upload root.
        anyhow::ensure!(
            !key.contains("..") && !key.starts_with('/'),
            "invalid storage key: {key}"
        );
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(&self, key: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.resolve(key)?;
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        let path = self.resolve(key)?;
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("remove {}", path.display()))?;
        Ok(())
    }
}

pub fn ext_from_mime(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_delete_roundtrip() {
        let dir = std::env::temp_dir().join(format!("storefront-test-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(dir.to_str().unwrap())
            .await
            .expect("create storage");

        storage
            .put_object("img.jpg", Bytes::from_static(b"jpeg-bytes"))
            .await
            .expect("put");
        let on_disk = tokio::fs::read(dir.join("img.jpg")).await.expect("read back");
        assert_eq!(on_disk, b"jpeg-bytes");

        storage.delete_object("img.jpg").await.expect("delete");
        assert!(tokio::fs::metadata(dir.join("img.jpg")).await.is_err());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let dir = std::env::temp_dir().join(format!("storefront-test-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(dir.to_str().unwrap())
            .await
            .expect("create storage");

        let err = storage
            .put_object("../outside.jpg", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid storage key"));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[test]
    fn only_jpeg_and_png_map_to_extensions() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("application/pdf"), None);
    }
}
