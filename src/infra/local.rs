//! The on-disk store left behind by the local-only era of the app.
//!
//! Two slots in one directory: `blog_posts.json` holding the serialized post
//! list in the legacy camelCase shape, and a `has_migrated` flag file. The
//! store is read-mostly: the only write this codebase performs is setting
//! the flag once migration has run.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

use crate::application::repos::{LegacyStore, RepoError};
use crate::domain::entities::LegacyPostRecord;

const POSTS_FILE: &str = "blog_posts.json";
const MIGRATED_FLAG_FILE: &str = "has_migrated";

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("legacy posts blob could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The serialized post list; a missing blob means the local-only era
    /// never ran here and reads as empty.
    pub async fn load_posts(&self) -> Result<Vec<LegacyPostRecord>, LocalStoreError> {
        let path = self.root.join(POSTS_FILE);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn has_migrated(&self) -> Result<bool, LocalStoreError> {
        match fs::read_to_string(self.root.join(MIGRATED_FLAG_FILE)).await {
            Ok(raw) => Ok(raw.trim() == "true"),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn set_migrated(&self) -> Result<(), LocalStoreError> {
        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(MIGRATED_FLAG_FILE), b"true").await?;
        Ok(())
    }
}

#[async_trait]
impl LegacyStore for LocalStore {
    async fn load_posts(&self) -> Result<Vec<LegacyPostRecord>, RepoError> {
        LocalStore::load_posts(self)
            .await
            .map_err(RepoError::from_persistence)
    }

    async fn has_migrated(&self) -> Result<bool, RepoError> {
        LocalStore::has_migrated(self)
            .await
            .map_err(RepoError::from_persistence)
    }

    async fn set_migrated(&self) -> Result<(), RepoError> {
        LocalStore::set_migrated(self)
            .await
            .map_err(RepoError::from_persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    // The exact shape the browser-era code wrote to its storage slot.
    const LEGACY_BLOB: &str = r#"[
        {
            "id": "post_1709640000000",
            "title": "Hello, World! 🎉",
            "author": "ada",
            "content": "first post",
            "showInFeed": true,
            "createdAt": "2024-03-05T12:00:00.000Z",
            "slug": "Hello-World-05-03-2024"
        },
        {
            "id": "post_1709726400000",
            "title": "Second",
            "author": "ada",
            "content": "more",
            "showInFeed": false,
            "createdAt": "2024-03-06T12:00:00.000Z",
            "slug": "Second-06-03-2024",
            "pinned": true,
            "commentsEnabled": true
        }
    ]"#;

    #[tokio::test]
    async fn decodes_the_legacy_camel_case_blob() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(POSTS_FILE), LEGACY_BLOB)
            .await
            .unwrap();

        let store = LocalStore::new(dir.path());
        let posts = store.load_posts().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "Hello-World-05-03-2024");
        assert_eq!(posts[0].created_at, datetime!(2024-03-05 12:00 UTC));
        assert!(posts[0].show_header, "absent toggle defaults on");
        assert!(!posts[0].comments_enabled, "absent toggle defaults off");
        assert!(posts[1].pinned);
        assert!(posts[1].comments_enabled);
    }

    #[tokio::test]
    async fn missing_blob_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.load_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_blob_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(POSTS_FILE), "{not json")
            .await
            .unwrap();

        let store = LocalStore::new(dir.path());
        assert!(matches!(
            store.load_posts().await,
            Err(LocalStoreError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn migration_flag_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("nested"));

        assert!(!store.has_migrated().await.unwrap());
        store.set_migrated().await.unwrap();
        assert!(store.has_migrated().await.unwrap());
    }
}
