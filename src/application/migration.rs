//! One-time migration from the superseded local store to the database.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::repos::{ImportPostParams, LegacyStore, PostsWriteRepo, RepoError};
use crate::domain::entities::LegacyPostRecord;

impl From<LegacyPostRecord> for ImportPostParams {
    fn from(post: LegacyPostRecord) -> Self {
        Self {
            slug: post.slug,
            title: post.title,
            author: post.author,
            content: post.content,
            show_in_feed: post.show_in_feed,
            pinned: post.pinned,
            banned: post.banned,
            show_header: post.show_header,
            comments_enabled: post.comments_enabled,
            created_at: post.created_at,
        }
    }
}

pub struct MigrationService {
    legacy: Arc<dyn LegacyStore>,
    posts: Arc<dyn PostsWriteRepo>,
}

impl MigrationService {
    pub fn new(legacy: Arc<dyn LegacyStore>, posts: Arc<dyn PostsWriteRepo>) -> Self {
        Self { legacy, posts }
    }

    /// Import legacy posts into the database, once.
    ///
    /// Gated by the store's completion flag, so re-invoking after the first
    /// successful pass is a no-op. Within a pass, a duplicate slug means the
    /// record already made it across on an earlier interrupted run and is
    /// skipped; any other per-record failure is logged and skipped as well —
    /// one bad record never aborts the batch. The flag is set after all
    /// records have been attempted, partial failures included.
    pub async fn migrate_if_needed(&self) -> Result<(), RepoError> {
        if self.legacy.has_migrated().await? {
            debug!("legacy store already migrated");
            return Ok(());
        }

        let legacy_posts = self.legacy.load_posts().await?;
        if legacy_posts.is_empty() {
            debug!("no legacy posts to migrate");
            return Ok(());
        }

        let total = legacy_posts.len();
        let mut imported = 0usize;
        for legacy_post in legacy_posts {
            let slug = legacy_post.slug.clone();
            match self.posts.import_post(legacy_post.into()).await {
                Ok(_) => imported += 1,
                Err(RepoError::Duplicate { .. }) => {
                    debug!(%slug, "legacy post already present, skipping");
                }
                Err(error) => {
                    warn!(%slug, error = %error, "failed to import legacy post, skipping");
                }
            }
        }

        info!(imported, total, "legacy store migration finished");
        self.legacy.set_migrated().await
    }
}
