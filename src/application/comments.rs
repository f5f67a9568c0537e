//! Comments and abuse reports, scoped to a post.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::application::repos::{
    CommentsRepo, CreateAbuseReportParams, CreateCommentParams, PostsRepo, RepoError, ReportsRepo,
};
use crate::domain::entities::CommentRecord;

pub struct CommentService {
    posts: Arc<dyn PostsRepo>,
    comments: Arc<dyn CommentsRepo>,
    reports: Arc<dyn ReportsRepo>,
}

impl CommentService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        comments: Arc<dyn CommentsRepo>,
        reports: Arc<dyn ReportsRepo>,
    ) -> Self {
        Self {
            posts,
            comments,
            reports,
        }
    }

    /// Append a comment to a post. Unknown and banned posts both come back
    /// as [`RepoError::NotFound`]; field presence is the caller's concern.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_name: String,
        content: String,
    ) -> Result<CommentRecord, RepoError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(RepoError::NotFound)?;
        if post.banned {
            return Err(RepoError::NotFound);
        }

        self.comments
            .create_comment(CreateCommentParams {
                post_id,
                author_name,
                content,
            })
            .await
    }

    /// Comments for a post in creation order, oldest first. Empty — never an
    /// error — when the post is unknown, banned, or has comments disabled.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        match self.posts.find_by_id(post_id).await? {
            Some(post) if post.comments_enabled && !post.banned => {
                self.comments.list_comments(post_id).await
            }
            _ => Ok(Vec::new()),
        }
    }

    /// File an abuse report. Failure degrades to `false` so the caller can
    /// show a retryable notice; it is never raised as a hard error.
    pub async fn submit_abuse_report(
        &self,
        post_id: Uuid,
        reporter_name: String,
        details: String,
    ) -> bool {
        let params = CreateAbuseReportParams {
            post_id,
            reporter_name,
            details,
        };

        match self.reports.create_report(params).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%post_id, error = %error, "failed to submit abuse report");
                false
            }
        }
    }
}
