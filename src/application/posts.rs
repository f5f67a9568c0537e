//! Post publishing and retrieval.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::application::repos::{CreatePostParams, PostsRepo, PostsWriteRepo, RepoError};
use crate::application::sanitize;
use crate::domain::entities::PostRecord;
use crate::domain::feed::select_feed;
use crate::domain::slug::make_slug;

/// Total insert attempts per publish: the derived slug once, then up to four
/// random-suffix retries.
pub const MAX_SLUG_ATTEMPTS: usize = 5;

/// A post as submitted by the author, before slug derivation and sanitation.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub content: String,
    pub show_in_feed: bool,
    pub show_header: bool,
    pub comments_enabled: bool,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    RetryExhausted { base: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    sanitizer: ammonia::Builder<'static>,
}

impl PostService {
    pub fn new(reader: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self {
            reader,
            writer,
            sanitizer: sanitize::post_sanitizer(),
        }
    }

    /// Publish a new post.
    ///
    /// The body is sanitized, the slug derived from title and the current UTC
    /// instant, and the insert attempted. A duplicate-slug violation retries
    /// with `<slug>-<NN>` for a random two-digit `NN`, serially, up to
    /// [`MAX_SLUG_ATTEMPTS`] attempts in total. Any other failure aborts at
    /// once. The store's unique index is the real uniqueness guarantee; the
    /// retry is best-effort convenience on top of it.
    pub async fn publish(&self, new_post: NewPost) -> Result<PostRecord, PublishError> {
        let content = self.sanitizer.clean(&new_post.content).to_string();
        let created_at = OffsetDateTime::now_utc();
        let initial = make_slug(&new_post.title, created_at);

        let mut slug = initial.clone();
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let params = CreatePostParams {
                slug: slug.clone(),
                title: new_post.title.clone(),
                author: new_post.author.clone(),
                content: content.clone(),
                show_in_feed: new_post.show_in_feed,
                show_header: new_post.show_header,
                comments_enabled: new_post.comments_enabled,
                created_at,
            };

            match self.writer.create_post(params).await {
                Ok(post) => return Ok(post),
                Err(RepoError::Duplicate { ref constraint }) if constraint.contains("slug") => {
                    if attempt == MAX_SLUG_ATTEMPTS {
                        break;
                    }
                    let suffix: u32 = rand::rng().random_range(10..=99);
                    slug = format!("{initial}-{suffix}");
                    debug!(%slug, attempt, "slug collision, retrying with random suffix");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(PublishError::RetryExhausted { base: initial })
    }

    /// The home feed: visible, non-banned posts, pinned first, newest first.
    pub async fn feed(&self) -> Result<Vec<PostRecord>, RepoError> {
        let posts = self.reader.list_posts().await?;
        Ok(select_feed(posts))
    }

    /// Look up a post for public viewing. Banned posts are invisible here,
    /// indistinguishable from absent ones.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let post = self.reader.find_by_slug(slug).await?;
        Ok(post.filter(|post| !post.banned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repos::ImportPostParams;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct EmptyReader;

    #[async_trait]
    impl PostsRepo for EmptyReader {
        async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_by_slug(&self, _slug: &str) -> Result<Option<PostRecord>, RepoError> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<PostRecord>, RepoError> {
            Ok(None)
        }
    }

    /// Pops one scripted outcome per insert and records each attempted slug.
    struct ScriptedWriter {
        outcomes: Mutex<VecDeque<Result<(), RepoError>>>,
        attempted_slugs: Mutex<Vec<String>>,
    }

    impl ScriptedWriter {
        fn new(outcomes: Vec<Result<(), RepoError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                attempted_slugs: Mutex::new(Vec::new()),
            }
        }

        fn slug_duplicate() -> RepoError {
            RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            }
        }

        fn attempts(&self) -> Vec<String> {
            self.attempted_slugs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PostsWriteRepo for ScriptedWriter {
        async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
            self.attempted_slugs.lock().unwrap().push(params.slug.clone());
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra insert attempt");
            outcome.map(|()| PostRecord {
                id: Uuid::new_v4(),
                slug: params.slug,
                title: params.title,
                author: params.author,
                content: params.content,
                show_in_feed: params.show_in_feed,
                pinned: false,
                banned: false,
                show_header: params.show_header,
                comments_enabled: params.comments_enabled,
                created_at: params.created_at,
            })
        }

        async fn import_post(&self, _params: ImportPostParams) -> Result<PostRecord, RepoError> {
            unimplemented!("not exercised by publish tests")
        }
    }

    fn draft(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            author: "ada".to_string(),
            content: "body".to_string(),
            show_in_feed: true,
            show_header: true,
            comments_enabled: false,
        }
    }

    fn service(writer: Arc<ScriptedWriter>) -> PostService {
        PostService::new(Arc::new(EmptyReader), writer)
    }

    #[tokio::test]
    async fn publish_inserts_once_on_success() {
        let writer = Arc::new(ScriptedWriter::new(vec![Ok(())]));
        let post = service(writer.clone()).publish(draft("First Post")).await.unwrap();

        assert_eq!(writer.attempts().len(), 1);
        assert!(post.slug.starts_with("First-Post-"));
    }

    #[tokio::test]
    async fn slug_collision_retries_with_two_digit_suffix() {
        let writer = Arc::new(ScriptedWriter::new(vec![
            Err(ScriptedWriter::slug_duplicate()),
            Ok(()),
        ]));
        let post = service(writer.clone()).publish(draft("Twin Title")).await.unwrap();

        let attempts = writer.attempts();
        assert_eq!(attempts.len(), 2);

        let suffix = attempts[1]
            .strip_prefix(&format!("{}-", attempts[0]))
            .expect("retry slug extends the initial slug");
        let suffix: u32 = suffix.parse().expect("numeric suffix");
        assert!((10..=99).contains(&suffix));
        assert_eq!(post.slug, attempts[1]);
    }

    #[tokio::test]
    async fn non_duplicate_failure_aborts_without_retry() {
        let writer = Arc::new(ScriptedWriter::new(vec![Err(RepoError::Timeout)]));
        let result = service(writer.clone()).publish(draft("Unlucky")).await;

        assert!(matches!(result, Err(PublishError::Repo(RepoError::Timeout))));
        assert_eq!(writer.attempts().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_on_other_constraint_aborts_without_retry() {
        let writer = Arc::new(ScriptedWriter::new(vec![Err(RepoError::Duplicate {
            constraint: "posts_pkey".to_string(),
        })]));
        let result = service(writer.clone()).publish(draft("Keyed")).await;

        assert!(matches!(result, Err(PublishError::Repo(RepoError::Duplicate { .. }))));
        assert_eq!(writer.attempts().len(), 1);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let outcomes = (0..MAX_SLUG_ATTEMPTS)
            .map(|_| Err(ScriptedWriter::slug_duplicate()))
            .collect();
        let writer = Arc::new(ScriptedWriter::new(outcomes));
        let result = service(writer.clone()).publish(draft("Crowded")).await;

        assert!(matches!(result, Err(PublishError::RetryExhausted { .. })));
        assert_eq!(writer.attempts().len(), MAX_SLUG_ATTEMPTS);
    }

    #[tokio::test]
    async fn publish_sanitizes_content_before_insert() {
        let writer = Arc::new(ScriptedWriter::new(vec![Ok(())]));
        let mut new_post = draft("Careful");
        new_post.content = "fine <script>alert(1)</script> text".to_string();

        let post = service(writer).publish(new_post).await.unwrap();
        assert!(!post.content.contains("script"));
        assert!(post.content.contains("fine"));
    }

    #[tokio::test]
    async fn banned_posts_are_not_viewable_by_slug() {
        struct BannedReader;

        #[async_trait]
        impl PostsRepo for BannedReader {
            async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
                Ok(Vec::new())
            }

            async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
                Ok(Some(PostRecord {
                    id: Uuid::from_u128(7),
                    slug: slug.to_string(),
                    title: "Gone".to_string(),
                    author: "ada".to_string(),
                    content: "body".to_string(),
                    show_in_feed: true,
                    pinned: false,
                    banned: true,
                    show_header: true,
                    comments_enabled: false,
                    created_at: OffsetDateTime::UNIX_EPOCH,
                }))
            }

            async fn find_by_id(&self, _id: Uuid) -> Result<Option<PostRecord>, RepoError> {
                Ok(None)
            }
        }

        let writer = Arc::new(ScriptedWriter::new(Vec::new()));
        let service = PostService::new(Arc::new(BannedReader), writer);

        assert!(service.get_by_slug("gone-01-01-1970").await.unwrap().is_none());
    }
}
