use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, ImportPostParams, PostsRepo, PostsWriteRepo, RepoError,
};
use crate::domain::entities::PostRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    slug: String,
    title: String,
    author: String,
    content: String,
    show_in_feed: bool,
    pinned: bool,
    banned: bool,
    show_header: bool,
    comments_enabled: bool,
    created_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            author: row.author,
            content: row.content,
            show_in_feed: row.show_in_feed,
            pinned: row.pinned,
            banned: row.banned,
            show_header: row.show_header,
            comments_enabled: row.comments_enabled,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let rows = sqlx::query_as::<_, PostRow>(
            "
            SELECT id, slug, title, author, content, show_in_feed, pinned,
                   banned, show_header, comments_enabled, created_at
            FROM posts
            ORDER BY created_at DESC, id
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            "
            SELECT id, slug, title, author, content, show_in_feed, pinned,
                   banned, show_header, comments_enabled, created_at
            FROM posts
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            "
            SELECT id, slug, title, author, content, show_in_feed, pinned,
                   banned, show_header, comments_enabled, created_at
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            slug,
            title,
            author,
            content,
            show_in_feed,
            show_header,
            comments_enabled,
            created_at,
        } = params;

        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, PostRow>(
            "
            INSERT INTO posts (
                id, slug, title, author, content, show_in_feed, pinned,
                banned, show_header, comments_enabled, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, FALSE, $7, $8, $9)
            RETURNING id, slug, title, author, content, show_in_feed, pinned,
                      banned, show_header, comments_enabled, created_at
            ",
        )
        .bind(id)
        .bind(&slug)
        .bind(&title)
        .bind(&author)
        .bind(&content)
        .bind(show_in_feed)
        .bind(show_header)
        .bind(comments_enabled)
        .bind(created_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn import_post(&self, params: ImportPostParams) -> Result<PostRecord, RepoError> {
        let ImportPostParams {
            slug,
            title,
            author,
            content,
            show_in_feed,
            pinned,
            banned,
            show_header,
            comments_enabled,
            created_at,
        } = params;

        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, PostRow>(
            "
            INSERT INTO posts (
                id, slug, title, author, content, show_in_feed, pinned,
                banned, show_header, comments_enabled, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, slug, title, author, content, show_in_feed, pinned,
                      banned, show_header, comments_enabled, created_at
            ",
        )
        .bind(id)
        .bind(&slug)
        .bind(&title)
        .bind(&author)
        .bind(&content)
        .bind(show_in_feed)
        .bind(pinned)
        .bind(banned)
        .bind(show_header)
        .bind(comments_enabled)
        .bind(created_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }
}
