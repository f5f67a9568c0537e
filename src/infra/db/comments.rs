use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CommentsRepo, CreateAbuseReportParams, CreateCommentParams, RepoError, ReportsRepo,
};
use crate::domain::entities::CommentRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    author_name: String,
    content: String,
    created_at: OffsetDateTime,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            author_name: row.author_name,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CommentsRepo for PostgresRepositories {
    async fn create_comment(&self, params: CreateCommentParams) -> Result<CommentRecord, RepoError> {
        let CreateCommentParams {
            post_id,
            author_name,
            content,
        } = params;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, CommentRow>(
            "
            INSERT INTO comments (id, post_id, author_name, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_id, author_name, content, created_at
            ",
        )
        .bind(id)
        .bind(post_id)
        .bind(&author_name)
        .bind(&content)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CommentRecord::from(row))
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "
            SELECT id, post_id, author_name, content, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }
}

#[async_trait]
impl ReportsRepo for PostgresRepositories {
    async fn create_report(&self, params: CreateAbuseReportParams) -> Result<(), RepoError> {
        let CreateAbuseReportParams {
            post_id,
            reporter_name,
            details,
        } = params;

        sqlx::query(
            "
            INSERT INTO abuse_reports (id, post_id, reporter_name, details, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(&reporter_name)
        .bind(&details)
        .bind(OffsetDateTime::now_utc())
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
