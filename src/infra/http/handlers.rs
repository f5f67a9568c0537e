use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use uuid::Uuid;

use crate::application::posts::NewPost;
use crate::domain::entities::{CommentRecord, PostRecord};

use super::error::ApiError;
use super::models::{CommentCreateRequest, PostCreateRequest, ReportCreateRequest, ReportResponse};
use super::ApiState;

pub async fn list_feed(State(state): State<ApiState>) -> Result<Json<Vec<PostRecord>>, ApiError> {
    let posts = state.posts.feed().await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<PostRecord>, ApiError> {
    match state.posts.get_by_slug(&slug).await? {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::not_found("post not found")),
    }
}

pub async fn create_post(
    State(state): State<ApiState>,
    Json(payload): Json<PostCreateRequest>,
) -> Result<(StatusCode, Json<PostRecord>), ApiError> {
    let PostCreateRequest {
        title,
        author,
        content,
        show_in_feed,
        show_header,
        comments_enabled,
    } = payload;

    if title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required", None));
    }
    if author.trim().is_empty() {
        return Err(ApiError::bad_request("author is required", None));
    }
    if content.trim().is_empty() {
        return Err(ApiError::bad_request("content is required", None));
    }

    let post = state
        .posts
        .publish(NewPost {
            title,
            author,
            content,
            show_in_feed,
            show_header,
            comments_enabled,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_comments(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommentRecord>>, ApiError> {
    let comments = state.comments.list_comments(id).await?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommentCreateRequest>,
) -> Result<(StatusCode, Json<CommentRecord>), ApiError> {
    let CommentCreateRequest {
        author_name,
        content,
    } = payload;

    if author_name.trim().is_empty() {
        return Err(ApiError::bad_request("author name is required", None));
    }
    if content.trim().is_empty() {
        return Err(ApiError::bad_request("content is required", None));
    }

    let comment = state.comments.add_comment(id, author_name, content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn submit_report(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportCreateRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    let ReportCreateRequest {
        reporter_name,
        details,
    } = payload;

    if reporter_name.trim().is_empty() {
        return Err(ApiError::bad_request("reporter name is required", None));
    }
    if details.trim().is_empty() {
        return Err(ApiError::bad_request("details are required", None));
    }

    let accepted = state.comments.submit_abuse_report(id, reporter_name, details).await;
    Ok(Json(ReportResponse { accepted }))
}

pub async fn db_health(State(state): State<ApiState>) -> Response {
    match state.db.health_check().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(error = %err, "database health check failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
