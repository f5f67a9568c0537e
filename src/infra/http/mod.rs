//! HTTP surface consumed by the presentation layer.

mod error;
mod handlers;
mod models;

pub use error::ApiError;
pub use models::{CommentCreateRequest, PostCreateRequest, ReportCreateRequest, ReportResponse};

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::comments::CommentService;
use crate::application::posts::PostService;
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct ApiState {
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/feed", get(handlers::list_feed))
        .route("/api/v1/posts", post(handlers::create_post))
        .route("/api/v1/posts/{slug}", get(handlers::get_post))
        .route(
            "/api/v1/posts/{id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/api/v1/posts/{id}/report", post(handlers::submit_report))
        .route("/_health/db", get(handlers::db_health))
        .with_state(state)
}
