use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default = "default_true")]
    pub show_in_feed: bool,
    #[serde(default = "default_true")]
    pub show_header: bool,
    #[serde(default)]
    pub comments_enabled: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentCreateRequest {
    pub author_name: String,
    pub content: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportCreateRequest {
    pub reporter_name: String,
    pub details: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportResponse {
    pub accepted: bool,
}
