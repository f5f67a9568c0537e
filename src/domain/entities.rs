//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A published post. Created once, never structurally mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub show_in_feed: bool,
    pub pinned: bool,
    pub banned: bool,
    pub show_header: bool,
    pub comments_enabled: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A reader comment attached to a post. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_name: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

fn default_true() -> bool {
    true
}

/// A post as the superseded browser-storage era serialized it: camelCase
/// field names, RFC 3339 timestamps, and an opaque `post_<millis>` id.
/// Presentation toggles were added late in that era, so they are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPostRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub show_in_feed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub slug: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub banned: bool,
    #[serde(default = "default_true")]
    pub show_header: bool,
    #[serde(default)]
    pub comments_enabled: bool,
}
