//! Deterministic slug construction for post URLs.
//!
//! A slug is the title reduced to Unicode alphanumerics and hyphens, followed
//! by the creation date as `-DD-MM-YYYY`. The date is taken in UTC, the same
//! basis the persistence layer stores, so slug and stored timestamp never
//! disagree. Two posts sharing a title and creation day produce the same
//! slug; uniqueness is the repository's concern, not this function's.

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const SLUG_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[day]-[month]-[year]");

/// Derive a URL-safe slug from a post title and its creation instant.
///
/// Whitespace runs become single hyphens, every character outside Unicode
/// letters/digits/hyphens is dropped, hyphen runs collapse, and leading and
/// trailing hyphens are trimmed before the date suffix is appended. A title
/// with no permitted characters at all yields just `-DD-MM-YYYY`; that
/// degenerate slug is accepted rather than rejected.
pub fn make_slug(title: &str, created_at: OffsetDateTime) -> String {
    let mut component = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars() {
        if ch.is_whitespace() || ch == '-' {
            // Collapses runs and trims the leading edge in one pass.
            pending_hyphen = !component.is_empty();
            continue;
        }
        if !ch.is_alphanumeric() {
            continue;
        }
        if pending_hyphen {
            component.push('-');
            pending_hyphen = false;
        }
        component.push(ch);
    }

    let date = created_at
        .to_offset(UtcOffset::UTC)
        .date()
        .format(SLUG_DATE_FORMAT)
        .expect("day-month-year format");

    format!("{component}-{date}")
}
