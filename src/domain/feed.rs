//! Feed selection policy.

use crate::domain::entities::PostRecord;

/// Reduce the full post collection to the home-feed view.
///
/// Only posts with `show_in_feed` set and `banned` clear are kept. Pinned
/// posts sort first, newest-first within each group, with the id as a final
/// tie-break so equal timestamps still order deterministically.
pub fn select_feed(mut posts: Vec<PostRecord>) -> Vec<PostRecord> {
    posts.retain(|post| post.show_in_feed && !post.banned);
    posts.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn post(nth: u128, created_day: u8, show_in_feed: bool, pinned: bool, banned: bool) -> PostRecord {
        PostRecord {
            id: Uuid::from_u128(nth),
            slug: format!("post-{nth}"),
            title: format!("Post {nth}"),
            author: "ada".to_string(),
            content: "body".to_string(),
            show_in_feed,
            pinned,
            banned,
            show_header: true,
            comments_enabled: false,
            created_at: datetime!(2024-05-01 12:00 UTC).replace_day(created_day).expect("valid day"),
        }
    }

    #[test]
    fn hides_banned_and_unlisted_posts() {
        let feed = select_feed(vec![
            post(1, 3, true, false, false),
            post(2, 4, false, false, false),
            post(3, 5, true, false, true),
        ]);

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, Uuid::from_u128(1));
    }

    #[test]
    fn pinned_posts_lead_regardless_of_age() {
        let feed = select_feed(vec![
            post(1, 20, true, false, false),
            post(2, 2, true, true, false),
            post(3, 10, true, false, false),
        ]);

        let ids: Vec<u128> = feed.iter().map(|p| p.id.as_u128()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_id() {
        let feed = select_feed(vec![
            post(9, 7, true, false, false),
            post(4, 7, true, false, false),
        ]);

        let ids: Vec<u128> = feed.iter().map(|p| p.id.as_u128()).collect();
        assert_eq!(ids, vec![4, 9]);
    }
}
