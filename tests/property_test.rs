//! Property-based tests
//!
//! Covers the client's feed reducer, the SSE frame parser and post content
//! validation over generated inputs.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use feedline::client::{FeedState, SseParser};
use feedline::shared::post::{validate_comment_content, validate_post_content, MAX_POST_CHARS};
use feedline::shared::{CommentAdded, CommentView, FeedEvent, LikeUpdate, PostView, UserSummary};
use proptest::prelude::*;

fn user(index: u8) -> UserSummary {
    UserSummary {
        id: format!("u{}", index),
        username: format!("user{}", index),
        avatar: None,
    }
}

fn post(index: u8) -> PostView {
    PostView {
        id: format!("p{}", index),
        content: format!("post {}", index),
        image: String::new(),
        author: user(0),
        likes: vec![],
        comments: vec![],
        created_at: Utc.timestamp_opt(1_700_000_000 + index as i64, 0).unwrap(),
    }
}

fn event_strategy() -> impl Strategy<Value = FeedEvent> {
    prop_oneof![
        (0u8..6).prop_map(|i| FeedEvent::NewPost(post(i))),
        (0u8..6, prop::collection::btree_set(0u8..5, 0..4)).prop_map(|(i, likers)| {
            FeedEvent::PostLiked(LikeUpdate {
                post_id: format!("p{}", i),
                likes: likers.into_iter().map(user).collect(),
            })
        }),
        (0u8..6, 0u8..10).prop_map(|(i, c)| {
            FeedEvent::NewComment(CommentAdded {
                post_id: format!("p{}", i),
                comment: CommentView {
                    id: format!("c{}", c),
                    content: format!("comment {}", c),
                    author: user(1),
                    post: format!("p{}", i),
                    created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                },
            })
        }),
    ]
}

proptest! {
    #[test]
    fn prop_post_ids_stay_unique(events in prop::collection::vec(event_strategy(), 0..40)) {
        let mut state = FeedState::new();
        for event in &events {
            state.apply(event);
        }

        let ids: HashSet<_> = state.posts().iter().map(|p| p.id.clone()).collect();
        prop_assert_eq!(ids.len(), state.len());

        for post in state.posts() {
            let comment_ids: HashSet<_> = post.comments.iter().map(|c| c.id.clone()).collect();
            prop_assert_eq!(comment_ids.len(), post.comments.len());
        }
    }

    #[test]
    fn prop_replayed_event_changes_nothing(
        events in prop::collection::vec(event_strategy(), 0..30),
        replay in event_strategy(),
    ) {
        let mut state = FeedState::new();
        for event in &events {
            state.apply(event);
        }
        state.apply(&replay);
        let before = state.clone();

        prop_assert!(!state.apply(&replay) || matches!(replay, FeedEvent::PostLiked(_)));
        prop_assert_eq!(state, before);
    }

    #[test]
    fn prop_events_for_unknown_posts_are_ignored(event in event_strategy()) {
        prop_assume!(!matches!(event, FeedEvent::NewPost(_)));

        let mut state = FeedState::from_posts(vec![post(42)]);
        let before = state.clone();

        prop_assert!(!state.apply(&event));
        prop_assert_eq!(state, before);
    }

    #[test]
    fn prop_likes_follow_last_update(events in prop::collection::vec(event_strategy(), 0..40)) {
        let mut state = FeedState::from_posts((0u8..6).map(post).collect());
        let mut expected: Vec<Vec<UserSummary>> = vec![Vec::new(); 6];

        for event in &events {
            state.apply(event);
            if let FeedEvent::PostLiked(update) = event {
                let index: usize = update.post_id[1..].parse().unwrap();
                expected[index] = update.likes.clone();
            }
        }

        for (index, likes) in expected.iter().enumerate() {
            let merged = state.post(&format!("p{}", index)).unwrap();
            prop_assert_eq!(&merged.likes, likes);
        }
    }

    #[test]
    fn prop_sse_parser_ignores_chunk_boundaries(
        payloads in prop::collection::vec("[a-zé{}\":, ]{0,40}", 1..5),
        split in any::<prop::sample::Index>(),
    ) {
        let mut stream = String::from(": keep-alive\n\n");
        for payload in &payloads {
            stream.push_str(&format!("event: newPost\ndata: {}\n\n", payload));
        }
        let bytes = stream.as_bytes();
        let at = split.index(bytes.len() + 1);

        let mut whole = SseParser::new();
        let expected = whole.push(bytes);

        let mut chunked = SseParser::new();
        let mut frames = chunked.push(&bytes[..at]);
        frames.extend(chunked.push(&bytes[at..]));

        prop_assert_eq!(frames.len(), payloads.len());
        prop_assert_eq!(frames, expected);
    }

    #[test]
    fn prop_post_length_bound(content in "\\PC{0,300}") {
        let chars = content.chars().count();
        let valid = !content.trim().is_empty() && chars <= MAX_POST_CHARS;
        prop_assert_eq!(validate_post_content(&content).is_ok(), valid);
    }

    #[test]
    fn prop_comments_have_no_length_bound(content in "[a-z]{1,2000}") {
        prop_assert!(validate_comment_content(&content).is_ok());
    }
}
