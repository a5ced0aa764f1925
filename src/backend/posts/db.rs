/**
 * Database Operations for Posts, Likes and Comments
 *
 * Reads return fully expanded [`PostView`] / [`CommentView`] records: author,
 * like users and comment authors are joined in as [`UserSummary`] values.
 *
 * # Ordering
 *
 * - Posts: newest first by `created_at`, ties broken by insertion order
 * - Likes and comments: insertion order
 */

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::shared::{CommentView, PostView, UserSummary};

#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    content: String,
    image: String,
    created_at: DateTime<Utc>,
    author_id: String,
    author_username: String,
    author_avatar: Option<String>,
}

#[derive(sqlx::FromRow)]
struct LikeRow {
    post_id: String,
    user_id: String,
    username: String,
    avatar: Option<String>,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    content: String,
    created_at: DateTime<Utc>,
    author_id: String,
    author_username: String,
    author_avatar: Option<String>,
}

impl LikeRow {
    fn into_parts(self) -> (String, UserSummary) {
        (
            self.post_id,
            UserSummary {
                id: self.user_id,
                username: self.username,
                avatar: self.avatar,
            },
        )
    }
}

impl CommentRow {
    fn into_view(self) -> CommentView {
        CommentView {
            id: self.id,
            content: self.content,
            author: UserSummary {
                id: self.author_id,
                username: self.author_username,
                avatar: self.author_avatar,
            },
            post: self.post_id,
            created_at: self.created_at,
        }
    }
}

/// Load the newest `limit` posts, expanded
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `limit` - Maximum number of posts returned
///
/// # Returns
/// Posts ordered newest first, each with likes and comments attached
pub async fn list_posts(pool: &SqlitePool, limit: i64) -> Result<Vec<PostView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT p.id, p.content, p.image, p.created_at,
               u.id AS author_id, u.username AS author_username, u.avatar AS author_avatar
        FROM posts p
        JOIN users u ON u.id = p.author_id
        ORDER BY p.created_at DESC, p.rowid DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    // Likes and comments for exactly the posts above, fetched in one pass each
    let post_ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();

    let mut like_query = for_posts(
        r#"
        SELECT l.post_id, u.id AS user_id, u.username, u.avatar
        FROM post_likes l
        JOIN users u ON u.id = l.user_id
        WHERE l.post_id"#,
        &post_ids,
        "ORDER BY l.rowid ASC",
    );
    let like_rows = like_query.build_query_as::<LikeRow>().fetch_all(pool).await?;

    let mut comment_query = for_posts(
        r#"
        SELECT c.id, c.post_id, c.content, c.created_at,
               u.id AS author_id, u.username AS author_username, u.avatar AS author_avatar
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id"#,
        &post_ids,
        "ORDER BY c.rowid ASC",
    );
    let comment_rows = comment_query.build_query_as::<CommentRow>().fetch_all(pool).await?;

    let mut likes: HashMap<String, Vec<UserSummary>> = HashMap::new();
    for row in like_rows {
        let (post_id, user) = row.into_parts();
        likes.entry(post_id).or_default().push(user);
    }

    let mut comments: HashMap<String, Vec<CommentView>> = HashMap::new();
    for row in comment_rows {
        let view = row.into_view();
        comments.entry(view.post.clone()).or_default().push(view);
    }

    let posts = rows
        .into_iter()
        .map(|row| {
            let post_likes = likes.remove(&row.id).unwrap_or_default();
            let post_comments = comments.remove(&row.id).unwrap_or_default();
            into_post_view(row, post_likes, post_comments)
        })
        .collect();

    Ok(posts)
}

/// `<head> IN (?, ?, ...) <tail>` with one bound parameter per post id
fn for_posts<'a>(head: &str, post_ids: &'a [String], tail: &str) -> QueryBuilder<'a, Sqlite> {
    let mut query = QueryBuilder::new(head);
    query.push(" IN (");
    {
        let mut ids = query.separated(", ");
        for id in post_ids {
            ids.push_bind(id.as_str());
        }
    }
    query.push(") ");
    query.push(tail);
    query
}

/// Load a single expanded post
pub async fn load_post_view(pool: &SqlitePool, post_id: &str) -> Result<Option<PostView>, sqlx::Error> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT p.id, p.content, p.image, p.created_at,
               u.id AS author_id, u.username AS author_username, u.avatar AS author_avatar
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = ?
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let likes = load_likes(pool, &row.id).await?;
            let comments = load_comments(pool, &row.id).await?;
            Ok(Some(into_post_view(row, likes, comments)))
        }
        None => Ok(None),
    }
}

fn into_post_view(row: PostRow, likes: Vec<UserSummary>, comments: Vec<CommentView>) -> PostView {
    PostView {
        id: row.id,
        content: row.content,
        image: row.image,
        author: UserSummary {
            id: row.author_id,
            username: row.author_username,
            avatar: row.author_avatar,
        },
        likes,
        comments,
        created_at: row.created_at,
    }
}

/// Insert a new post owned by `author`
///
/// # Returns
/// The expanded post: empty like set, empty comment sequence
pub async fn insert_post(
    pool: &SqlitePool,
    author: &UserSummary,
    content: &str,
    image: &str,
) -> Result<PostView, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO posts (id, content, image, author_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(content)
    .bind(image)
    .bind(&author.id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(PostView {
        id,
        content: content.to_string(),
        image: image.to_string(),
        author: author.clone(),
        likes: Vec::new(),
        comments: Vec::new(),
        created_at: now,
    })
}

/// Whether a post with this id exists
pub async fn post_exists(pool: &SqlitePool, post_id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Flip `user_id`'s membership in the post's like set
///
/// Removal is attempted first; only when nothing was removed is the like
/// inserted. Both steps and the reload run in one transaction, so concurrent
/// toggles are applied one after another and the primary key keeps the set
/// free of duplicates.
///
/// # Returns
/// The user's membership after the toggle and the resulting like list
pub async fn toggle_like(
    pool: &SqlitePool,
    post_id: &str,
    user_id: &str,
) -> Result<(bool, Vec<UserSummary>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let is_liked = if removed == 0 {
        sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        true
    } else {
        false
    };

    let likes = fetch_likes(&mut *tx, post_id).await?;
    tx.commit().await?;
    Ok((is_liked, likes))
}

/// Users who like the post, in the order they liked it
pub async fn load_likes(pool: &SqlitePool, post_id: &str) -> Result<Vec<UserSummary>, sqlx::Error> {
    fetch_likes(pool, post_id).await
}

async fn fetch_likes<'e, E>(executor: E, post_id: &str) -> Result<Vec<UserSummary>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, LikeRow>(
        r#"
        SELECT l.post_id, u.id AS user_id, u.username, u.avatar
        FROM post_likes l
        JOIN users u ON u.id = l.user_id
        WHERE l.post_id = ?
        ORDER BY l.rowid ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|row| row.into_parts().1).collect())
}

/// Append a comment to a post
pub async fn insert_comment(
    pool: &SqlitePool,
    post_id: &str,
    author: &UserSummary,
    content: &str,
) -> Result<CommentView, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO comments (id, post_id, author_id, content, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(post_id)
    .bind(&author.id)
    .bind(content)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(CommentView {
        id,
        content: content.to_string(),
        author: author.clone(),
        post: post_id.to_string(),
        created_at: now,
    })
}

/// A post's comments in insertion order
pub async fn load_comments(pool: &SqlitePool, post_id: &str) -> Result<Vec<CommentView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT c.id, c.post_id, c.content, c.created_at,
               u.id AS author_id, u.username AS author_username, u.avatar AS author_avatar
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.rowid ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CommentRow::into_view).collect())
}
