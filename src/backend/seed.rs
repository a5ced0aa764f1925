/**
 * Development User Seeding
 *
 * Ensures a fixed set of test accounts exists. Running it again resets
 * their passwords instead of failing on the unique email.
 */

use sqlx::SqlitePool;

use crate::backend::auth::users::{upsert_user, User};
use crate::backend::error::BackendResult;

/// Password shared by every seeded account
pub const SEED_PASSWORD: &str = "password123";

/// Usernames of the seeded accounts; each logs in as `<name>@test.com`
pub const SEED_USERNAMES: [&str; 3] = ["alice", "bob", "charlie"];

/// Create or reset the seeded accounts
///
/// # Returns
/// The seeded users in [`SEED_USERNAMES`] order
pub async fn seed_users(pool: &SqlitePool, bcrypt_cost: u32) -> BackendResult<Vec<User>> {
    let mut users = Vec::with_capacity(SEED_USERNAMES.len());

    for username in SEED_USERNAMES {
        let email = format!("{}@test.com", username);
        let password_hash = bcrypt::hash(SEED_PASSWORD, bcrypt_cost)?;
        let user = upsert_user(pool, username, &email, &password_hash).await?;
        tracing::info!("Seeded user {} ({})", user.username, user.email);
        users.push(user);
    }

    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::config::memory_database;

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let pool = memory_database().await.unwrap();

        let first = seed_users(&pool, 4).await.unwrap();
        let second = seed_users(&pool, 4).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(second[1].email, "bob@test.com");
        assert_eq!(first[1].id, second[1].id);
        assert!(bcrypt::verify(SEED_PASSWORD, &second[2].password_hash).unwrap());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }
}
