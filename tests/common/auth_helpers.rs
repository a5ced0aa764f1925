//! Authentication test helpers
//!
//! Provides utilities for creating test users, generating tokens,
//! and building authorization headers.

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use feedline::backend::auth::users::create_user;
use feedline::backend::server::AppState;
use feedline::shared::UserSummary;

/// Password given to every helper-created user
pub const TEST_PASSWORD: &str = "password123";

/// Test user credentials
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            avatar: None,
        }
    }

    /// `Authorization` header carrying this user's token
    pub fn auth(&self) -> (HeaderName, HeaderValue) {
        auth_header(&self.token)
    }
}

/// Create a user directly in the store and issue a token for it
pub async fn create_test_user(state: &AppState, username: &str) -> TestUser {
    let email = format!("{}@test.com", username);
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4).expect("Failed to hash password");
    let user = create_user(&state.db_pool, username, &email, &password_hash)
        .await
        .expect("Failed to create test user");
    let token = state
        .sessions
        .create_token(&user.id, &user.email, &user.username)
        .expect("Failed to create test token");

    TestUser {
        id: user.id,
        username: user.username,
        email: user.email,
        token,
    }
}

/// Create authorization header
pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid token header"),
    )
}
