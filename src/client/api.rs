/**
 * Feed REST Client
 *
 * Thin async wrappers over the server's REST endpoints. Every call returns
 * the decoded body or a [`ClientError`]; non-success statuses carry the
 * server's `error` message.
 */

use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::client::session::{Session, SessionUser};
use crate::shared::{CommentView, LikeResponse, PostView};

/// Image attached to a new post
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Shape of the server's JSON error body
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// REST client for the feed service
#[derive(Debug, Clone)]
pub struct FeedApi {
    config: ClientConfig,
    client: Client,
}

impl FeedApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying HTTP client, shared with the event subscription
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// URL of the Server-Sent Events stream
    pub fn realtime_url(&self) -> String {
        self.config.api_url("/realtime")
    }

    /// Register a new account
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        let response = self
            .client
            .post(self.config.api_url("/api/auth/register"))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    /// Log in with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .client
            .post(self.config.api_url("/api/auth/login"))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    /// Get current user info with token
    pub async fn me(&self, token: &str) -> Result<SessionUser, ClientError> {
        let response = self
            .client
            .get(self.config.api_url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.config.api_url("/api/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Fetch the newest posts
    pub async fn list_posts(&self) -> Result<Vec<PostView>, ClientError> {
        let response = self.client.get(self.config.api_url("/api/posts")).send().await?;
        decode(response).await
    }

    /// Create a post with optional image
    pub async fn create_post(
        &self,
        token: &str,
        content: &str,
        image: Option<ImageUpload>,
    ) -> Result<PostView, ClientError> {
        let mut form = multipart::Form::new().text("content", content.to_string());
        if let Some(image) = image {
            form = form.part("image", multipart::Part::bytes(image.bytes).file_name(image.file_name));
        }

        let response = self
            .client
            .post(self.config.api_url("/api/posts"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn toggle_like(&self, token: &str, post_id: &str) -> Result<LikeResponse, ClientError> {
        let response = self
            .client
            .post(self.config.api_url(&format!("/api/posts/{}/like", post_id)))
            .bearer_auth(token)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn add_comment(&self, token: &str, post_id: &str, content: &str) -> Result<CommentView, ClientError> {
        let response = self
            .client
            .post(self.config.api_url(&format!("/api/posts/{}/comment", post_id)))
            .bearer_auth(token)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;
        decode(response).await
    }
}

/// Turn a non-success response into [`ClientError::Status`]
pub(crate) async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| if text.is_empty() { status.to_string() } else { text });

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
