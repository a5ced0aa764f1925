/**
 * Feed App
 *
 * Owns the client's session, local feed state and live subscription.
 *
 * # Lifecycle
 *
 * - [`FeedApp::mount`] fetches the listing, then subscribes to `/realtime`
 * - [`FeedApp::next_event`] / [`FeedApp::poll_events`] merge broadcast
 *   events into the local state
 * - [`FeedApp::unmount`] releases the subscription
 *
 * # Actions
 *
 * Posting, liking and commenting only call the API. The local state is not
 * touched: the change arrives through the broadcast like everyone else's,
 * which keeps this client and all others converging on the same data.
 */

use crate::client::api::{FeedApi, ImageUpload};
use crate::client::error::ClientError;
use crate::client::feed_state::FeedState;
use crate::client::session::{Session, SessionStore};
use crate::client::subscription::FeedSubscription;
use crate::shared::{CommentView, FeedEvent, LikeResponse, PostView};

/// Client application state
#[derive(Debug)]
pub struct FeedApp {
    api: FeedApi,
    session: Option<Session>,
    store: Option<SessionStore>,
    state: FeedState,
    subscription: Option<FeedSubscription>,
}

impl FeedApp {
    pub fn new(api: FeedApi) -> Self {
        Self {
            api,
            session: None,
            store: None,
            state: FeedState::new(),
            subscription: None,
        }
    }

    /// Persist sessions through `store`
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn api(&self) -> &FeedApi {
        &self.api
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn posts(&self) -> &[PostView] {
        self.state.posts()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Restore and revalidate the stored session, if a store is configured
    pub async fn restore_session(&mut self) -> Result<Option<&Session>, ClientError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        self.session = match store.load().await? {
            Some(session) => store.refresh(&self.api, session).await?,
            None => None,
        };
        Ok(self.session.as_ref())
    }

    /// Log in and keep the session
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, ClientError> {
        let session = self.api.login(email, password).await.map_err(|e| {
            tracing::warn!("Login failed: {}", e);
            e
        })?;
        self.keep_session(session).await
    }

    /// Register and keep the session
    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Result<&Session, ClientError> {
        let session = self.api.register(username, email, password).await.map_err(|e| {
            tracing::warn!("Registration failed: {}", e);
            e
        })?;
        self.keep_session(session).await
    }

    async fn keep_session(&mut self, session: Session) -> Result<&Session, ClientError> {
        if let Some(store) = &self.store {
            store.save(&session).await?;
        }
        Ok(self.session.insert(session))
    }

    /// Drop the session locally and on the server
    ///
    /// The local session is cleared even when the server call fails.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let session = self.session.take();
        if let Some(store) = &self.store {
            store.clear().await?;
        }
        if let Some(session) = session {
            if let Err(e) = self.api.logout(&session.token).await {
                tracing::warn!("Server logout failed: {}", e);
            }
        }
        Ok(())
    }

    /// Fetch the listing, then subscribe to live events
    pub async fn mount(&mut self) -> Result<(), ClientError> {
        let posts = self.api.list_posts().await?;
        tracing::info!("Loaded {} posts", posts.len());
        self.state.replace_all(posts);

        let subscription = FeedSubscription::connect(self.api.http(), &self.api.realtime_url()).await?;
        self.subscription = Some(subscription);
        Ok(())
    }

    /// Release the live subscription; the local feed is kept
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            tracing::info!("Feed subscription released");
        }
    }

    /// Wait for the next broadcast event and merge it
    ///
    /// Returns `None` when not mounted or once the stream has ended; an
    /// ended stream also unmounts.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        let subscription = self.subscription.as_mut()?;
        match subscription.recv().await {
            Some(event) => {
                self.state.apply(&event);
                Some(event)
            }
            None => {
                self.subscription = None;
                None
            }
        }
    }

    /// Merge every event already received, without waiting
    ///
    /// Returns the number of events merged.
    pub fn poll_events(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };

        let mut merged = 0;
        while let Some(event) = subscription.try_recv() {
            self.state.apply(&event);
            merged += 1;
        }
        merged
    }

    /// Create a post; it appears locally when its `newPost` event arrives
    pub async fn create_post(&self, content: &str, image: Option<ImageUpload>) -> Result<PostView, ClientError> {
        let token = self.token()?;
        self.api.create_post(token, content, image).await.map_err(|e| {
            tracing::warn!("Creating post failed: {}", e);
            e
        })
    }

    /// Toggle the current user's like on a post
    pub async fn toggle_like(&self, post_id: &str) -> Result<LikeResponse, ClientError> {
        let token = self.token()?;
        self.api.toggle_like(token, post_id).await.map_err(|e| {
            tracing::warn!("Toggling like on {} failed: {}", post_id, e);
            e
        })
    }

    /// Comment on a post
    pub async fn add_comment(&self, post_id: &str, content: &str) -> Result<CommentView, ClientError> {
        let token = self.token()?;
        self.api.add_comment(token, post_id, content).await.map_err(|e| {
            tracing::warn!("Commenting on {} failed: {}", post_id, e);
            e
        })
    }

    fn token(&self) -> Result<&str, ClientError> {
        self.session
            .as_ref()
            .map(|session| session.token.as_str())
            .ok_or(ClientError::NotAuthenticated)
    }
}
