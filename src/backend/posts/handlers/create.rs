/**
 * Post Creation Handler
 *
 * POST /api/posts with a multipart body: a `content` text field and an
 * optional `image` file field.
 *
 * # Order of Operations
 *
 * 1. Rate limit the calling client (429 + `Retry-After`, nothing stored)
 * 2. Read the multipart fields
 * 3. Validate content (400, nothing stored, no file written)
 * 4. Store the image, if any
 * 5. Insert the post
 * 6. Broadcast `newPost` and return the same object with 201
 */

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AuthUser, ClientKey};
use crate::backend::posts::db;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::post::validate_post_content;
use crate::shared::{FeedEvent, PostView};

/// Multipart field carrying the post body
const CONTENT_FIELD: &str = "content";
/// Multipart field carrying the optional image
const IMAGE_FIELD: &str = "image";

/// Raw fields read from the multipart body
#[derive(Debug, Default)]
struct PostForm {
    content: Option<String>,
    image: Option<(String, Vec<u8>)>,
}

impl PostForm {
    async fn read(multipart: &mut Multipart, max_image_bytes: usize) -> BackendResult<Self> {
        let mut form = PostForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            match field.name() {
                Some(CONTENT_FIELD) => {
                    form.content = Some(field.text().await.map_err(multipart_error)?);
                }
                Some(IMAGE_FIELD) => {
                    form.image = read_image(field, max_image_bytes).await?;
                }
                other => {
                    tracing::debug!("Ignoring multipart field {:?}", other);
                }
            }
        }

        Ok(form)
    }
}

/// Read the image field; an empty file input counts as no image
async fn read_image(
    field: Field<'_>,
    max_image_bytes: usize,
) -> BackendResult<Option<(String, Vec<u8>)>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let bytes = field.bytes().await.map_err(multipart_error)?;

    if bytes.is_empty() && file_name.is_empty() {
        return Ok(None);
    }
    if bytes.len() > max_image_bytes {
        return Err(BackendError::validation(format!(
            "File too large (max {} bytes)",
            max_image_bytes
        )));
    }

    Ok(Some((file_name, bytes.to_vec())))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> BackendError {
    tracing::warn!("Malformed multipart body: {}", err);
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        BackendError::handler(status, "Upload too large")
    } else {
        BackendError::validation(err.body_text())
    }
}

/// Create a post
///
/// # Errors
///
/// * `400 Bad Request` - Missing, blank or overlong content, or oversized image
/// * `401 Unauthorized` - Missing or invalid credential
/// * `429 Too Many Requests` - More than the allowed posts in the window
/// * `500 Internal Server Error` - Store or filesystem failure
///
/// # Example Request
///
/// ```http
/// POST /api/posts HTTP/1.1
/// Authorization: Bearer <token>
/// Content-Type: multipart/form-data; boundary=X
///
/// --X
/// Content-Disposition: form-data; name="content"
///
/// hello
/// --X--
/// ```
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ClientKey(client_key): ClientKey,
    mut multipart: Multipart,
) -> BackendResult<(StatusCode, Json<PostView>)> {
    state.post_limiter.check(&client_key)?;

    let form = PostForm::read(&mut multipart, state.uploads.max_bytes()).await?;

    let content = form.content.unwrap_or_default();
    validate_post_content(&content)?;

    let image = match form.image {
        Some((file_name, bytes)) => state.uploads.save(&file_name, &bytes).await?,
        None => String::new(),
    };

    let post = match db::insert_post(&state.db_pool, &user.summary(), &content, &image).await {
        Ok(post) => post,
        Err(e) => {
            if !image.is_empty() {
                state.uploads.remove(&image).await;
            }
            return Err(e.into());
        }
    };
    tracing::info!("Post {} created by {}", post.id, user.username);

    broadcast_event(&state.feed_broadcast, FeedEvent::NewPost(post.clone()));

    Ok((StatusCode::CREATED, Json(post)))
}
