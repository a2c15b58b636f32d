use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::jwt::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Upload URLs stay valid this long.
const UPLOAD_URL_TTL_SECS: u64 = 15 * 60;
/// Upper bound accepted for a single upload.
const MAX_UPLOAD_BYTES: i64 = 10 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new().route("/media/upload-url", post(create_upload_url))
}

#[derive(Debug, Deserialize)]
pub struct UploadUrlRequest {
    pub content_type: String,
    pub size: i64,
}

#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub key: String,
    pub expires_in: u64,
}

#[instrument(skip(state, user))]
async fn create_upload_url(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<UploadUrlRequest>,
) -> Result<(StatusCode, Json<UploadUrlResponse>), AppError> {
    if !payload.content_type.starts_with("image/") {
        return Err(AppError::validation("Only image uploads are supported"));
    }
    if payload.size <= 0 || payload.size > MAX_UPLOAD_BYTES {
        return Err(AppError::validation("Invalid upload size"));
    }

    // Keys are server-generated so clients cannot overwrite foreign objects.
    let key = format!("uploads/{}/{}", user.0.id, Uuid::new_v4());
    let upload_url = state
        .storage
        .presign_put(&key, &payload.content_type, payload.size, UPLOAD_URL_TTL_SECS)
        .await
        .map_err(AppError::internal)?;

    Ok((
        StatusCode::CREATED,
        Json(UploadUrlResponse {
            upload_url,
            key,
            expires_in: UPLOAD_URL_TTL_SECS,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_storage_presigns_with_key() {
        let state = AppState::fake();
        let url = state
            .storage
            .presign_put("uploads/1/abc", "image/jpeg", 1024, 600)
            .await
            .unwrap();
        assert!(url.contains("uploads/1/abc"));
    }
}
