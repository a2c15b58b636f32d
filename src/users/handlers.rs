use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::auth::jwt::CurrentUser;
use crate::error::AppError;
use crate::pagination::{Page, PageParams};
use crate::state::AppState;
use crate::users::dto::{UserDetail, UserFilter};
use crate::users::service;

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/users", get(list_users))
}

#[instrument(skip(state, user))]
async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Page<UserDetail>>, AppError> {
    user.require_admin()?;
    let page = service::list_users(&state, filter, params).await?;
    Ok(Json(page))
}
