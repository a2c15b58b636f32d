use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::auth::jwt::CurrentUser;
use crate::error::AppError;
use crate::pagination::{Page, PageParams};
use crate::properties::dto::{
    PropertyDetails, PropertyFeatureResponse, PropertyFilter, PropertyListItem, PropertyPatch,
    PropertyRequest,
};
use crate::properties::features::FeatureBundle;
use crate::properties::service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_properties).post(create_property))
        .route("/properties/:id", get(property_details).patch(patch_property))
        .route(
            "/properties/:id/features",
            get(get_features).put(put_features).delete(delete_features),
        )
}

#[instrument(skip(state, user))]
async fn list_properties(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Page<PropertyListItem>>, AppError> {
    let page = service::get_properties(&state, user.0.id, filter, params).await?;
    Ok(Json(page))
}

#[instrument(skip(state, user, payload))]
async fn create_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<PropertyRequest>,
) -> Result<(StatusCode, Json<PropertyDetails>), AppError> {
    let response = service::create_property(&state, user.0.id, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, user))]
async fn property_details(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<PropertyDetails>, AppError> {
    let response = service::get_property(&state, user.0.id, id).await?;
    Ok(Json(response))
}

#[instrument(skip(state, user, payload))]
async fn patch_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PropertyPatch>,
) -> Result<Json<PropertyDetails>, AppError> {
    let response = service::patch_property(&state, user.0.id, id, payload).await?;
    Ok(Json(response))
}

#[instrument(skip(state, user, payload))]
async fn put_features(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<FeatureBundle>,
) -> Result<(StatusCode, Json<PropertyFeatureResponse>), AppError> {
    let response = service::upsert_features(&state, user.0.id, id, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, user))]
async fn get_features(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<PropertyFeatureResponse>, AppError> {
    let response = service::get_features(&state, user.0.id, id).await?;
    Ok(Json(response))
}

#[instrument(skip(state, user))]
async fn delete_features(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    service::delete_features(&state, user.0.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
