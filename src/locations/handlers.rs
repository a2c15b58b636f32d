use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;

use crate::auth::jwt::CurrentUser;
use crate::error::AppError;
use crate::locations::dto::{
    CountryRequest, CountryResponse, CountryUpdateRequest, DistrictRequest, DistrictResponse,
    DistrictUpdateRequest, DivisionRequest, DivisionResponse, DivisionUpdateRequest, PublicCountry,
    PublicDistrict, PublicDivision,
};
use crate::locations::service;
use crate::pagination::{Page, PageParams};
use crate::state::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin/countries", get(list_countries).post(create_country))
        .route(
            "/admin/countries/:id",
            patch(update_country).delete(delete_country),
        )
        .route("/admin/divisions", get(list_divisions).post(create_division))
        .route(
            "/admin/divisions/:id",
            patch(update_division).delete(delete_division),
        )
        .route("/admin/districts", get(list_districts).post(create_district))
        .route(
            "/admin/districts/:id",
            patch(update_district).delete(delete_district),
        )
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(public_countries))
        .route("/countries/:id/divisions", get(public_divisions))
        .route("/divisions/:id/districts", get(public_districts))
}

// --- admin: countries ---

#[instrument(skip(state, user, payload))]
async fn create_country(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CountryRequest>,
) -> Result<(StatusCode, Json<CountryResponse>), AppError> {
    user.require_admin()?;
    let response = service::create_country(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, user))]
async fn list_countries(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<CountryResponse>>, AppError> {
    user.require_admin()?;
    let page = service::list_countries(&state, params).await?;
    Ok(Json(page))
}

#[instrument(skip(state, user, payload))]
async fn update_country(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CountryUpdateRequest>,
) -> Result<Json<CountryResponse>, AppError> {
    user.require_admin()?;
    let response = service::update_country(&state, id, payload).await?;
    Ok(Json(response))
}

#[instrument(skip(state, user))]
async fn delete_country(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    service::delete_country(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- admin: divisions ---

#[instrument(skip(state, user, payload))]
async fn create_division(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<DivisionRequest>,
) -> Result<(StatusCode, Json<DivisionResponse>), AppError> {
    user.require_admin()?;
    let response = service::create_division(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, user))]
async fn list_divisions(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<DivisionResponse>>, AppError> {
    user.require_admin()?;
    let page = service::list_divisions(&state, params).await?;
    Ok(Json(page))
}

#[instrument(skip(state, user, payload))]
async fn update_division(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DivisionUpdateRequest>,
) -> Result<Json<DivisionResponse>, AppError> {
    user.require_admin()?;
    let response = service::update_division(&state, id, payload).await?;
    Ok(Json(response))
}

#[instrument(skip(state, user))]
async fn delete_division(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    service::delete_division(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- admin: districts ---

#[instrument(skip(state, user, payload))]
async fn create_district(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<DistrictRequest>,
) -> Result<(StatusCode, Json<DistrictResponse>), AppError> {
    user.require_admin()?;
    let response = service::create_district(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, user))]
async fn list_districts(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<DistrictResponse>>, AppError> {
    user.require_admin()?;
    let page = service::list_districts(&state, params).await?;
    Ok(Json(page))
}

#[instrument(skip(state, user, payload))]
async fn update_district(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DistrictUpdateRequest>,
) -> Result<Json<DistrictResponse>, AppError> {
    user.require_admin()?;
    let response = service::update_district(&state, id, payload).await?;
    Ok(Json(response))
}

#[instrument(skip(state, user))]
async fn delete_district(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    service::delete_district(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- public ---

#[instrument(skip(state))]
async fn public_countries(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PublicCountry>>, AppError> {
    let page = service::public_countries(&state, params).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
async fn public_divisions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PublicDivision>>, AppError> {
    let page = service::public_divisions(&state, id, params).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
async fn public_districts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PublicDistrict>>, AppError> {
    let page = service::public_districts(&state, id, params).await?;
    Ok(Json(page))
}
