use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::properties::features::FeatureBundle;

pub const PURPOSE_SALE: &str = "sale";
pub const PURPOSE_RENT: &str = "rent";

pub const PROPERTY_STATUS_DRAFT: &str = "draft";
pub const PROPERTY_STATUS_PENDING: &str = "pending";
pub const PROPERTY_STATUS_ACTIVE: &str = "active";

#[derive(Debug, Deserialize)]
pub struct PropertyRequest {
    pub title: String,
    pub purpose: String,
    pub price: f64,
    pub property_type: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub size: f64,
    pub built_year: Option<i32>,
    pub country_id: i64,
    pub division_id: i64,
    pub district_id: i64,
    pub address: String,
    pub description: String,
}

/// Sparse update: an omitted or `null` field leaves the stored value
/// untouched; any present value, including zero, is written.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub purpose: Option<String>,
    pub price: Option<f64>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub size: Option<f64>,
    pub built_year: Option<i32>,
    pub country_id: Option<i64>,
    pub division_id: Option<i64>,
    pub district_id: Option<i64>,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// Query-string filters for the owner's property list.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyFilter {
    pub purpose: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub country_id: Option<i64>,
    pub division_id: Option<i64>,
    pub district_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct OwnerRef {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PropertyListItem {
    pub id: i64,
    pub title: String,
    pub purpose: String,
    pub price: f64,
    pub property_type: String,
    pub status: String,
    pub address: String,
    pub country: LocationRef,
    pub division: LocationRef,
    pub district: LocationRef,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct PropertyDetails {
    pub id: i64,
    pub title: String,
    pub purpose: String,
    pub price: f64,
    pub status: String,
    pub property_type: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub size: f64,
    pub built_year: Option<i32>,
    pub address: String,
    pub description: String,
    pub country: LocationRef,
    pub division: LocationRef,
    pub district: LocationRef,
    pub owner: OwnerRef,
    pub approved_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct PropertyFeatureResponse {
    pub id: i64,
    pub property_id: i64,
    #[serde(flatten)]
    pub bundle: FeatureBundle,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
