use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CountryRequest {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CountryUpdateRequest {
    pub name: String,
    pub code: String,
    pub status: bool,
}

/// Admin view of a country, with its live division count.
#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub status: bool,
    pub divisions: i64,
}

#[derive(Debug, Serialize)]
pub struct CountryRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DivisionRequest {
    pub name: String,
    pub country_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DivisionUpdateRequest {
    pub name: String,
    pub country_id: i64,
    pub status: bool,
}

#[derive(Debug, Serialize)]
pub struct DivisionResponse {
    pub id: i64,
    pub name: String,
    pub country: CountryRef,
    pub status: bool,
    pub districts: i64,
}

#[derive(Debug, Serialize)]
pub struct DivisionRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DistrictRequest {
    pub name: String,
    pub division_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DistrictUpdateRequest {
    pub name: String,
    pub division_id: i64,
    pub status: bool,
}

#[derive(Debug, Serialize)]
pub struct DistrictResponse {
    pub id: i64,
    pub name: String,
    pub division: DivisionRef,
    pub country: CountryRef,
    pub status: bool,
}

// Public read paths return a reduced field set.

#[derive(Debug, Serialize)]
pub struct PublicCountry {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct PublicDivision {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PublicDistrict {
    pub id: i64,
    pub name: String,
}
