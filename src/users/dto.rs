use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Query-string filters for the admin user directory.
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<String>,
    pub status: Option<String>,
    pub email_verified: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Owner profile as embedded in directory rows. Falls back to a zero-value
/// placeholder when the user has no profile, so the nested object is never
/// missing.
#[derive(Debug, Default, Serialize)]
pub struct ProfileSummary {
    pub phone_number: String,
    pub company_name: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub is_superuser: bool,
    pub email_verified: bool,
    pub joined_at: OffsetDateTime,
    pub last_login_at: Option<OffsetDateTime>,
    pub profile: ProfileSummary,
}
