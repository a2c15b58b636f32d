use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Request body for owner signup.
#[derive(Debug, Deserialize)]
pub struct OwnerSignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

/// Profile summary returned after a successful signup.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyAccountRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

/// Outcome envelope for verification and resend flows.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserMeResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub email_verified: bool,
    pub last_login_at: Option<OffsetDateTime>,
}
