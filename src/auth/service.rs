use axum::extract::FromRef;
use base64ct::{Base64Url, Encoding};
use lazy_static::lazy_static;
use rand::RngCore;
use regex::Regex;
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::auth::dto::{
    ActionResponse, LoginRequest, LoginResponse, OwnerSignupRequest, SignupResponse,
};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{
    NewUser, OwnerProfile, User, VerificationToken, PURPOSE_EMAIL_VERIFICATION, ROLE_ADMIN,
    ROLE_OWNER, STATUS_ACTIVE, STATUS_INACTIVE,
};
use crate::email::VERIFICATION_TOKEN_TTL_HOURS;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Random 32-byte token, URL-safe base64. The plaintext goes into the email
/// link; only its hash is stored.
fn new_token_plaintext() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    Base64Url::encode_string(&bytes)
}

pub(crate) fn hash_token(plain: &str) -> String {
    let digest = Sha256::digest(plain.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

pub async fn login(state: &AppState, request: LoginRequest) -> Result<LoginResponse, AppError> {
    let email = request.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &email)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::auth("Invalid credentials"))?;

    if user.status != STATUS_ACTIVE {
        return Err(AppError::auth("Account is not active"));
    }

    let ok = verify_password(&request.password, &user.password_hash).map_err(AppError::internal)?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::auth("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user.id, &user.email).map_err(AppError::internal)?;

    User::record_login(&state.db, user.id)
        .await
        .map_err(AppError::internal)?;

    info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse { token })
}

pub async fn signup(
    state: &AppState,
    mut request: OwnerSignupRequest,
) -> Result<SignupResponse, AppError> {
    request.email = request.email.trim().to_lowercase();

    if !is_valid_email(&request.email) {
        return Err(AppError::validation("Invalid email"));
    }
    if request.password.len() < 8 {
        return Err(AppError::validation("Password too short"));
    }
    if request.phone_number.trim().is_empty() {
        return Err(AppError::validation("Phone number is required"));
    }

    if let Some(existing) = User::find_by_email(&state.db, &request.email)
        .await
        .map_err(AppError::internal)?
    {
        // A duplicate signup re-sends the verification email to the account
        // that already holds the address, then reports the conflict.
        match rotate_verification_token(state, existing.id).await {
            Ok(token) => dispatch_verification_email(state, &existing, token),
            Err(e) => warn!(error = %e, user_id = %existing.id, "token rotation failed"),
        }
        return Err(AppError::conflict("A user with this email already exists"));
    }

    let password_hash = hash_password(&request.password).map_err(AppError::internal)?;

    let mut tx = state.db.begin().await?;
    let user = User::create(
        &mut *tx,
        NewUser {
            first_name: &request.first_name,
            last_name: &request.last_name,
            email: &request.email,
            password_hash: &password_hash,
            is_superuser: false,
            role: ROLE_OWNER,
            status: STATUS_INACTIVE,
            email_verified: false,
        },
    )
    .await
    .map_err(AppError::internal)?;
    OwnerProfile::create(&mut *tx, user.id, request.phone_number.trim())
        .await
        .map_err(AppError::internal)?;
    tx.commit().await?;

    // Signup succeeded with the commit above; email delivery must not gate
    // the response.
    match generate_verification_token(state, user.id).await {
        Ok(token) => dispatch_verification_email(state, &user, token),
        Err(e) => warn!(error = %e, user_id = %user.id, "verification token issue failed"),
    }

    info!(user_id = %user.id, "owner signed up");
    Ok(SignupResponse {
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        role: user.role,
        status: user.status,
    })
}

/// Stores a hashed, 48-hour verification token and returns the plaintext for
/// the email link.
pub async fn generate_verification_token(state: &AppState, user_id: i64) -> anyhow::Result<String> {
    let plaintext = new_token_plaintext();
    let expires_at = OffsetDateTime::now_utc() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS);
    VerificationToken::insert(
        &state.db,
        user_id,
        &hash_token(&plaintext),
        PURPOSE_EMAIL_VERIFICATION,
        expires_at,
    )
    .await?;
    Ok(plaintext)
}

/// Invalidates outstanding tokens and issues a fresh one.
async fn rotate_verification_token(state: &AppState, user_id: i64) -> anyhow::Result<String> {
    VerificationToken::delete_active_for(&state.db, user_id, PURPOSE_EMAIL_VERIFICATION).await?;
    generate_verification_token(state, user_id).await
}

fn dispatch_verification_email(state: &AppState, user: &User, token: String) {
    let email = state.email.clone();
    let to_email = user.email.clone();
    let to_name = user.full_name();
    tokio::spawn(async move {
        if let Err(e) = email
            .send_verification_email(&to_email, &to_name, &token)
            .await
        {
            warn!(error = %e, %to_email, "verification email failed");
        }
    });
}

pub async fn resend_verification(state: &AppState, email: &str) -> Result<ActionResponse, AppError> {
    let email = email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &email)
        .await
        .map_err(AppError::internal)?
    {
        // Do not reveal whether the address is registered.
        None => {
            return Ok(ActionResponse::new(
                true,
                "If your account exists, a verification email will be sent",
            ))
        }
        Some(user) => user,
    };

    if user.email_verified {
        return Ok(ActionResponse::new(
            false,
            "Your account is already verified",
        ));
    }

    let token = rotate_verification_token(state, user.id)
        .await
        .map_err(AppError::internal)?;
    dispatch_verification_email(state, &user, token);

    Ok(ActionResponse::new(
        true,
        "A new verification email has been sent to your address",
    ))
}

pub async fn verify_account(state: &AppState, plaintext: &str) -> Result<ActionResponse, AppError> {
    let hashed = hash_token(plaintext);

    let token =
        match VerificationToken::find_by_hash(&state.db, &hashed, PURPOSE_EMAIL_VERIFICATION)
            .await
            .map_err(AppError::internal)?
        {
            None => return Ok(ActionResponse::new(false, "Invalid verification token")),
            Some(token) => token,
        };

    if token.is_expired() {
        return Ok(ActionResponse::new(
            false,
            "Verification token has expired",
        ));
    }
    if token.is_used() {
        return Ok(ActionResponse::new(
            false,
            "Verification token has already been used",
        ));
    }

    // Both writes commit atomically or neither does.
    let mut tx = state.db.begin().await?;
    User::mark_verified(&mut *tx, token.user_id)
        .await
        .map_err(AppError::internal)?;
    VerificationToken::mark_used(&mut *tx, token.id)
        .await
        .map_err(AppError::internal)?;
    tx.commit().await?;

    if let Ok(Some(user)) = User::find_by_id(&state.db, token.user_id).await {
        let email = state.email.clone();
        let to_name = user.full_name();
        tokio::spawn(async move {
            if let Err(e) = email.send_welcome_email(&user.email, &to_name).await {
                warn!(error = %e, "welcome email failed");
            }
        });
    }

    info!(user_id = %token.user_id, "account verified");
    Ok(ActionResponse::new(
        true,
        "Your account has been successfully verified",
    ))
}

/// Seeds the superuser from `ADMIN_*` env configuration when absent.
pub async fn ensure_admin(state: &AppState) -> anyhow::Result<()> {
    let Some(seed) = state.config.admin.clone() else {
        return Ok(());
    };

    let email = seed.email.trim().to_lowercase();
    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(&seed.password)?;
    let user = User::create(
        &state.db,
        NewUser {
            first_name: &seed.first_name,
            last_name: &seed.last_name,
            email: &email,
            password_hash: &password_hash,
            is_superuser: true,
            role: ROLE_ADMIN,
            status: STATUS_ACTIVE,
            email_verified: true,
        },
    )
    .await?;
    info!(user_id = %user.id, "admin account seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_plaintext_is_url_safe_and_high_entropy() {
        let a = new_token_plaintext();
        let b = new_token_plaintext();
        assert_ne!(a, b);
        // 32 bytes of base64
        assert!(a.len() >= 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }

    #[test]
    fn token_hash_is_stable_hex_and_differs_from_plaintext() {
        let plain = "some-token";
        let h1 = hash_token(plain);
        let h2 = hash_token(plain);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert_ne!(h1, plain);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn email_validation_accepts_plausible_addresses() {
        assert!(is_valid_email("owner@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@at@signs.com"));
        assert!(!is_valid_email("spaces in@mail.com"));
    }
}
