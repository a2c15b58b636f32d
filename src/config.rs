use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub sendgrid_api_key: String,
    pub sender_email: String,
    pub sender_name: String,
    pub frontend_url: String,
    pub support_email: String,
    pub company_name: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Superuser seeded at startup when no user with this email exists.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub s3: S3Config,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "ghor".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "ghor-users".into()),
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };
        let email = EmailConfig {
            sendgrid_api_key: std::env::var("SENDGRID_API_KEY").unwrap_or_default(),
            sender_email: std::env::var("SENDER_EMAIL")
                .unwrap_or_else(|_| "noreply@ghor.online".into()),
            sender_name: std::env::var("SENDER_NAME").unwrap_or_else(|_| "Ghor".into()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "https://ghor.online".into()),
            support_email: std::env::var("SUPPORT_EMAIL")
                .unwrap_or_else(|_| "support@ghor.online".into()),
            company_name: std::env::var("COMPANY_NAME").unwrap_or_else(|_| "Ghor".into()),
            timeout_secs: std::env::var("SENDGRID_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        let s3 = S3Config {
            endpoint: std::env::var("S3_ENDPOINT").unwrap_or_default(),
            bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "ghor-media".into()),
            access_key: std::env::var("S3_ACCESS_KEY").unwrap_or_default(),
            secret_key: std::env::var("S3_SECRET_KEY").unwrap_or_default(),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };
        let admin = match (
            std::env::var("ADMIN_EMAIL").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminSeed {
                    first_name: std::env::var("ADMIN_FIRST_NAME")
                        .unwrap_or_else(|_| "System".into()),
                    last_name: std::env::var("ADMIN_LAST_NAME").unwrap_or_else(|_| "Admin".into()),
                    email,
                    password,
                })
            }
            _ => None,
        };
        Ok(Self {
            database_url,
            jwt,
            email,
            s3,
            admin,
        })
    }
}
