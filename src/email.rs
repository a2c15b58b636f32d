use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use time::format_description::well_known::Rfc2822;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::config::EmailConfig;

/// How long a verification link stays valid, shown in emails and used for
/// token expiry.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 48;

#[axum::async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> anyhow::Result<()>;
}

/// SendGrid v3 mail-send client.
pub struct SendgridMailer {
    http: reqwest::Client,
    api_key: String,
    sender_email: String,
    sender_name: String,
    timeout: std::time::Duration,
}

impl SendgridMailer {
    pub fn new(cfg: &EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: cfg.sendgrid_api_key.clone(),
            sender_email: cfg.sender_email.clone(),
            sender_name: cfg.sender_name.clone(),
            timeout: std::time::Duration::from_secs(cfg.timeout_secs),
        }
    }
}

#[axum::async_trait]
impl EmailSender for SendgridMailer {
    async fn send(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> anyhow::Result<()> {
        let body = json!({
            "personalizations": [{
                "to": [{"email": to_email, "name": to_name}],
            }],
            "from": {"email": self.sender_email, "name": self.sender_name},
            "subject": subject,
            "content": [
                {"type": "text/plain", "value": text_body},
                {"type": "text/html", "value": html_body},
            ],
        });

        let response = self
            .http
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("sendgrid request")?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("sendgrid API error: status {status}, body {detail}");
        }
        Ok(())
    }
}

/// No-op sender for tests and local runs without an API key.
pub struct NoopMailer;

#[axum::async_trait]
impl EmailSender for NoopMailer {
    async fn send(
        &self,
        to_email: &str,
        _to_name: &str,
        subject: &str,
        _html_body: &str,
        _text_body: &str,
    ) -> anyhow::Result<()> {
        debug!(%to_email, %subject, "email send skipped (noop mailer)");
        Ok(())
    }
}

/// Data bag handed to the email templates.
pub struct EmailData {
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub verification_link: Option<String>,
    pub company_name: String,
    pub support_email: String,
    pub expiry_display: Option<String>,
}

fn render_verification(data: &EmailData) -> (String, String) {
    let link = data.verification_link.as_deref().unwrap_or_default();
    let expiry = data.expiry_display.as_deref().unwrap_or_default();
    let html = format!(
        "<p>Hi {name},</p>\
         <p>Welcome to {company}! Please confirm your email address by \
         clicking the link below:</p>\
         <p><a href=\"{link}\">Verify your email</a></p>\
         <p>This link expires on {expiry}.</p>\
         <p>If you did not sign up, you can ignore this email. \
         Questions? Write to {support}.</p>",
        name = data.recipient_name,
        company = data.company_name,
        link = link,
        expiry = expiry,
        support = data.support_email,
    );
    let text = format!(
        "Hi {name},\n\n\
         Welcome to {company}! Confirm your email address by opening:\n\
         {link}\n\n\
         This link expires on {expiry}.\n\n\
         If you did not sign up, ignore this email. Questions? {support}",
        name = data.recipient_name,
        company = data.company_name,
        link = link,
        expiry = expiry,
        support = data.support_email,
    );
    (html, text)
}

fn render_welcome(data: &EmailData) -> (String, String) {
    let html = format!(
        "<p>Hi {name},</p>\
         <p>Your {company} account is verified and ready. Happy listing!</p>\
         <p>Questions? Write to {support}.</p>",
        name = data.recipient_name,
        company = data.company_name,
        support = data.support_email,
    );
    let text = format!(
        "Hi {name},\n\nYour {company} account is verified and ready. \
         Questions? {support}",
        name = data.recipient_name,
        company = data.company_name,
        support = data.support_email,
    );
    (html, text)
}

/// Domain-level email operations: builds links and renders templates, then
/// hands the rendered bodies to the configured [`EmailSender`].
#[derive(Clone)]
pub struct EmailService {
    sender: Arc<dyn EmailSender>,
    frontend_url: String,
    support_email: String,
    company_name: String,
}

impl EmailService {
    pub fn new(sender: Arc<dyn EmailSender>, cfg: &EmailConfig) -> Self {
        Self {
            sender,
            frontend_url: cfg.frontend_url.clone(),
            support_email: cfg.support_email.clone(),
            company_name: cfg.company_name.clone(),
        }
    }

    pub async fn send_verification_email(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        token: &str,
    ) -> anyhow::Result<()> {
        let expiry = OffsetDateTime::now_utc() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS);
        let data = EmailData {
            recipient_name: recipient_name.to_string(),
            recipient_email: recipient_email.to_string(),
            subject: "Verify Your Email Address".to_string(),
            verification_link: Some(format!(
                "{}/verify-email?token={}",
                self.frontend_url, token
            )),
            company_name: self.company_name.clone(),
            support_email: self.support_email.clone(),
            expiry_display: Some(expiry.format(&Rfc2822).unwrap_or_default()),
        };
        let (html, text) = render_verification(&data);
        self.sender
            .send(
                &data.recipient_email,
                &data.recipient_name,
                &data.subject,
                &html,
                &text,
            )
            .await
    }

    pub async fn send_welcome_email(
        &self,
        recipient_email: &str,
        recipient_name: &str,
    ) -> anyhow::Result<()> {
        let data = EmailData {
            recipient_name: recipient_name.to_string(),
            recipient_email: recipient_email.to_string(),
            subject: format!("Welcome to {}", self.company_name),
            verification_link: None,
            company_name: self.company_name.clone(),
            support_email: self.support_email.clone(),
            expiry_display: None,
        };
        let (html, text) = render_welcome(&data);
        self.sender
            .send(
                &data.recipient_email,
                &data.recipient_name,
                &data.subject,
                &html,
                &text,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> EmailData {
        EmailData {
            recipient_name: "Rahim Uddin".into(),
            recipient_email: "rahim@example.com".into(),
            subject: "Verify Your Email Address".into(),
            verification_link: Some("https://ghor.online/verify-email?token=abc123".into()),
            company_name: "Ghor".into(),
            support_email: "support@ghor.online".into(),
            expiry_display: Some("Fri, 01 Jan 2027 00:00:00 +0000".into()),
        }
    }

    #[test]
    fn verification_template_contains_link_name_and_expiry() {
        let (html, text) = render_verification(&data());
        for body in [&html, &text] {
            assert!(body.contains("Rahim Uddin"));
            assert!(body.contains("https://ghor.online/verify-email?token=abc123"));
            assert!(body.contains("Fri, 01 Jan 2027"));
            assert!(body.contains("support@ghor.online"));
        }
    }

    #[test]
    fn welcome_template_mentions_company() {
        let (html, text) = render_welcome(&data());
        assert!(html.contains("Ghor"));
        assert!(text.contains("Ghor"));
    }
}
