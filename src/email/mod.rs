use crate::{book::Book, Result};
use std::{env, error::Error, fmt};

pub mod templates;

pub const RESEND_API_URL: &str = "https://api.resend.com/emails";
const FROM_ADDRESS: &str = "Book Release Tracker <onboarding@resend.dev>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Discovery,
    Reminder,
    ReleaseDay,
}

impl EmailKind {
    pub fn log_name(self) -> &'static str {
        match self {
            EmailKind::Discovery => "Book Discovery",
            EmailKind::Reminder => "Release Reminder",
            EmailKind::ReleaseDay => "Release Day",
        }
    }
}

/// Delivery seam, so the monitor's bookkeeping can be tested without
/// touching the network.
pub trait Mailer {
    fn send_books(&self, books: &[Book], kind: EmailKind) -> Result<()>;
    fn send_failure_alert(&self, error_details: &str) -> Result<()>;
    fn send_test(&self) -> Result<()>;
}

#[derive(Debug)]
pub struct EmailSendError {
    pub status: reqwest::StatusCode,
    pub body: String,
}

impl fmt::Display for EmailSendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Resend returned {}: {}", self.status, self.body)
    }
}

impl Error for EmailSendError {}

pub struct ResendMailer {
    api_key: String,
    email_to: String,
    api_url: String,
    client: reqwest::blocking::Client,
}

impl ResendMailer {
    pub fn from_env() -> Result<ResendMailer> {
        let api_key = env::var("RESEND_API_KEY")
            .map_err(|_| "RESEND_API_KEY environment variable is required")?;
        let email_to =
            env::var("EMAIL_TO").map_err(|_| "EMAIL_TO environment variable is required")?;
        Ok(ResendMailer {
            api_key,
            email_to,
            api_url: RESEND_API_URL.to_string(),
            client: reqwest::blocking::Client::new(),
        })
    }

    fn send(&self, subject: &str, html: &str, email_type: &str) -> Result<()> {
        let payload = serde_json::json!({
            "from": FROM_ADDRESS,
            "to": [self.email_to],
            "subject": subject,
            "html": html,
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;

        let status = resp.status();
        if status.is_success() {
            let email_id = resp
                .json::<serde_json::Value>()
                .ok()
                .and_then(|v| v.get("id").and_then(|id| id.as_str().map(String::from)))
                .unwrap_or_else(|| "unknown".to_string());
            log::info!(
                "{} email sent successfully to {} (ID: {})",
                email_type,
                self.email_to,
                email_id
            );
            Ok(())
        } else {
            let body = resp.text().unwrap_or_default();
            Err(Box::new(EmailSendError { status, body }))
        }
    }
}

impl Mailer for ResendMailer {
    fn send_books(&self, books: &[Book], kind: EmailKind) -> Result<()> {
        if books.is_empty() {
            log::info!("No books for {} notification", kind.log_name());
            return Ok(());
        }
        let subject = templates::subject(kind, books.len());
        let html = templates::notification_email(books, kind);
        self.send(&subject, &html, kind.log_name())
    }

    fn send_failure_alert(&self, error_details: &str) -> Result<()> {
        let html = templates::failure_alert_email(error_details);
        self.send(
            "\u{1F6A8} Book Tracker Failure Alert - Action Required",
            &html,
            "Tracker Failure",
        )
    }

    fn send_test(&self) -> Result<()> {
        let html = templates::test_email();
        self.send(
            "\u{1F4DA} Test Email - Book Release Tracker",
            &html,
            "Test",
        )
    }
}
