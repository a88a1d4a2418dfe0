/// Log-only mailer
///
/// Used when no SMTP host is configured. The verification link is logged in
/// full so a developer can follow it from the terminal.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use super::{templates, MailError, Mailer};

/// Mailer that writes messages to the log instead of sending them
#[derive(Debug, Clone)]
pub struct LogMailer {
    frontend_url: String,
}

impl LogMailer {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_email(&self, to: &str, token: &str) -> Result<(), MailError> {
        let mail = templates::verification(&self.frontend_url, token);

        info!(
            to = %to,
            subject = %mail.subject,
            link = %templates::verification_url(&self.frontend_url, token),
            "Verification email (not sent, no SMTP host)"
        );

        Ok(())
    }

    async fn send_event_registration_email(
        &self,
        to: &str,
        first_name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
    ) -> Result<(), MailError> {
        let mail = templates::event_registration(first_name, event_title, event_date);

        info!(
            to = %to,
            subject = %mail.subject,
            "Registration email (not sent, no SMTP host)"
        );

        Ok(())
    }
}
