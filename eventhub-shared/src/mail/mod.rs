/// Transactional email
///
/// Two messages exist: the address verification link sent at registration
/// and the confirmation sent when a participant is added to an event.
///
/// Delivery goes through the [`Mailer`] trait so handlers hold an
/// `Arc<dyn Mailer>` and never know whether SMTP is configured:
///
/// - [`smtp::SmtpMailer`]: real delivery through `lettre`
/// - [`log::LogMailer`]: writes the message to the log (development, tests)
///
/// Callers treat delivery as best effort: a failed send is logged and the
/// request carries on.
///
/// # Example
///
/// ```no_run
/// use eventhub_shared::mail::{build_mailer, MailConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = build_mailer(&MailConfig::default())?; // no host: LogMailer
/// mailer.send_verification_email("ada@example.com", "token123").await?;
/// # Ok(())
/// # }
/// ```

pub mod log;
pub mod smtp;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Display name on every outgoing message
pub const DEFAULT_FROM_NAME: &str = "Event Platform";

/// Error type for mail delivery
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Sender or recipient is not a valid mailbox
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(String),

    /// SMTP connection or delivery failed
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Mail settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP host; `None` selects the log-only mailer
    pub host: Option<String>,

    pub port: u16,

    /// Implicit TLS when true, STARTTLS otherwise
    pub secure: bool,

    pub username: Option<String>,
    pub password: Option<String>,

    pub from_address: String,
    pub from_name: String,

    /// Base URL of the web client; verification links point here
    pub frontend_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 587,
            secure: false,
            username: None,
            password: None,
            from_address: "noreply@eventhub.local".to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Outgoing mail operations
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the address verification link for `token`
    async fn send_verification_email(&self, to: &str, token: &str) -> Result<(), MailError>;

    /// Confirms a participant's registration for an event
    async fn send_event_registration_email(
        &self,
        to: &str,
        first_name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
    ) -> Result<(), MailError>;
}

/// Builds the mailer selected by `config`
///
/// # Errors
///
/// Returns `MailError` if SMTP is configured with an unusable host or sender
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match config.host {
        Some(_) => Ok(Arc::new(smtp::SmtpMailer::new(config)?)),
        None => {
            tracing::info!("EMAIL_HOST not set, outgoing mail will only be logged");
            Ok(Arc::new(log::LogMailer::new(&config.frontend_url)))
        }
    }
}
