/// SMTP delivery through `lettre`
///
/// The transport is built once at startup and shared by every request.
/// `EMAIL_SECURE=true` selects implicit TLS (usually port 465), otherwise the
/// connection is upgraded with STARTTLS (usually port 587).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::templates::{self, RenderedMail};
use super::{MailConfig, MailError, Mailer};

/// Mailer backed by an SMTP relay
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    frontend_url: String,
}

impl SmtpMailer {
    /// Builds the transport described by `config`
    ///
    /// No connection is opened here.
    ///
    /// # Errors
    ///
    /// - `MailError::InvalidAddress` if the sender address does not parse
    /// - `MailError::Transport` if the host is missing or TLS setup fails
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| MailError::Transport("No SMTP host configured".to_string()))?;

        let address = config
            .from_address
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {e}", config.from_address)))?;
        let from = Mailbox::new(Some(config.from_name.clone()), address);

        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?
        .port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from,
            frontend_url: config.frontend_url.clone(),
        })
    }

    async fn deliver(&self, to: &str, mail: RenderedMail) -> Result<(), MailError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{to}: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!(to = %to, "Email delivered");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification_email(&self, to: &str, token: &str) -> Result<(), MailError> {
        self.deliver(to, templates::verification(&self.frontend_url, token))
            .await
    }

    async fn send_event_registration_email(
        &self,
        to: &str,
        first_name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
    ) -> Result<(), MailError> {
        self.deliver(
            to,
            templates::event_registration(first_name, event_title, event_date),
        )
        .await
    }
}
