/// Message bodies
///
/// Rendering is kept apart from delivery so both mailers produce identical
/// subjects and bodies.

use chrono::{DateTime, Utc};

/// A rendered message, ready for any transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub html: String,
}

/// Link the user follows to verify their address
pub fn verification_url(frontend_url: &str, token: &str) -> String {
    format!("{}/verify-email/{}", frontend_url.trim_end_matches('/'), token)
}

/// Verification email
pub fn verification(frontend_url: &str, token: &str) -> RenderedMail {
    let url = escape_html(&verification_url(frontend_url, token));

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Verify Your Email Address</h2>
  <p>Thank you for registering with our Event Platform. Please click the button below to verify your email address:</p>
  <div style="text-align: center; margin: 30px 0;">
    <a href="{url}" style="background-color: #4CAF50; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; font-weight: bold;">Verify Email</a>
  </div>
  <p>If you did not create an account, please ignore this email.</p>
  <p>If the button does not work, copy this link into your browser:</p>
  <p><a href="{url}">{url}</a></p>
</div>"#
    );

    RenderedMail {
        subject: "Verify Your Email".to_string(),
        html,
    }
}

/// Registration confirmation email
pub fn event_registration(
    first_name: &str,
    event_title: &str,
    event_date: DateTime<Utc>,
) -> RenderedMail {
    let name = escape_html(first_name);
    let title = escape_html(event_title);
    let date = event_date.format("%B %-d, %Y");

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Registration Confirmed</h2>
  <p>Hello {name},</p>
  <p>Your registration for <strong>{title}</strong> on {date} has been confirmed.</p>
  <p>We look forward to seeing you at the event!</p>
  <p>If you have any questions, please don't hesitate to contact us.</p>
</div>"#
    );

    RenderedMail {
        subject: format!("Registration Confirmed: {}", event_title),
        html,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
