//! Email service for leave request status notifications and the contact form, via SMTP.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::info;

use leavedesk_core::models::{Employee, LeaveRequest};
use leavedesk_core::EmailConfig;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Invalid SMTP_FROM: {0}")]
    InvalidSender(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// A rendered notification, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Render the status update an employee receives about one of their requests.
pub fn render_status_update(employee: &Employee, request: &LeaveRequest) -> StatusEmail {
    let status = request.leave_status();
    let start_date = request
        .start_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    let body = format!(
        "Hello {name},\n\n\
         This is an update on your {leave_type} request.\n\n\
         Status: {status}\n\
         Reason/Details: {reason}\n\
         Days: {days}\n\
         Start date: {start_date}\n\n\
         This is an automated message from the HR team.\n",
        name = employee.name,
        leave_type = request.leave_type,
        status = status,
        reason = request.reason.as_deref().unwrap_or("-"),
        days = request.days_requested,
        start_date = start_date,
    );

    StatusEmail {
        to: employee.email.clone(),
        subject: format!(
            "Leave request update: {} - {}",
            request.leave_type, status
        ),
        body,
    }
}

/// Email service for notifications.
/// Absent when e-mail is disabled or SMTP is not configured.
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl EmailService {
    /// Create email service from config. Returns `None` if disabled or SMTP not configured.
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        if !config.enabled {
            tracing::debug!("Email disabled (EMAIL_ENABLED=false)");
            return None;
        }
        let host = config.smtp_host.as_deref()?;
        let from = config.smtp_from.clone()?;
        let port = config.smtp_port;
        let credentials = match (config.smtp_user.as_deref(), config.smtp_password.as_deref()) {
            (Some(u), Some(p)) => Some(Credentials::new(u.to_string(), p.to_string())),
            _ => None,
        };

        let mailer = if config.smtp_tls {
            let b = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host) {
                Ok(b) => b.port(port),
                Err(e) => {
                    tracing::warn!(host = %host, error = %e, "Invalid SMTP relay, email disabled");
                    return None;
                }
            };
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            info!(host = %host, port = port, "Email service initialized (SMTP with STARTTLS)");
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            info!(host = %host, port = port, "Email service initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }

    /// Send a plain-text email to the given recipients.
    pub async fn send(&self, to: &[String], subject: &str, body_plain: &str) -> Result<(), EmailError> {
        if to.is_empty() {
            return Ok(());
        }
        let to_addrs = parse_recipients(to)?;
        let from_addr: Mailbox = self
            .from
            .parse()
            .map_err(|e| EmailError::InvalidSender(format!("{}", e)))?;

        let mut builder = Message::builder().from(from_addr).subject(subject);
        for mb in to_addrs {
            builder = builder.to(mb);
        }
        let email = builder
            .header(ContentType::TEXT_PLAIN)
            .body(body_plain.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;
        info!(count = to.len(), subject = %subject, "Email sent");
        Ok(())
    }

    /// Tell an employee the current status of one of their requests.
    pub async fn notify_status(
        &self,
        employee: &Employee,
        request: &LeaveRequest,
    ) -> Result<(), EmailError> {
        let email = render_status_update(employee, request);
        self.send(&[email.to], &email.subject, &email.body).await?;
        info!(request_id = request.request_id, "Status notification sent");
        Ok(())
    }

    /// Contact form message.
    pub async fn send_contact(&self, to: &str, subject: &str, message: &str) -> Result<(), EmailError> {
        self.send(&[to.to_string()], subject, message).await
    }
}

fn parse_recipients(to: &[String]) -> Result<Vec<Mailbox>, EmailError> {
    to.iter()
        .map(|s| {
            s.trim()
                .parse::<Mailbox>()
                .map_err(|_| EmailError::InvalidRecipient(s.clone()))
        })
        .collect()
}
