//! Outbound mail transport.
//!
//! Reminder mails go through one pluggable transport: SMTP when `[email]`
//! is configured, otherwise a log-only transport that records what would
//! have been sent.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use puspresma_common::{AppError, AppResult, EmailConfig};
use serde::Serialize;
use tracing::info;

/// One reminder email payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderMail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
}

/// Mail transport.
#[derive(Clone)]
pub enum Mailer {
    /// Deliver over SMTP.
    Smtp(SmtpMailer),
    /// Log the payload instead of delivering it.
    Log,
}

impl Mailer {
    /// Build the transport the configuration asks for.
    pub fn from_config(config: Option<&EmailConfig>) -> AppResult<Self> {
        match config {
            Some(config) => Ok(Self::Smtp(SmtpMailer::new(config)?)),
            None => Ok(Self::Log),
        }
    }

    /// Transport name for reporting.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Log => "log",
        }
    }

    /// Send one payload.
    pub async fn send(&self, mail: &ReminderMail) -> AppResult<()> {
        match self {
            Self::Smtp(smtp) => smtp.send(mail).await,
            Self::Log => {
                info!(to = %mail.to, subject = %mail.subject, "Reminder email (log transport)");
                Ok(())
            }
        }
    }
}

/// SMTP transport backed by lettre.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build an SMTP transport from configuration.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Config(format!("Konfigurasi SMTP tidak valid: {e}")))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| AppError::Config(format!("Alamat pengirim tidak valid: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    async fn send(&self, mail: &ReminderMail) -> AppResult<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(mail
                .to
                .parse()
                .map_err(|e| AppError::BadRequest(format!("Alamat penerima tidak valid: {e}")))?)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| AppError::Internal(format!("Gagal menyusun email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalService(format!("Pengiriman email gagal: {e}")))?;
        Ok(())
    }
}
