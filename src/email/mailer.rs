//! SMTP mailer (lettre).

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;

/// Async SMTP mailer. Built without a transport when SMTP_HOST is
/// unset, in which case every send is a debug-logged no-op so local
/// development works without a mail server.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    owner_email: String,
}

impl Mailer {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let from: Mailbox = config
            .email_from
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid EMAIL_FROM: {e}"))?;

        let transport = match &config.smtp {
            Some(smtp) => {
                let builder =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
                        .port(smtp.port)
                        .credentials(Credentials::new(
                            smtp.username.clone(),
                            smtp.password.clone(),
                        ));
                Some(builder.build())
            }
            None => {
                tracing::warn!("SMTP_HOST unset, outgoing email disabled");
                None
            }
        };

        Ok(Self {
            transport,
            from,
            owner_email: config.owner_email.clone(),
        })
    }

    pub fn owner_email(&self) -> &str {
        &self.owner_email
    }

    /// Sends one HTML mail. Errors are returned for the caller to log;
    /// nothing here retries.
    pub async fn send(&self, to: &str, subject: &str, html: String) -> anyhow::Result<()> {
        let Some(transport) = &self.transport else {
            tracing::debug!(to, subject, "mailer disabled, dropping email");
            return Ok(());
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()
                .map_err(|e| anyhow::anyhow!("invalid recipient {to}: {e}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        transport.send(message).await?;
        Ok(())
    }

    /// Spawned send that only logs the outcome.
    pub fn send_detached(&self, to: String, subject: String, html: String) {
        let mailer = self.clone();
        tokio::spawn(async move {
            match mailer.send(&to, &subject, html).await {
                Ok(()) => tracing::info!(to = %to, subject = %subject, "email sent"),
                Err(e) => tracing::error!(to = %to, subject = %subject, error = %e, "email failed"),
            }
        });
    }
}
