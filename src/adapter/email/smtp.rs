use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::error;

use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::email::EmailSender;
use crate::infra::config::SMTPConfig;

#[derive(Clone)]
pub struct SMTPEmailSender {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SMTPEmailSender {
    /// Fails at startup when the configured sender address does not parse.
    pub fn new(config: &SMTPConfig) -> anyhow::Result<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|err| anyhow::anyhow!("invalid smtp.from address: {}", err))?;

        let mut transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port);
        if !config.username.is_empty() {
            transport = transport.credentials(Credentials::new(config.username.clone(), config.password.clone()));
        }

        Ok(Self {
            from,
            mailer: transport.build(),
        })
    }
}

#[async_trait]
impl EmailSender for SMTPEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|_| AppError::EmailSendError("Invalid recipient address".to_string()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|err| AppError::EmailSendError(err.to_string()))?;

        self.mailer.send(message).await.map_err(|err| {
            error!("SMTP delivery failed: {}", err);
            AppError::EmailSendError(err.to_string())
        })?;
        Ok(())
    }
}
