use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::email::EmailSender;

/// Writes each message to its own file instead of delivering it.
/// Used in development so reset links can be picked up from disk.
#[derive(Clone)]
pub struct LocalEmailSender {
    output_dir: PathBuf,
}

impl LocalEmailSender {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn file_name(to: &str) -> String {
        let recipient: String = to
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_{}_{}.eml", Utc::now().format("%Y%m%dT%H%M%S"), recipient, Uuid::now_v7())
    }
}

#[async_trait]
impl EmailSender for LocalEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|err| AppError::EmailSendError(err.to_string()))?;

        let path = self.output_dir.join(Self::file_name(to));
        let message = format!("To: {to}\nSubject: {subject}\n\n{body}\n");
        tokio::fs::write(&path, message)
            .await
            .map_err(|err| AppError::EmailSendError(err.to_string()))?;

        debug!(path = %path.display(), "Email written to disk");
        Ok(())
    }
}
