//! Desktop notifications
//!
//! The only user-visible error channel of the daemon. Delivery is best
//! effort: failures are logged and never propagated.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use crate::config::NotifySettings;

/// Fire-and-forget user notification
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Shows a notification; never fails
    async fn notify(&self, title: &str, message: &str);
}

/// `notify-send` backed notifier
#[derive(Debug, Clone)]
pub struct NotifySend {
    program: PathBuf,
}

impl NotifySend {
    /// Creates a notifier running the given program
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Creates a notifier from the notification settings
    #[must_use]
    pub fn from_settings(settings: &NotifySettings) -> Self {
        Self::new(&settings.program)
    }
}

impl Default for NotifySend {
    fn default() -> Self {
        Self::new("notify-send")
    }
}

#[async_trait]
impl Notifier for NotifySend {
    async fn notify(&self, title: &str, message: &str) {
        tracing::debug!("Notify: {title}: {message}");
        match Command::new(&self.program)
            .arg(title)
            .arg(message)
            .output()
            .await
        {
            Ok(output) if output.status.success() => {}
            Ok(output) => tracing::warn!(
                "Error sending notification using {}: {}",
                self.program.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => tracing::warn!(
                "Error sending notification using {}: {e}",
                self.program.display()
            ),
        }
    }
}
