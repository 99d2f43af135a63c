use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{EmailMessage, EmailProvider};

/// Records outgoing mail instead of delivering it. The `sent` handle is
/// shared so tests and the dev dashboard can inspect what would have gone
/// out.
pub struct MockEmailProvider {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockEmailProvider {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<EmailMessage>>> {
        Arc::clone(&self.sent)
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        tracing::info!(to = %message.to, subject = %message.subject, "mock email captured");
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
