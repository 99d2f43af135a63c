use anyhow::Context;
use async_trait::async_trait;

use super::{EmailMessage, EmailProvider};

pub struct SendGridProvider {
    api_key: String,
    from_email: String,
    client: reqwest::Client,
}

impl SendGridProvider {
    pub fn new(api_key: String, from_email: String) -> Self {
        Self {
            api_key,
            from_email,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let mut content = vec![];
        if let Some(text) = &message.text {
            content.push(serde_json::json!({ "type": "text/plain", "value": text }));
        }
        content.push(serde_json::json!({ "type": "text/html", "value": message.html }));

        let body = serde_json::json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": self.from_email },
            "subject": message.subject,
            "content": content,
        });

        self.client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to reach SendGrid")?
            .error_for_status()
            .context("SendGrid API returned error")?;

        tracing::info!(to = %message.to, subject = %message.subject, "email sent");
        Ok(())
    }
}
