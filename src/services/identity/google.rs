use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::{IdentityClaims, IdentityProvider};

/// Verifies Google id tokens through the tokeninfo endpoint, which checks
/// the token's own signature server-side; we only validate the audience.
pub struct GoogleIdentityProvider {
    client_id: String,
    client: reqwest::Client,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    picture: Option<String>,
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> anyhow::Result<IdentityClaims> {
        let info: TokenInfo = self
            .client
            .get("https://oauth2.googleapis.com/tokeninfo")
            .query(&[("id_token", id_token)])
            .send()
            .await
            .context("failed to reach Google tokeninfo")?
            .error_for_status()
            .context("Google rejected the id token")?
            .json()
            .await
            .context("failed to parse tokeninfo response")?;

        anyhow::ensure!(info.aud == self.client_id, "id token audience mismatch");

        Ok(IdentityClaims {
            id: info.sub,
            email: info.email,
            name: info.name,
            picture: info.picture,
        })
    }
}
