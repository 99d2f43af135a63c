use async_trait::async_trait;

use super::{IdentityClaims, IdentityProvider};

/// Accepts tokens of the form `mock:<email>:<name>` and derives a stable
/// subject id from the email, so local development needs no Google account.
pub struct MockIdentityProvider;

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> anyhow::Result<IdentityClaims> {
        let mut parts = id_token.splitn(3, ':');
        let (prefix, email, name) = (parts.next(), parts.next(), parts.next());

        match (prefix, email, name) {
            (Some("mock"), Some(email), Some(name)) if !email.is_empty() => Ok(IdentityClaims {
                id: format!("mock-google-{email}"),
                email: email.to_string(),
                name: name.to_string(),
                picture: None,
            }),
            _ => anyhow::bail!("invalid mock id token, expected mock:<email>:<name>"),
        }
    }
}
