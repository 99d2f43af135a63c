pub mod google;
pub mod mock;

use async_trait::async_trait;

/// Identity asserted by the external OAuth provider.
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_id_token(&self, id_token: &str) -> anyhow::Result<IdentityClaims>;
}
