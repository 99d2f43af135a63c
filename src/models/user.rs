use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Argon2 hash; absent for Google-authenticated users.
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
    pub picture: Option<String>,
    pub created_at: NaiveDateTime,
}
