use crate::error::Result;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// PHC-formatted password hash. API responses go through [`User::public`].
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A new user with a normalized email. Hashing the password is the
    /// caller's job; this type never sees plaintext.
    pub fn new(email: &str, password_hash: String) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            email: paths::normalize_email(email)?,
            password_hash,
            created_at: Utc::now(),
        })
    }

    /// Public view without the password hash.
    pub fn public(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "email": self.email,
            "created_at": self.created_at,
        })
    }
}
