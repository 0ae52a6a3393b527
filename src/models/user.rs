use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for a registered account
pub type UserId = i64;

/// An account as persisted in the user store
///
/// Field names follow the on-disk JSON (`passwordHash`, `createdAt`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The public view of an account, safe to return to clients
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredUser> for User {
    fn from(stored: &StoredUser) -> Self {
        User {
            id: stored.id,
            name: stored.name.clone(),
            email: stored.email.clone(),
            created_at: stored.created_at,
        }
    }
}
