use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{StoredUser, UserId};

/// Filename of the registered-user list
pub const USERS_FILE: &str = "users.json";

/// Flat-file account store
///
/// The whole file is rewritten on every signup. The write lock spans the
/// duplicate check, ID assignment and file rewrite, so concurrent signups
/// cannot lose an update or hand out the same ID twice.
pub struct UserStore {
    path: PathBuf,
    users: RwLock<Vec<StoredUser>>,
}

impl UserStore {
    /// Loads `users.json` from `data_dir`; an absent file is a fresh install
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(USERS_FILE);
        let users = if path.exists() {
            Self::parse(super::load_json(&path))
        } else {
            Vec::new()
        };
        Self {
            path,
            users: RwLock::new(users),
        }
    }

    fn parse(value: Option<Value>) -> Vec<StoredUser> {
        let entries = match value {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                tracing::warn!("User data is not an array, starting with no accounts");
                return Vec::new();
            }
            None => return Vec::new(),
        };

        let mut users = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<StoredUser>(entry) {
                Ok(user) => users.push(user),
                Err(error) => {
                    tracing::warn!(error = %error, "Skipping malformed user entry");
                }
            }
        }
        users
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<StoredUser> {
        let email = email.to_lowercase();
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.email.to_lowercase() == email)
            .cloned()
    }

    pub async fn find_by_id(&self, id: UserId) -> Option<StoredUser> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    /// Registers a new account and rewrites the backing file
    ///
    /// Fails with a conflict when the email is already taken, compared
    /// case-insensitively. IDs are sequential: one past the current maximum.
    pub async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> AppResult<StoredUser> {
        let email_lower = email.to_lowercase();
        let mut users = self.users.write().await;

        if users.iter().any(|user| user.email.to_lowercase() == email_lower) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let next_id = users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        let user = StoredUser {
            id: next_id,
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        };

        users.push(user.clone());
        if let Err(error) = self.persist(&users) {
            // Keep memory and disk consistent when the rewrite fails
            users.pop();
            return Err(error);
        }

        tracing::info!(user_id = user.id, "Registered new account");
        Ok(user)
    }

    fn persist(&self, users: &[StoredUser]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|error| AppError::Storage(format!("{}: {}", parent.display(), error)))?;
        }
        let json = serde_json::to_string_pretty(users)
            .map_err(|error| AppError::Storage(error.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|error| AppError::Storage(format!("{}: {}", self.path.display(), error)))
    }
}
