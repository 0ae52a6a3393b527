use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{StoredUser, User, UserId};
use crate::store::UserStore;

/// Bcrypt work factor for newly hashed passwords
pub const HASH_COST: u32 = 10;

/// Claims embedded in an issued bearer token
///
/// `id` is the source of truth on later requests; `email` and `name` are
/// informational only and never trusted for lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys for bearer tokens
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_days: i64,
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_days,
        }
    }

    /// Issues a signed token for `user` with the configured expiry
    pub fn issue(&self, user: &StoredUser) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.expiry_days)).timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|error| AppError::Internal(format!("Failed to sign token: {}", error)))
    }

    /// Verifies signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))
    }
}

/// Registers an account and returns its public view plus a fresh token
pub async fn signup(
    store: &UserStore,
    keys: &TokenKeys,
    name: &str,
    email: &str,
    password: &str,
) -> AppResult<(User, String)> {
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }

    let hash = bcrypt::hash(password, HASH_COST)
        .map_err(|error| AppError::Internal(format!("Failed to hash password: {}", error)))?;

    let user = store
        .create(name.to_string(), email.to_string(), hash)
        .await?;
    let token = keys.issue(&user)?;

    Ok((User::from(&user), token))
}

/// Verifies credentials and returns the public user plus a fresh token
///
/// Every failure path reports the same generic message so responses do not
/// reveal which emails are registered.
pub async fn login(
    store: &UserStore,
    keys: &TokenKeys,
    email: &str,
    password: &str,
) -> AppResult<(User, String)> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = store
        .find_by_email(email)
        .await
        .ok_or_else(invalid_credentials)?;

    let ok = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
    if !ok {
        return Err(invalid_credentials());
    }

    let token = keys.issue(&user)?;
    Ok((User::from(&user), token))
}

/// Re-resolves the account behind verified claims
pub async fn current_user(store: &UserStore, claims: &Claims) -> AppResult<User> {
    store
        .find_by_id(claims.id)
        .await
        .map(|user| User::from(&user))
        .ok_or_else(|| AppError::Auth("User not found".to_string()))
}

fn invalid_credentials() -> AppError {
    AppError::Auth("Invalid email or password".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new("test-secret", 7)
    }

    fn sample_user() -> StoredUser {
        StoredUser {
            id: 5,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "unused".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let keys = keys();
        let token = keys.issue(&sample_user()).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.id, 5);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.name, "Ada");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = keys().issue(&sample_user()).unwrap();
        let other = TokenKeys::new("different-secret", 7);
        assert!(matches!(other.verify(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let expired = TokenKeys::new("test-secret", -1);
        let token = expired.issue(&sample_user()).unwrap();
        assert!(matches!(expired.verify(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(keys().verify("not-a-token").is_err());
    }

    #[tokio::test]
    async fn test_signup_requires_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::load(dir.path());
        let keys = keys();

        for (name, email, password) in [
            ("", "a@b.c", "pw"),
            ("Ada", "", "pw"),
            ("Ada", "a@b.c", ""),
        ] {
            let err = signup(&store, &keys, name, email, password).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_signup_then_login_then_current_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::load(dir.path());
        let keys = keys();

        let (user, _) = signup(&store, &keys, "Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(user.id, 1);

        let (logged_in, token) = login(&store, &keys, "ada@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);

        let claims = keys.verify(&token).unwrap();
        let resolved = current_user(&store, &claims).await.unwrap();
        assert_eq!(resolved.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::load(dir.path());
        let keys = keys();

        signup(&store, &keys, "Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();

        let unknown = login(&store, &keys, "nobody@example.com", "hunter2")
            .await
            .unwrap_err();
        let wrong_password = login(&store, &keys, "ada@example.com", "wrong")
            .await
            .unwrap_err();

        assert_eq!(unknown.to_string(), wrong_password.to_string());
        assert!(matches!(unknown, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn test_current_user_fails_for_vanished_account() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::load(dir.path());
        let keys = keys();

        let claims = keys.verify(&keys.issue(&sample_user()).unwrap()).unwrap();
        let err = current_user(&store, &claims).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }
}
