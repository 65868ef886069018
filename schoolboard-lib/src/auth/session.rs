//! Persisted credential record

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::AccessToken;
use crate::error::StorageError;
use crate::storage::LocalStorage;

/// Storage key the dashboard keeps its credential record under.
pub const DEFAULT_STORAGE_KEY: &str = "userKogGame";

/// Token bundle inside a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// The credential record persisted in local storage.
///
/// Serialized as `{"token": {"accessToken": "..."}, "user": {...}}`. The
/// `user` payload belongs to the login flow and is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

impl Session {
    /// Creates a session holding only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: SessionToken {
                access_token: access_token.into(),
                refresh_token: None,
                expires_at: None,
            },
            user: None,
        }
    }

    /// Attaches the user profile returned by the login endpoint.
    pub fn with_user(mut self, user: serde_json::Value) -> Self {
        self.user = Some(user);
        self
    }

    /// Parses a stored record.
    ///
    /// Returns `None` for malformed JSON or an empty access token; both
    /// count as unauthenticated.
    pub fn parse(raw: &str) -> Option<Self> {
        let session: Session = serde_json::from_str(raw).ok()?;
        if session.token.access_token.trim().is_empty() {
            return None;
        }
        Some(session)
    }

    /// Returns the bearer token for this session.
    pub fn access_token(&self) -> AccessToken {
        let token = AccessToken::new(self.token.access_token.as_str());
        match self.token.expires_at {
            Some(at) => token.expiring_at(at),
            None => token,
        }
    }

    /// Loads the session stored under `key`.
    ///
    /// A missing or unparsable record yields `Ok(None)`.
    pub async fn load(storage: &dyn LocalStorage, key: &str) -> Result<Option<Self>, StorageError> {
        Ok(storage
            .get_item(key)
            .await?
            .as_deref()
            .and_then(Self::parse))
    }

    /// Persists this session under `key`.
    pub async fn save(&self, storage: &dyn LocalStorage, key: &str) -> Result<(), StorageError> {
        let raw = serde_json::to_string(self)?;
        storage.set_item(key, &raw).await
    }

    /// Removes any session stored under `key`.
    pub async fn clear(storage: &dyn LocalStorage, key: &str) -> Result<(), StorageError> {
        storage.remove_item(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_parse_nested_token() {
        let raw = r#"{"token":{"accessToken":"abc","refreshToken":"r"},"user":{"name":"Ana"}}"#;
        let session = Session::parse(raw).unwrap();
        assert_eq!(session.token.access_token, "abc");
        assert_eq!(session.token.refresh_token.as_deref(), Some("r"));
        assert_eq!(session.access_token().authorization(), "Bearer abc");
    }

    #[test]
    fn test_expiry_carried_into_access_token() {
        let raw = r#"{"token":{"accessToken":"abc","expiresAt":"2020-01-01T00:00:00Z"}}"#;
        let token = Session::parse(raw).unwrap().access_token();
        assert!(token.is_expired());
        assert!(!Session::new("abc").access_token().is_expired());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Session::parse("not json").is_none());
        assert!(Session::parse(r#"{"user":{}}"#).is_none());
        assert!(Session::parse(r#"{"token":{"accessToken":"  "}}"#).is_none());
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let storage = MemoryStorage::new();
        assert!(Session::load(&storage, DEFAULT_STORAGE_KEY).await.unwrap().is_none());

        let session = Session::new("tok").with_user(serde_json::json!({"id": 1}));
        session.save(&storage, DEFAULT_STORAGE_KEY).await.unwrap();
        let loaded = Session::load(&storage, DEFAULT_STORAGE_KEY).await.unwrap();
        assert_eq!(loaded, Some(session));

        Session::clear(&storage, DEFAULT_STORAGE_KEY).await.unwrap();
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).await.unwrap().is_none());
    }
}
