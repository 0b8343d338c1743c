//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identifier - assigned by storage, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored identity record
///
/// Only storage builds these (see [`User::from_storage`]); the password hash
/// never leaves the crate through serialization, use [`UserProfile`] instead.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Rebuild a user from a persisted row
    pub fn from_storage(
        id: UserId,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Public projection of this user
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[hidden]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Data needed to create a user; the password is already hashed
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password_hash", &"[hidden]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Public projection of a user, safe to expose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::from_storage(
            UserId::new(7),
            "a@x.com",
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
            "A",
            "B",
            Utc::now(),
        )
    }

    #[test]
    fn test_user_accessors() {
        let user = create_test_user();

        assert_eq!(user.id().value(), 7);
        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.first_name(), "A");
        assert_eq!(user.last_name(), "B");
        assert!(user.password_hash().starts_with("$argon2id$"));
    }

    #[test]
    fn test_profile_copies_public_fields() {
        let user = create_test_user();
        let profile = user.profile();

        assert_eq!(profile.id, user.id());
        assert_eq!(profile.email, user.email());
        assert_eq!(profile.first_name, user.first_name());
        assert_eq!(profile.last_name, user.last_name());
        assert_eq!(profile.created_at, user.created_at());
    }

    #[test]
    fn test_profile_serialization_excludes_password() {
        let user = create_test_user();

        let json = serde_json::to_value(user.profile()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(object["id"], 7);
        assert_eq!(object["email"], "a@x.com");
        assert!(object.contains_key("first_name"));
        assert!(object.contains_key("last_name"));
        assert!(object.contains_key("created_at"));
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_debug_hides_password_hash() {
        let user = create_test_user();
        let debug = format!("{:?}", user);

        assert!(debug.contains("[hidden]"));
        assert!(!debug.contains("argon2"));
    }

    #[test]
    fn test_user_id_display() {
        assert_eq!(UserId::from(42).to_string(), "42");
    }
}
