use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Internal identifier (hex `ObjectId`)
    pub id: String,
    /// Unique lookup key
    pub email: String,
    /// Display name, at most 20 characters
    pub username: String,
    /// Profile picture URL
    pub image: Option<String>,
    /// Saved property ids
    #[serde(default)]
    pub bookmarks: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when a user is first created
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub image: Option<String>,
}
