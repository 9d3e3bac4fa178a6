//! MongoDB user store
//!
//! Documents live in the `users` collection with a unique index on `email`.
//! Documents use camelCase field names
//! (`email`, `username`, `image`, `bookmarks`, `createdAt`, `updatedAt`).

use anyhow::Context;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{self, doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};

use super::{NewUser, User, UserStore};

const USERS_COLLECTION: &str = "users";

/// MongoDB duplicate key error code
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    email: String,
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default)]
    bookmarks: Vec<ObjectId>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl UserDocument {
    fn into_user(self) -> anyhow::Result<User> {
        let id = self.id.context("user document missing _id")?;
        Ok(User {
            id: id.to_hex(),
            email: self.email,
            username: self.username,
            image: self.image,
            bookmarks: self.bookmarks.into_iter().map(ObjectId::to_hex).collect(),
            created_at: to_chrono(self.created_at),
            updated_at: to_chrono(self.updated_at),
        })
    }
}

fn to_chrono(value: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

pub struct MongoUserStore {
    database: Database,
    users: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Connect and select the database. Does not perform network I/O until
    /// the first operation.
    pub async fn connect(uri: &str, database: &str) -> anyhow::Result<Self> {
        let client = mongodb::Client::with_uri_str(uri)
            .await
            .context("Failed to parse MongoDB connection string")?;
        let database = client.database(database);
        let users = database.collection::<UserDocument>(USERS_COLLECTION);

        tracing::info!(database = %database.name(), "MongoDB client configured");

        Ok(Self { database, users })
    }

    /// Ensure the unique `email` index exists
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.users
            .create_index(index)
            .await
            .context("Failed to create unique email index")?;

        tracing::info!(collection = USERS_COLLECTION, "Unique email index ensured");
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let document = self
            .users
            .find_one(doc! { "email": email })
            .await
            .context("Failed to query user by email")?;

        document.map(UserDocument::into_user).transpose()
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let now = bson::DateTime::now();
        let mut document = UserDocument {
            id: None,
            email: user.email,
            username: user.username,
            image: user.image,
            bookmarks: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        match self.users.insert_one(&document).await {
            Ok(result) => {
                document.id = result.inserted_id.as_object_id();
                document.into_user()
            }
            Err(e) if is_duplicate_key(&e) => {
                // Lost a race with a concurrent sign-in for the same email
                tracing::info!(
                    event = "user_create_duplicate",
                    "User already exists, returning stored record"
                );
                self.find_by_email(&document.email)
                    .await?
                    .context("user vanished after duplicate key error")
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to insert user")),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_uses_camel_case_field_names() {
        let document = UserDocument {
            id: None,
            email: "jane@example.com".to_string(),
            username: "Jane".to_string(),
            image: Some("https://example.com/jane.png".to_string()),
            bookmarks: Vec::new(),
            created_at: bson::DateTime::from_millis(0),
            updated_at: bson::DateTime::from_millis(0),
        };

        let serialized = bson::to_document(&document).unwrap();
        assert!(!serialized.contains_key("_id"));
        assert!(serialized.contains_key("createdAt"));
        assert!(serialized.contains_key("updatedAt"));
        assert_eq!(serialized.get_str("email").unwrap(), "jane@example.com");
    }

    #[test]
    fn test_into_user_converts_ids_and_timestamps() {
        let id = ObjectId::new();
        let bookmark = ObjectId::new();
        let document = UserDocument {
            id: Some(id),
            email: "jane@example.com".to_string(),
            username: "Jane".to_string(),
            image: None,
            bookmarks: vec![bookmark],
            created_at: bson::DateTime::from_millis(1_700_000_000_000),
            updated_at: bson::DateTime::from_millis(1_700_000_000_000),
        };

        let user = document.into_user().unwrap();
        assert_eq!(user.id, id.to_hex());
        assert_eq!(user.bookmarks, vec![bookmark.to_hex()]);
        assert_eq!(user.created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_into_user_requires_id() {
        let document = UserDocument {
            id: None,
            email: "jane@example.com".to_string(),
            username: "Jane".to_string(),
            image: None,
            bookmarks: Vec::new(),
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        };

        assert!(document.into_user().is_err());
    }
}
