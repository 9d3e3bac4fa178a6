use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{NewUser, User, UserStore};

/// In-process user store.
///
/// The write lock is held across the existence check and the insert, so
/// concurrent creates for one email yield a single record.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.write().await;

        if let Some(existing) = users.iter().find(|u| u.email == user.email) {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let record = User {
            id: ObjectId::new().to_hex(),
            email: user.email,
            username: user.username,
            image: user.image,
            bookmarks: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
