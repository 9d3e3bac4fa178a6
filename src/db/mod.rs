//! User persistence
//!
//! - `models`: the `User` record and the insert payload
//! - `mongo`: MongoDB-backed store (`users` collection)
//! - `memory`: in-process store for tests and local runs

pub mod memory;
pub mod models;
pub mod mongo;

pub use memory::MemoryUserStore;
pub use models::{NewUser, User};
pub use mongo::MongoUserStore;

use std::sync::Arc;

use crate::config::Config;

/// Port for user persistence.
///
/// Email is the lookup key. Implementations must not create two records
/// for the same email.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Insert a new user. If a record with the same email already exists the
    /// existing record is returned unchanged.
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> anyhow::Result<()>;
}

/// Build the store selected by `MONGODB_URI`.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn UserStore>> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory user store; records are lost on restart");
        return Ok(Arc::new(MemoryUserStore::new()));
    }

    let store = MongoUserStore::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    store.ensure_indexes().await?;
    Ok(Arc::new(store))
}
