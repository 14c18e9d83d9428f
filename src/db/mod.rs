use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ClientOptions,
    Client, Collection,
};
use tokio::time::timeout;

use crate::config::Config;
use crate::models::{User, UserPayload};

pub mod users;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub const USERS_COLLECTION: &str = "users";

/// Persistence operations the user handlers depend on.
///
/// Every method reports driver failures through `anyhow`; "no match" is never
/// an error here, callers decide what an empty result means.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new record and returns the identifier the store kept.
    async fn insert_user(&self, user: &User) -> Result<ObjectId>;

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>>;

    /// Replaces name, location and title. Returns the matched count.
    async fn update_user(&self, id: ObjectId, fields: &UserPayload) -> Result<u64>;

    /// Returns the deleted count.
    async fn delete_user(&self, id: ObjectId) -> Result<u64>;

    /// Every record in store order, without filter or pagination.
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn ping(&self) -> Result<()>;
}

/// Handle to the document database: one shared client scoped to one database.
///
/// Cloning is cheap; all clones share the driver's connection pool.
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// Connects and pings the server, failing if it is not reachable within
    /// `config.connect_timeout`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.mongo_uri)
            .await
            .context("invalid MongoDB connection string")?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client = Client::with_options(options).context("failed to build MongoDB client")?;
        let db = Self {
            client,
            database_name: config.database_name.clone(),
        };

        match timeout(config.connect_timeout, db.run_ping()).await {
            Ok(result) => result.context("MongoDB ping failed")?,
            Err(_) => anyhow::bail!(
                "MongoDB did not answer a ping within {}s",
                config.connect_timeout.as_secs()
            ),
        }

        tracing::info!(database = %db.database_name(), "Connected to MongoDB");
        Ok(db)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Typed handle to a named collection in the configured database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.client.database(&self.database_name).collection::<T>(name)
    }

    pub fn users(&self) -> Collection<User> {
        self.collection(USERS_COLLECTION)
    }

    async fn run_ping(&self) -> Result<()> {
        self.client
            .database(&self.database_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Closes the client's connections and background workers.
    pub async fn shutdown(self) {
        tracing::info!("Closing MongoDB client");
        self.client.shutdown().await;
    }
}
