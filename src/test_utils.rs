//! Test utilities for driving the service in unit and integration tests
//!
//! `TestContext` builds the full router over any `UserStore`, by default the
//! in-memory one. `MongoTestContext` starts a throwaway MongoDB container for
//! tests that need the real driver.

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mongo::Mongo;
use tower::util::ServiceExt;

use crate::{
    build_router,
    config::Config,
    db::{memory::InMemoryUserStore, Database, UserStore},
    models::{User, UserPayload},
    AppState,
};

/// Router plus the store behind it
pub struct TestContext {
    pub app: Router,
    pub store: Arc<dyn UserStore>,
}

impl TestContext {
    /// Service over a fresh in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryUserStore::new()), Config::default())
    }

    pub fn with_store(store: Arc<dyn UserStore>, config: Config) -> Self {
        let state = Arc::new(AppState {
            store: store.clone(),
            config,
        });
        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends one request and returns the status with the decoded JSON body.
    /// A `None` body sends an empty request body.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
            None => Body::empty(),
        };
        self.send_raw(method, uri, body).await
    }

    pub async fn send_raw(&self, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Creates a user through the API and returns its hex id
    pub async fn create_user(&self, name: &str, location: &str, title: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/user",
                Some(serde_json::json!({"name": name, "location": location, "title": title})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["data"]["inserted_id"].as_str().unwrap().to_string()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn sample_payload(name: &str) -> UserPayload {
    UserPayload {
        name: name.to_string(),
        location: "NY".to_string(),
        title: "Eng".to_string(),
    }
}

/// Store whose every operation fails like an unreachable server
#[derive(Debug, Default)]
pub struct FailingUserStore;

impl FailingUserStore {
    pub const MESSAGE: &'static str = "No connection could be made: server selection timeout";
}

#[async_trait]
impl UserStore for FailingUserStore {
    async fn insert_user(&self, _user: &User) -> Result<ObjectId> {
        anyhow::bail!(Self::MESSAGE)
    }

    async fn find_user(&self, _id: ObjectId) -> Result<Option<User>> {
        anyhow::bail!(Self::MESSAGE)
    }

    async fn update_user(&self, _id: ObjectId, _fields: &UserPayload) -> Result<u64> {
        anyhow::bail!(Self::MESSAGE)
    }

    async fn delete_user(&self, _id: ObjectId) -> Result<u64> {
        anyhow::bail!(Self::MESSAGE)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        anyhow::bail!(Self::MESSAGE)
    }

    async fn ping(&self) -> Result<()> {
        anyhow::bail!(Self::MESSAGE)
    }
}

/// Store that never answers within any reasonable deadline
#[derive(Debug)]
pub struct StalledUserStore {
    pub delay: Duration,
}

impl StalledUserStore {
    async fn stall(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl UserStore for StalledUserStore {
    async fn insert_user(&self, user: &User) -> Result<ObjectId> {
        self.stall().await;
        Ok(user.id)
    }

    async fn find_user(&self, _id: ObjectId) -> Result<Option<User>> {
        self.stall().await;
        Ok(None)
    }

    async fn update_user(&self, _id: ObjectId, _fields: &UserPayload) -> Result<u64> {
        self.stall().await;
        Ok(0)
    }

    async fn delete_user(&self, _id: ObjectId) -> Result<u64> {
        self.stall().await;
        Ok(0)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.stall().await;
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<()> {
        self.stall().await;
        Ok(())
    }
}

/// Real MongoDB in a container, one database per context
pub struct MongoTestContext {
    pub db: Database,
    pub config: Config,
    _container: ContainerAsync<Mongo>,
}

impl MongoTestContext {
    pub async fn new() -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start mongo container");
        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get mongo port");

        let config = Config {
            mongo_uri: format!("mongodb://127.0.0.1:{}", port),
            database_name: format!("userbook_test_{}", ObjectId::new().to_hex()),
            server_address: "127.0.0.1:0".to_string(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(30),
        };
        let db = Database::connect(&config)
            .await
            .expect("Failed to connect to test MongoDB");

        Self {
            db,
            config,
            _container: container,
        }
    }

    /// Router over the container's database
    pub fn app(&self) -> TestContext {
        TestContext::with_store(Arc::new(self.db.clone()), self.config.clone())
    }
}
