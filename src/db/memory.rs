use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::UserStore;
use crate::models::{User, UserPayload};

/// Process-local store with the same matching semantics as the MongoDB one.
/// Records are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_user(&self, user: &User) -> Result<ObjectId> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id == user.id) {
            anyhow::bail!("E11000 duplicate key error: _id {}", user.id);
        }
        users.push(user.clone());
        Ok(user.id)
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn update_user(&self, id: ObjectId, fields: &UserPayload) -> Result<u64> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.name = fields.name.clone();
                user.location = fields.location.clone();
                user.title = fields.title.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_user(&self, id: ObjectId) -> Result<u64> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
