use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};

use super::{Database, UserStore, USERS_COLLECTION};
use crate::models::{User, UserPayload};

#[async_trait]
impl UserStore for Database {
    async fn insert_user(&self, user: &User) -> Result<ObjectId> {
        let result = self
            .users()
            .insert_one(user)
            .await
            .context("failed to insert user")?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow::anyhow!("store returned a non-ObjectId id: {}", result.inserted_id))
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>> {
        let user = self
            .users()
            .find_one(doc! { "_id": id })
            .await
            .context("failed to look up user")?;
        Ok(user)
    }

    async fn update_user(&self, id: ObjectId, fields: &UserPayload) -> Result<u64> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "name": fields.name.as_str(),
                        "location": fields.location.as_str(),
                        "title": fields.title.as_str(),
                    }
                },
            )
            .await
            .context("failed to update user")?;
        Ok(result.matched_count)
    }

    async fn delete_user(&self, id: ObjectId) -> Result<u64> {
        let result = self
            .users()
            .delete_one(doc! { "_id": id })
            .await
            .context("failed to delete user")?;
        Ok(result.deleted_count)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        // Raw documents so one malformed record cannot poison the whole listing
        let mut cursor = self
            .collection::<Document>(USERS_COLLECTION)
            .find(doc! {})
            .await
            .context("failed to query users")?;

        let mut users = Vec::new();
        while let Some(raw) = cursor.try_next().await.context("failed to read users cursor")? {
            match bson::from_document::<User>(raw) {
                Ok(user) => users.push(user),
                Err(e) => tracing::warn!("Skipping undecodable user document: {}", e),
            }
        }

        Ok(users)
    }

    async fn ping(&self) -> Result<()> {
        self.run_ping().await.context("MongoDB ping failed")
    }
}
