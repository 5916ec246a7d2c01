use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::user::model::User;
use crate::utils::error::CustomError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, CustomError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CustomError>;

    async fn username_exists(&self, username: &str) -> Result<bool, CustomError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    username: String,
    password: String,
    created_at: bson::DateTime,
}

impl From<User> for UserDocument {
    fn from(user: User) -> Self {
        UserDocument {
            id: user.id,
            username: user.username,
            password: user.password,
            created_at: bson::DateTime::from_millis(user.created_at.timestamp_millis()),
        }
    }
}

impl From<UserDocument> for User {
    fn from(document: UserDocument) -> Self {
        User {
            id: document.id,
            username: document.username,
            password: document.password,
            created_at: DateTime::<Utc>::from_timestamp_millis(
                document.created_at.timestamp_millis(),
            )
            .unwrap_or_default(),
        }
    }
}

pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client.database(database).collection::<UserDocument>("users");
        MongoUserRepository { collection }
    }

    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(|e| CustomError::storage("create the username index", e))?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: User) -> Result<User, CustomError> {
        self.collection
            .insert_one(UserDocument::from(user.clone()))
            .await
            .map_err(|e| CustomError::storage("create user", e))?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CustomError> {
        let document = self
            .collection
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| CustomError::storage("fetch user", e))?;

        Ok(document.map(User::from))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, CustomError> {
        let count = self
            .collection
            .count_documents(doc! { "username": username })
            .await
            .map_err(|e| CustomError::storage("check username", e))?;

        Ok(count > 0)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    items: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<User, CustomError> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.username == user.username) {
            return Err(CustomError::ConflictError(
                "Username already exists".to_string(),
            ));
        }
        items.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CustomError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|user| user.username == username).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, CustomError> {
        Ok(self.find_by_username(username).await?.is_some())
    }
}
