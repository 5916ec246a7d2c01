use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::news::model::News;
use crate::utils::error::CustomError;

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn insert(&self, news: News) -> Result<News, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<News>, CustomError>;

    /// Newest first by `date`; equal dates keep insertion order.
    async fn latest(&self, limit: usize) -> Result<Vec<News>, CustomError>;

    async fn count(&self) -> Result<u64, CustomError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct NewsDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    text: String,
    date: bson::DateTime,
}

impl From<News> for NewsDocument {
    fn from(news: News) -> Self {
        NewsDocument {
            id: news.id,
            title: news.title,
            text: news.text,
            date: bson::DateTime::from_millis(news.date.timestamp_millis()),
        }
    }
}

impl From<NewsDocument> for News {
    fn from(document: NewsDocument) -> Self {
        News {
            id: document.id,
            title: document.title,
            text: document.text,
            date: DateTime::<Utc>::from_timestamp_millis(document.date.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

pub struct MongoNewsRepository {
    collection: Collection<NewsDocument>,
}

impl MongoNewsRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client.database(database).collection::<NewsDocument>("news");
        MongoNewsRepository { collection }
    }
}

#[async_trait]
impl NewsRepository for MongoNewsRepository {
    async fn insert(&self, news: News) -> Result<News, CustomError> {
        self.collection
            .insert_one(NewsDocument::from(news.clone()))
            .await
            .map_err(|e| CustomError::storage("create news", e))?;

        Ok(news)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<News>, CustomError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::storage("fetch news", e))?;

        Ok(document.map(News::from))
    }

    async fn latest(&self, limit: usize) -> Result<Vec<News>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "date": -1, "_id": 1 })
            .limit(limit as i64)
            .await
            .map_err(|e| CustomError::storage("fetch the news feed", e))?;

        let documents: Vec<NewsDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::storage("collect the news feed", e))?;

        Ok(documents.into_iter().map(News::from).collect())
    }

    async fn count(&self) -> Result<u64, CustomError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| CustomError::storage("count news", e))
    }
}

/// Process-local store used by tests and by `STORAGE=memory` runs.
#[derive(Default)]
pub struct InMemoryNewsRepository {
    items: RwLock<Vec<News>>,
}

#[async_trait]
impl NewsRepository for InMemoryNewsRepository {
    async fn insert(&self, news: News) -> Result<News, CustomError> {
        self.items.write().await.push(news.clone());
        Ok(news)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<News>, CustomError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|news| news.id == *id).cloned())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<News>, CustomError> {
        let mut items = self.items.read().await.clone();
        // stable sort: ties stay in insertion order
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items.truncate(limit);
        Ok(items)
    }

    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.items.read().await.len() as u64)
    }
}
