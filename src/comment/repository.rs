use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::comment::model::Comment;
use crate::utils::error::CustomError;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<Comment, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError>;

    /// Comments of one news item, oldest first; equal timestamps keep
    /// insertion order.
    async fn thread(&self, news_id: &ObjectId) -> Result<Vec<Comment>, CustomError>;

    async fn count_for_news(&self, news_id: &ObjectId) -> Result<u64, CustomError>;

    /// Only matches when `author_id` wrote the comment.
    async fn update_text(
        &self,
        id: &ObjectId,
        author_id: &ObjectId,
        text: &str,
    ) -> Result<bool, CustomError>;

    /// Only matches when `author_id` wrote the comment.
    async fn delete(&self, id: &ObjectId, author_id: &ObjectId) -> Result<bool, CustomError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CommentDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    news_id: ObjectId,
    author_id: Option<ObjectId>,
    text: String,
    created: bson::DateTime,
}

impl From<Comment> for CommentDocument {
    fn from(comment: Comment) -> Self {
        CommentDocument {
            id: comment.id,
            news_id: comment.news_id,
            author_id: comment.author_id,
            text: comment.text,
            created: bson::DateTime::from_millis(comment.created.timestamp_millis()),
        }
    }
}

impl From<CommentDocument> for Comment {
    fn from(document: CommentDocument) -> Self {
        Comment {
            id: document.id,
            news_id: document.news_id,
            author_id: document.author_id,
            text: document.text,
            created: DateTime::<Utc>::from_timestamp_millis(document.created.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

pub struct MongoCommentRepository {
    collection: Collection<CommentDocument>,
}

impl MongoCommentRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client
            .database(database)
            .collection::<CommentDocument>("comments");
        MongoCommentRepository { collection }
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<Comment, CustomError> {
        self.collection
            .insert_one(CommentDocument::from(comment.clone()))
            .await
            .map_err(|e| CustomError::storage("add comment", e))?;

        Ok(comment)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::storage("fetch comment", e))?;

        Ok(document.map(Comment::from))
    }

    async fn thread(&self, news_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .collection
            .find(doc! { "news_id": news_id })
            .sort(doc! { "created": 1, "_id": 1 })
            .await
            .map_err(|e| CustomError::storage("fetch comments", e))?;

        let documents: Vec<CommentDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::storage("collect comments", e))?;

        Ok(documents.into_iter().map(Comment::from).collect())
    }

    async fn count_for_news(&self, news_id: &ObjectId) -> Result<u64, CustomError> {
        self.collection
            .count_documents(doc! { "news_id": news_id })
            .await
            .map_err(|e| CustomError::storage("count comments", e))
    }

    async fn update_text(
        &self,
        id: &ObjectId,
        author_id: &ObjectId,
        text: &str,
    ) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id, "author_id": author_id },
                doc! { "$set": { "text": text } },
            )
            .await
            .map_err(|e| CustomError::storage("update comment", e))?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId, author_id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "author_id": author_id })
            .await
            .map_err(|e| CustomError::storage("delete comment", e))?;

        Ok(result.deleted_count > 0)
    }
}

#[derive(Default)]
pub struct InMemoryCommentRepository {
    items: RwLock<Vec<Comment>>,
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<Comment, CustomError> {
        self.items.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|comment| comment.id == *id).cloned())
    }

    async fn thread(&self, news_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        let mut thread: Vec<Comment> = self
            .items
            .read()
            .await
            .iter()
            .filter(|comment| comment.news_id == *news_id)
            .cloned()
            .collect();
        thread.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(thread)
    }

    async fn count_for_news(&self, news_id: &ObjectId) -> Result<u64, CustomError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|comment| comment.news_id == *news_id)
            .count() as u64)
    }

    async fn update_text(
        &self,
        id: &ObjectId,
        author_id: &ObjectId,
        text: &str,
    ) -> Result<bool, CustomError> {
        let mut items = self.items.write().await;
        match items
            .iter_mut()
            .find(|comment| comment.id == *id && comment.author_id.as_ref() == Some(author_id))
        {
            Some(comment) => {
                comment.text = text.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectId, author_id: &ObjectId) -> Result<bool, CustomError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|comment| {
            !(comment.id == *id && comment.author_id.as_ref() == Some(author_id))
        });
        Ok(items.len() < before)
    }
}
