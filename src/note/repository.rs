use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::note::model::Note;
use crate::utils::error::CustomError;

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn insert(&self, note: Note) -> Result<Note, CustomError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, CustomError>;

    /// Notes written by `author_id`, in creation order.
    async fn list_by_author(&self, author_id: &ObjectId) -> Result<Vec<Note>, CustomError>;

    /// Whether a note other than `except` already uses `slug`.
    async fn slug_taken(&self, slug: &str, except: Option<&ObjectId>) -> Result<bool, CustomError>;

    /// Replace the stored note; only matches the author's own note.
    async fn update(&self, note: &Note) -> Result<bool, CustomError>;

    async fn delete(&self, id: &ObjectId, author_id: &ObjectId) -> Result<bool, CustomError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct NoteDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    text: String,
    slug: String,
    author_id: ObjectId,
}

impl From<Note> for NoteDocument {
    fn from(note: Note) -> Self {
        NoteDocument {
            id: note.id,
            title: note.title,
            text: note.text,
            slug: note.slug,
            author_id: note.author_id,
        }
    }
}

impl From<NoteDocument> for Note {
    fn from(document: NoteDocument) -> Self {
        Note {
            id: document.id,
            title: document.title,
            text: document.text,
            slug: document.slug,
            author_id: document.author_id,
        }
    }
}

pub struct MongoNoteRepository {
    collection: Collection<NoteDocument>,
}

impl MongoNoteRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client.database(database).collection::<NoteDocument>("notes");
        MongoNoteRepository { collection }
    }

    /// Slugs are unique across all users.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(|e| CustomError::storage("create the note slug index", e))?;

        Ok(())
    }
}

#[async_trait]
impl NoteRepository for MongoNoteRepository {
    async fn insert(&self, note: Note) -> Result<Note, CustomError> {
        self.collection
            .insert_one(NoteDocument::from(note.clone()))
            .await
            .map_err(|e| CustomError::storage("create note", e))?;

        Ok(note)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, CustomError> {
        let document = self
            .collection
            .find_one(doc! { "slug": slug })
            .await
            .map_err(|e| CustomError::storage("fetch note", e))?;

        Ok(document.map(Note::from))
    }

    async fn list_by_author(&self, author_id: &ObjectId) -> Result<Vec<Note>, CustomError> {
        let cursor = self
            .collection
            .find(doc! { "author_id": author_id })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| CustomError::storage("fetch notes", e))?;

        let documents: Vec<NoteDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::storage("collect notes", e))?;

        Ok(documents.into_iter().map(Note::from).collect())
    }

    async fn slug_taken(&self, slug: &str, except: Option<&ObjectId>) -> Result<bool, CustomError> {
        let mut filter: Document = doc! { "slug": slug };
        if let Some(id) = except {
            filter.insert("_id", doc! { "$ne": id });
        }

        let count = self
            .collection
            .count_documents(filter)
            .await
            .map_err(|e| CustomError::storage("check slug", e))?;

        Ok(count > 0)
    }

    async fn update(&self, note: &Note) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": note.id, "author_id": note.author_id },
                doc! {
                    "$set": {
                        "title": note.title.as_str(),
                        "text": note.text.as_str(),
                        "slug": note.slug.as_str(),
                    }
                },
            )
            .await
            .map_err(|e| CustomError::storage("update note", e))?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId, author_id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "author_id": author_id })
            .await
            .map_err(|e| CustomError::storage("delete note", e))?;

        Ok(result.deleted_count > 0)
    }
}

#[derive(Default)]
pub struct InMemoryNoteRepository {
    items: RwLock<Vec<Note>>,
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn insert(&self, note: Note) -> Result<Note, CustomError> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.slug == note.slug) {
            return Err(CustomError::ConflictError(format!(
                "Slug {} already exists",
                note.slug
            )));
        }
        items.push(note.clone());
        Ok(note)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, CustomError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|note| note.slug == slug).cloned())
    }

    async fn list_by_author(&self, author_id: &ObjectId) -> Result<Vec<Note>, CustomError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|note| note.author_id == *author_id)
            .cloned()
            .collect())
    }

    async fn slug_taken(&self, slug: &str, except: Option<&ObjectId>) -> Result<bool, CustomError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .any(|note| note.slug == slug && Some(&note.id) != except))
    }

    async fn update(&self, note: &Note) -> Result<bool, CustomError> {
        let mut items = self.items.write().await;
        match items
            .iter_mut()
            .find(|stored| stored.id == note.id && stored.author_id == note.author_id)
        {
            Some(stored) => {
                *stored = note.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectId, author_id: &ObjectId) -> Result<bool, CustomError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|note| !(note.id == *id && note.author_id == *author_id));
        Ok(items.len() < before)
    }
}
