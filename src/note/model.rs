use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::middleware::ownership::Owned;
use crate::utils::ids::serialize_hex;

pub const NOTE_FORM: &str = "NoteForm";
pub const TITLE_MAX_CHARS: usize = 100;
pub const SLUG_MAX_CHARS: usize = 100;
pub const SLUG_TAKEN_WARNING: &str =
    " - такой slug уже существует, придумайте уникальное значение!";

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Note {
    #[serde(serialize_with = "serialize_hex")]
    pub id: ObjectId,
    pub title: String,
    pub text: String,
    pub slug: String,
    #[serde(serialize_with = "serialize_hex")]
    pub author_id: ObjectId,
}

impl Owned for Note {
    fn author_id(&self) -> Option<&ObjectId> {
        Some(&self.author_id)
    }
}

/// Submitted note fields. A blank `slug` is generated from the title.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        NoteForm {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }
}
