use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::middleware::ownership::Owned;
use crate::utils::ids::{serialize_hex, serialize_optional_hex};

pub const COMMENT_FORM: &str = "CommentForm";

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Comment {
    #[serde(serialize_with = "serialize_hex")]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_hex")]
    pub news_id: ObjectId,
    /// Seeded comments may have no author.
    #[serde(serialize_with = "serialize_optional_hex")]
    pub author_id: Option<ObjectId>,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    pub fn new(news_id: ObjectId, author_id: Option<ObjectId>, text: String) -> Self {
        Comment {
            id: ObjectId::new(),
            news_id,
            author_id,
            text,
            created: Utc::now(),
        }
    }
}

impl Owned for Comment {
    fn author_id(&self) -> Option<&ObjectId> {
        self.author_id.as_ref()
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}
