use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::utils::ids::serialize_hex;

pub const TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct News {
    #[serde(serialize_with = "serialize_hex")]
    pub id: ObjectId,
    pub title: String,
    pub text: String,
    pub date: DateTime<Utc>,
}
