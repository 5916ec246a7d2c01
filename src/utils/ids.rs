use mongodb::bson::oid::ObjectId;
use serde::Serializer;

use crate::utils::error::CustomError;

/// Parse an id taken from the URL. A malformed id cannot name an existing
/// object, so it is reported the same way as a missing one.
pub fn parse_id(raw: &str, what: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(raw).map_err(|_| CustomError::not_found(what))
}

pub fn serialize_hex<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_hex())
}

pub fn serialize_optional_hex<S: Serializer>(
    id: &Option<ObjectId>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => serializer.serialize_some(&id.to_hex()),
        None => serializer.serialize_none(),
    }
}
