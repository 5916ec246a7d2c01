pub mod error;
pub mod form;
pub mod hashing;
pub mod password_validation;
pub mod response;
pub mod slug;
pub mod ids;
