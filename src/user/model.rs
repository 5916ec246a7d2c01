use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const SIGNUP_FORM: &str = "SignupForm";
pub const LOGIN_FORM: &str = "LoginForm";
pub const USERNAME_MAX_CHARS: usize = 150;

#[derive(Debug, Clone)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    /// bcrypt hash
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Passwords are never echoed back when a form is re-rendered.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub next: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: String,
}
