#![allow(dead_code)]

use actix_web::http::header::{AUTHORIZATION, LOCATION};
use actix_web::test::TestRequest;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use news_notes_backend::comment::model::Comment;
use news_notes_backend::config::AppConfig;
use news_notes_backend::middleware::auth::{AuthUser, create_token};
use news_notes_backend::news::model::News;
use news_notes_backend::note::model::{Note, NoteForm};
use news_notes_backend::state::AppServices;
use news_notes_backend::utils::form::FormOutcome;

/// Build the service under test from an `AppServices` value.
macro_rules! init_app {
    ($services:expr) => {{
        let services = $services.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(move |cfg| services.register(cfg))
                .configure(news_notes_backend::router::index::routes)
                .wrap(news_notes_backend::middleware::error_handlers()),
        )
        .await
    }};
}

pub fn test_config() -> AppConfig {
    AppConfig {
        bcrypt_cost: 4,
        ..AppConfig::default()
    }
}

pub fn services() -> AppServices {
    AppServices::in_memory(test_config())
}

pub struct TestUser {
    pub user: AuthUser,
    pub password: String,
    pub token: String,
}

pub async fn create_user(services: &AppServices, username: &str, password: &str) -> TestUser {
    let user = services.users.create_user(username, password).await.unwrap();
    let token = create_token(&user.id, &user.username, &services.config).unwrap();
    TestUser {
        user: AuthUser {
            id: user.id,
            username: user.username,
        },
        password: password.to_string(),
        token,
    }
}

pub async fn create_news(services: &AppServices, title: &str) -> News {
    services
        .news
        .create_news(title.to_string(), format!("{} text", title), None)
        .await
        .unwrap()
}

pub async fn create_news_at(services: &AppServices, title: &str, date: DateTime<Utc>) -> News {
    services
        .news
        .create_news(title.to_string(), format!("{} text", title), Some(date))
        .await
        .unwrap()
}

pub async fn create_comment(
    services: &AppServices,
    news: &News,
    author: Option<&TestUser>,
    text: &str,
) -> Comment {
    let comment = Comment::new(news.id, author.map(|author| author.user.id), text.to_string());
    services.comments.insert_comment(comment).await.unwrap()
}

pub async fn create_note(services: &AppServices, author: &TestUser, title: &str, text: &str) -> Note {
    let form = NoteForm {
        title: title.to_string(),
        text: text.to_string(),
        slug: String::new(),
    };
    match services.notes.create(&author.user, &form).await.unwrap() {
        FormOutcome::Saved(note) => note,
        FormOutcome::Invalid(errors) => panic!("note rejected: {:?}", errors),
    }
}

/// "Force login": attach the user's session token.
pub fn as_user(req: TestRequest, user: &TestUser) -> TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {}", user.token)))
}

pub fn get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri)
}

pub fn post(uri: &str) -> TestRequest {
    TestRequest::post().uri(uri)
}

pub fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn login_url_for(next: &str) -> String {
    format!("/auth/login/?next={}", next)
}

pub fn news_url(news: &News) -> String {
    format!("/news/{}/", news.id.to_hex())
}

pub fn edit_comment_url(comment: &Comment) -> String {
    format!("/edit_comment/{}/", comment.id.to_hex())
}

pub fn delete_comment_url(comment: &Comment) -> String {
    format!("/delete_comment/{}/", comment.id.to_hex())
}

pub fn missing_id() -> String {
    ObjectId::new().to_hex()
}
