use std::sync::Arc;

use actix_web::web;
use mongodb::Client;

use crate::comment::moderation::ModerationFilter;
use crate::comment::repository::{CommentRepository, InMemoryCommentRepository, MongoCommentRepository};
use crate::comment::service::CommentService;
use crate::config::AppConfig;
use crate::news::repository::{InMemoryNewsRepository, MongoNewsRepository, NewsRepository};
use crate::news::service::NewsService;
use crate::note::repository::{InMemoryNoteRepository, MongoNoteRepository, NoteRepository};
use crate::note::service::NoteService;
use crate::user::repository::{InMemoryUserRepository, MongoUserRepository, UserRepository};
use crate::user::service::UserService;
use crate::utils::error::CustomError;

/// Everything handlers pull out of `web::Data`.
#[derive(Clone)]
pub struct AppServices {
    pub config: web::Data<AppConfig>,
    pub news: web::Data<NewsService>,
    pub comments: web::Data<CommentService>,
    pub notes: web::Data<NoteService>,
    pub users: web::Data<UserService>,
}

impl AppServices {
    fn build(
        config: AppConfig,
        news: Arc<dyn NewsRepository>,
        comments: Arc<dyn CommentRepository>,
        notes: Arc<dyn NoteRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let moderation = ModerationFilter::from_config(&config);

        AppServices {
            news: web::Data::new(NewsService::new(
                news.clone(),
                config.news_count_on_home_page,
            )),
            comments: web::Data::new(CommentService::new(comments, news, moderation)),
            notes: web::Data::new(NoteService::new(notes)),
            users: web::Data::new(UserService::new(users, config.bcrypt_cost)),
            config: web::Data::new(config),
        }
    }

    pub async fn mongo(config: AppConfig, client: &Client) -> Result<Self, CustomError> {
        let database = config.mongodb_database.clone();

        let notes = MongoNoteRepository::new(client, &database);
        notes.ensure_indexes().await?;
        let users = MongoUserRepository::new(client, &database);
        users.ensure_indexes().await?;

        Ok(AppServices::build(
            config,
            Arc::new(MongoNewsRepository::new(client, &database)),
            Arc::new(MongoCommentRepository::new(client, &database)),
            Arc::new(notes),
            Arc::new(users),
        ))
    }

    pub fn in_memory(config: AppConfig) -> Self {
        AppServices::build(
            config,
            Arc::new(InMemoryNewsRepository::default()),
            Arc::new(InMemoryCommentRepository::default()),
            Arc::new(InMemoryNoteRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        )
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.news.clone())
            .app_data(self.comments.clone())
            .app_data(self.notes.clone())
            .app_data(self.users.clone());
    }
}
