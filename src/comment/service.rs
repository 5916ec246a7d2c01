use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::comment::model::{Comment, CommentForm};
use crate::comment::moderation::ModerationFilter;
use crate::comment::repository::CommentRepository;
use crate::middleware::auth::AuthUser;
use crate::middleware::ownership::ensure_owner;
use crate::news::repository::NewsRepository;
use crate::utils::error::CustomError;
use crate::utils::form::FormOutcome;

pub struct CommentService {
    repository: Arc<dyn CommentRepository>,
    news: Arc<dyn NewsRepository>,
    moderation: ModerationFilter,
}

impl CommentService {
    pub fn new(
        repository: Arc<dyn CommentRepository>,
        news: Arc<dyn NewsRepository>,
        moderation: ModerationFilter,
    ) -> Self {
        CommentService {
            repository,
            news,
            moderation,
        }
    }

    async fn ensure_news_exists(&self, news_id: &ObjectId) -> Result<(), CustomError> {
        match self.news.find_by_id(news_id).await? {
            Some(_) => Ok(()),
            None => Err(CustomError::not_found("News")),
        }
    }

    /// All comments of a news item, oldest first.
    pub async fn thread(&self, news_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        self.ensure_news_exists(news_id).await?;
        self.repository.thread(news_id).await
    }

    /// Moderate and store a comment written by `author`.
    pub async fn submit(
        &self,
        news_id: &ObjectId,
        author: &AuthUser,
        form: &CommentForm,
    ) -> Result<FormOutcome<Comment>, CustomError> {
        self.ensure_news_exists(news_id).await?;

        let errors = self.moderation.validate(&form.text);
        if !errors.is_empty() {
            log::warn!("comment by {} on news {} rejected", author.id, news_id);
            return Ok(FormOutcome::Invalid(errors));
        }

        let comment = Comment::new(*news_id, Some(author.id), form.text.clone());
        let comment = self.repository.insert(comment).await?;
        log::info!("comment {} added to news {}", comment.id, news_id);
        Ok(FormOutcome::Saved(comment))
    }

    /// Store a comment as given, bypassing moderation. Used for fixtures
    /// and imports where author and timestamp are already decided.
    pub async fn insert_comment(&self, comment: Comment) -> Result<Comment, CustomError> {
        self.ensure_news_exists(&comment.news_id).await?;
        self.repository.insert(comment).await
    }

    pub async fn get_owned(&self, id: &ObjectId, user: &AuthUser) -> Result<Comment, CustomError> {
        let comment = self.repository.find_by_id(id).await?;
        ensure_owner(comment, user, "Comment")
    }

    pub async fn edit(
        &self,
        id: &ObjectId,
        user: &AuthUser,
        form: &CommentForm,
    ) -> Result<FormOutcome<Comment>, CustomError> {
        let mut comment = self.get_owned(id, user).await?;

        let errors = self.moderation.validate(&form.text);
        if !errors.is_empty() {
            log::warn!("edit of comment {} by {} rejected", id, user.id);
            return Ok(FormOutcome::Invalid(errors));
        }

        if !self.repository.update_text(id, &user.id, &form.text).await? {
            return Err(CustomError::not_found("Comment"));
        }

        comment.text = form.text.clone();
        log::info!("comment {} edited by {}", id, user.id);
        Ok(FormOutcome::Saved(comment))
    }

    pub async fn delete(&self, id: &ObjectId, user: &AuthUser) -> Result<Comment, CustomError> {
        let comment = self.get_owned(id, user).await?;

        if !self.repository.delete(id, &user.id).await? {
            return Err(CustomError::not_found("Comment"));
        }

        log::info!("comment {} deleted by {}", id, user.id);
        Ok(comment)
    }

    pub async fn count_for_news(&self, news_id: &ObjectId) -> Result<u64, CustomError> {
        self.repository.count_for_news(news_id).await
    }
}
