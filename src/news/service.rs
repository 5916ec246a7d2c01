use std::sync::Arc;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use crate::news::model::{News, TITLE_MAX_CHARS};
use crate::news::repository::NewsRepository;
use crate::utils::error::CustomError;

pub struct NewsService {
    repository: Arc<dyn NewsRepository>,
    feed_size: usize,
}

impl NewsService {
    pub fn new(repository: Arc<dyn NewsRepository>, feed_size: usize) -> Self {
        NewsService {
            repository,
            feed_size,
        }
    }

    /// The home page feed: at most `feed_size` items, newest first.
    pub async fn home_feed(&self) -> Result<Vec<News>, CustomError> {
        // MongoDB reads a limit of 0 as "no limit"
        if self.feed_size == 0 {
            return Ok(Vec::new());
        }
        self.repository.latest(self.feed_size).await
    }

    pub async fn get_news(&self, id: &ObjectId) -> Result<News, CustomError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomError::not_found("News"))
    }

    pub async fn create_news(
        &self,
        title: String,
        text: String,
        date: Option<DateTime<Utc>>,
    ) -> Result<News, CustomError> {
        if title.trim().is_empty() {
            return Err(CustomError::ValidationError(
                "News title cannot be empty".to_string(),
            ));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(CustomError::ValidationError(format!(
                "News title must be at most {} characters",
                TITLE_MAX_CHARS
            )));
        }

        let news = News {
            id: ObjectId::new(),
            title,
            text,
            date: date.unwrap_or_else(Utc::now),
        };

        let news = self.repository.insert(news).await?;
        log::info!("news {} published", news.id);
        Ok(news)
    }

    pub async fn count(&self) -> Result<u64, CustomError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::repository::InMemoryNewsRepository;
    use chrono::{Duration, TimeZone};

    fn service(feed_size: usize) -> NewsService {
        NewsService::new(Arc::new(InMemoryNewsRepository::default()), feed_size)
    }

    /// Treats a zero limit as unlimited, like a MongoDB cursor.
    #[derive(Default)]
    struct ZeroIsUnlimited(InMemoryNewsRepository);

    #[async_trait::async_trait]
    impl NewsRepository for ZeroIsUnlimited {
        async fn insert(&self, news: News) -> Result<News, CustomError> {
            self.0.insert(news).await
        }

        async fn find_by_id(&self, id: &ObjectId) -> Result<Option<News>, CustomError> {
            self.0.find_by_id(id).await
        }

        async fn latest(&self, limit: usize) -> Result<Vec<News>, CustomError> {
            let limit = if limit == 0 { usize::MAX } else { limit };
            self.0.latest(limit).await
        }

        async fn count(&self) -> Result<u64, CustomError> {
            self.0.count().await
        }
    }

    #[actix_web::test]
    async fn zero_feed_size_shows_nothing() {
        let news = NewsService::new(Arc::new(ZeroIsUnlimited::default()), 0);
        news.create_news("Only".into(), "text".into(), None)
            .await
            .unwrap();

        assert!(news.home_feed().await.unwrap().is_empty());
        assert_eq!(news.count().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn feed_is_truncated_and_newest_first() {
        let news = service(10);
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        for i in 0..11 {
            news.create_news(format!("News {}", i), "text".into(), Some(start + Duration::days(i)))
                .await
                .unwrap();
        }

        let feed = news.home_feed().await.unwrap();
        assert_eq!(feed.len(), 10);
        assert_eq!(feed[0].title, "News 10");
        assert_eq!(feed[9].title, "News 1");
        assert!(feed.windows(2).all(|pair| pair[0].date >= pair[1].date));
        assert_eq!(news.count().await.unwrap(), 11);
    }

    #[actix_web::test]
    async fn short_feed_returns_everything() {
        let news = service(10);
        assert!(news.home_feed().await.unwrap().is_empty());

        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        for i in [2, 0, 1] {
            news.create_news(format!("News {}", i), "text".into(), Some(start + Duration::days(i)))
                .await
                .unwrap();
        }

        let titles: Vec<String> = news
            .home_feed()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["News 2", "News 1", "News 0"]);
    }

    #[actix_web::test]
    async fn equal_dates_keep_insertion_order() {
        let news = service(10);
        let date = Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap();
        for title in ["first", "second", "third"] {
            news.create_news(title.into(), "text".into(), Some(date))
                .await
                .unwrap();
        }

        let titles: Vec<String> = news
            .home_feed()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[actix_web::test]
    async fn unknown_news_is_not_found() {
        let news = service(10);
        let err = news.get_news(&ObjectId::new()).await.unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }

    #[actix_web::test]
    async fn blank_title_is_rejected() {
        let news = service(10);
        let err = news.create_news("  ".into(), "text".into(), None).await.unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));
        let err = news
            .create_news("x".repeat(201), "text".into(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));
    }
}
