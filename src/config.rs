use std::env;
use std::str::FromStr;

pub const DEFAULT_FORBIDDEN_WORDS: [&str; 2] = ["редиска", "негодяй"];
pub const DEFAULT_MODERATION_WARNING: &str = "Не ругайтесь!";
pub const DEFAULT_SERVICE_NAME: &str = "news-notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    /// Process-local storage, lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("STORAGE must be 'mongo' or 'memory', got {:?}", other)),
        }
    }
}

/// Runtime settings, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub storage: StorageBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub news_count_on_home_page: usize,
    pub forbidden_words: Vec<String>,
    pub moderation_warning: String,
    pub login_url: String,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            storage: StorageBackend::Mongo,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "news_notes".to_string(),
            redis_url: None,
            jwt_secret: "secret".to_string(),
            session_ttl_hours: 24,
            news_count_on_home_page: 10,
            forbidden_words: DEFAULT_FORBIDDEN_WORDS
                .iter()
                .map(|word| word.to_string())
                .collect(),
            moderation_warning: DEFAULT_MODERATION_WARNING.to_string(),
            login_url: "/auth/login/".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = AppConfig::default();

        Ok(AppConfig {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            service_name: env::var("SERVICE_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.service_name),
            storage: match env::var("STORAGE") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.storage,
            },
            mongodb_uri: env::var("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            mongodb_database: env::var("MONGODB_DATABASE").unwrap_or(defaults.mongodb_database),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", defaults.session_ttl_hours)?,
            news_count_on_home_page: parse_var(
                "NEWS_COUNT_ON_HOME_PAGE",
                defaults.news_count_on_home_page,
            )?,
            forbidden_words: env::var("FORBIDDEN_WORDS")
                .map(|raw| split_words(&raw))
                .unwrap_or(defaults.forbidden_words),
            moderation_warning: env::var("MODERATION_WARNING")
                .unwrap_or(defaults.moderation_warning),
            login_url: env::var("LOGIN_URL").unwrap_or(defaults.login_url),
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }

    pub fn session_ttl_seconds(&self) -> u64 {
        (self.session_ttl_hours.max(0) as u64) * 3600
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a valid number, got {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

fn split_words(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}
