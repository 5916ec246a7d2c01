use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use news_notes_backend::config::{AppConfig, StorageBackend};
use news_notes_backend::database::{self, RedisService};
use news_notes_backend::middleware::error_handlers;
use news_notes_backend::router::index::routes;
use news_notes_backend::state::AppServices;
use news_notes_backend::utils::response::init_service_name;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger with environment variable support
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    init_service_name(&config.service_name);

    let services = match config.storage {
        StorageBackend::Mongo => {
            let mongo_client = database::connect_to_mongo(&config)
                .await
                .map_err(|e| std::io::Error::other(format!("Failed to connect to MongoDB: {}", e)))?;
            AppServices::mongo(config.clone(), &mongo_client)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            AppServices::in_memory(config.clone())
        }
    };

    // Sessions are tracked in Redis when it is configured; otherwise the
    // signed session token alone authenticates.
    let redis_service = match config.redis_url.as_deref() {
        Some(url) => match database::connect_to_redis(url).await {
            Ok(client) => Some(web::Data::new(RedisService::new(&client))),
            Err(e) => {
                warn!("{}; continuing without session revocation", e);
                None
            }
        },
        None => None,
    };

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .wrap(Logger::new("%a %{User-Agent}i"))
            .configure(|cfg| services.register(cfg));

        if let Some(redis_service) = redis_service.clone() {
            app = app.app_data(redis_service);
        }

        app.configure(routes).wrap(error_handlers())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    // Log after server has started (this line will only be reached when the server shuts down)
    info!("Server has stopped");

    Ok(())
}
