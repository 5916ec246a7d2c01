use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

/// Redis connection wrapper
pub struct RedisClient {
    connection: MultiplexedConnection,
}

impl RedisClient {
    /// Open a multiplexed connection to `redis_url`
    pub async fn init(redis_url: &str) -> Result<Self, String> {
        let client =
            Client::open(redis_url).map_err(|e| format!("Failed to create Redis client: {}", e))?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| format!("Failed to connect to Redis: {}", e))?;

        log::info!("Connected successfully to Redis");

        Ok(Self { connection })
    }

    /// Get the Redis connection
    pub fn get_connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Live session registry: a token is valid only while `session:<token>` exists.
/// Several sessions per user may be live at once; logout revokes one token.
#[derive(Clone)]
pub struct RedisService {
    connection: MultiplexedConnection,
}

impl RedisService {
    pub fn new(client: &RedisClient) -> Self {
        Self {
            connection: client.get_connection(),
        }
    }

    /// Register `token` as a live session of `user_id`
    pub async fn store_session(
        &self,
        user_id: &str,
        token: &str,
        expiry_seconds: u64,
    ) -> Result<(), String> {
        let mut conn = self.connection.clone();

        conn.set_ex::<_, _, ()>(session_key(token), user_id, expiry_seconds)
            .await
            .map_err(|e| format!("Failed to store session: {}", e))
    }

    /// The user id a live token belongs to, `None` once revoked or expired
    pub async fn validate_session(&self, token: &str) -> Result<Option<String>, String> {
        let mut conn = self.connection.clone();

        conn.get(session_key(token))
            .await
            .map_err(|e| format!("Failed to validate session: {}", e))
    }

    /// Revoke one session (logout)
    pub async fn invalidate_session(&self, token: &str) -> Result<(), String> {
        let mut conn = self.connection.clone();

        conn.del::<_, ()>(session_key(token))
            .await
            .map_err(|e| format!("Failed to delete session: {}", e))
    }
}

/// Convenience function to connect to Redis
pub async fn connect_to_redis(redis_url: &str) -> Result<RedisClient, String> {
    RedisClient::init(redis_url).await
}
