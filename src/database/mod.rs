pub mod db;
pub mod redis;

pub use db::connect_to_mongo;
pub use self::redis::{RedisClient, RedisService, connect_to_redis};
