pub mod comment;
pub mod config;
pub mod database;
pub mod middleware;
pub mod news;
pub mod note;
pub mod router;
pub mod state;
pub mod user;
pub mod utils;
