pub mod controller;
pub mod index;
pub mod model;
pub mod moderation;
pub mod repository;
pub mod service;
