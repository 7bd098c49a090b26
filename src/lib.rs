pub mod app;
pub mod config;
pub mod models;
pub mod omdb;
pub mod prompt;
pub mod stats;
pub mod storage;
pub mod website;
