pub mod config;
pub mod content;
pub mod logger;
pub mod server;
pub mod store;
mod paginator;
mod query_string;
mod text_utils;
mod view;
