pub mod api;
pub mod clients;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod filter;
pub mod models;
pub mod templates;
