pub mod callmebot;
pub mod delivery_log;
pub mod health;
pub mod settings;
