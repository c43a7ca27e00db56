pub mod api;
pub mod config;
pub mod domain;
pub mod inbox;
pub mod terminal;
pub mod watcher;
