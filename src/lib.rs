pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod loader;
pub mod sheet;
pub mod ui;
