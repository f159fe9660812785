pub mod ai;
pub mod app;
pub mod clipboard;
pub mod config;
pub mod filter;
pub mod github;
pub mod init;
pub mod loader;
pub mod logging;
pub mod markdown;
pub mod panel;
pub mod ui;
