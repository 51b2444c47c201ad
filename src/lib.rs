pub mod cms;
pub mod config;
pub mod constants;
pub mod error;
pub mod images;
pub mod logging;
pub mod metrics;

// Layered boundaries for application logic and adapters
pub mod app;
pub mod infra;

// Document shapes and the page view models built from them
pub mod content;
pub mod domain;

pub mod handlers;
pub mod server;
pub mod state;
