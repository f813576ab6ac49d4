pub mod gallery;
pub mod jokes;
pub mod loader;
pub mod models;
pub mod notification;
pub mod router;
pub mod theme_store;
pub mod thumbnail;
pub mod ui;
