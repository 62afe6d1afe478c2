pub mod cache;
pub mod loader;
pub mod manager;
