// Public API - what other modules can use
pub use handlers::{create_todo, delete_todo, list_todos, update_todo};

// Internal modules
mod handlers;
pub mod models;
mod service;
