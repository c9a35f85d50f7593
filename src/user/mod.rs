// Public API - what other modules can use
pub use handlers::{create_user, login};

// Internal modules
mod handlers;
pub mod models;
pub(crate) mod password;
mod service;
