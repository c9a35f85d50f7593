// Public API - what other modules can use
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use repository::Store;

#[cfg(test)]
pub use repository::MockStore;

// Internal modules
mod memory;
mod postgres;
mod repository;
