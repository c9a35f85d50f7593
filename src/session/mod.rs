// Public API - what other modules can use
pub use middleware::{jwt_auth, AuthenticatedUser};
pub use token::TokenConfig;
pub use types::{LoginResponse, SessionClaims};

// Internal modules
mod middleware;
mod token;
mod types;
