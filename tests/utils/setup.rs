use std::sync::Arc;

use axum::Router;
use todo_service::{build_router, AppState, InMemoryStore, TokenConfig};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestSetup {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
    pub token_config: TokenConfig,
}

pub struct TestSetupBuilder {
    expiration_hours: i64,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            expiration_hours: 24,
        }
    }

    /// Tokens issued by this setup expire after the given number of hours
    pub fn with_expiration_hours(mut self, hours: i64) -> Self {
        self.expiration_hours = hours;
        self
    }

    pub fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryStore::new());
        let token_config = TokenConfig::new(TEST_SECRET, self.expiration_hours);
        let state = AppState::new(store.clone(), token_config.clone());

        TestSetup {
            app: build_router(state),
            store,
            token_config,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
