//! Application state for the levy engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::LevyEngine;

/// Shared application state.
///
/// Holds the engine and its read-only configuration, loaded once at
/// start-up and shared by every request.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<LevyEngine>,
}

impl AppState {
    /// Creates a new application state around the given engine.
    pub fn new(engine: LevyEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &LevyEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_one_engine() {
        let state = AppState::new(LevyEngine::load("./config/gy_2024").unwrap());
        let clone = state.clone();
        assert!(std::ptr::eq(state.engine(), clone.engine()));
    }
}
