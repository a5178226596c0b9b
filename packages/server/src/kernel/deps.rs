//! Server dependencies for command handlers (using traits for testability)
//!
//! This module provides the central dependency container shared by every
//! management route.

use std::sync::Arc;

use crate::common::{MultisigGuard, ValidationRules};
use crate::kernel::BaseStore;

/// Server dependencies accessible to commands (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseStore>,
    /// Keychain and scope policies, immutable after startup
    pub guard: Arc<MultisigGuard>,
    pub rules: Arc<ValidationRules>,
}

impl ServerDeps {
    pub fn new(store: Arc<dyn BaseStore>, guard: MultisigGuard, rules: ValidationRules) -> Self {
        Self {
            store,
            guard: Arc::new(guard),
            rules: Arc::new(rules),
        }
    }
}
