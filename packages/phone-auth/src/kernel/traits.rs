// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no flow logic.
// Flows receive a backend through their constructor and never reach for a global.
//
// Naming convention: Base* for trait names (e.g., BaseAuthBackend)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Auth Backend Trait (Infrastructure - code dispatch/verification)
// =============================================================================

#[async_trait]
pub trait BaseAuthBackend: Send + Sync {
    /// Ask the backend to dispatch a code to `phone`.
    ///
    /// `Ok(true)` = dispatched, `Ok(false)` = refused, `Err` = the call failed.
    async fn send_code(&self, phone: &str) -> Result<bool>;

    /// Check `code` for `phone`. `Ok(true)` = correct.
    async fn verify_code(&self, phone: &str, code: &str) -> Result<bool>;
}
