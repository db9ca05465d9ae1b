//! Outbound ports that are not repositories

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Server-side storage for uploaded candidate photos.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist `bytes` under a sanitized, collision-free name derived from
    /// `original_name` and return the relative reference (`uploads/<file>`).
    async fn save(&self, original_name: &str, bytes: &[u8]) -> DomainResult<String>;

    /// Delete a photo previously returned by `save`. Missing files are not
    /// an error.
    async fn remove(&self, reference: &str) -> DomainResult<()>;
}
