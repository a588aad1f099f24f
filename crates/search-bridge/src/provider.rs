//! The seam every search backend plugs into.

use async_trait::async_trait;

use crate::types::{BridgeResult, SearchRecord};

/// A search backend the bridge can query.
///
/// Implementations report failures as [`BridgeError`](crate::BridgeError);
/// the bridge decides whether a failure moves on to the next tier.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Run `query`, asking the backend for at most `limit` results.
    async fn search(&self, query: &str, limit: usize) -> BridgeResult<Vec<SearchRecord>>;
}

