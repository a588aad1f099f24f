//! Two-tier search: scrape first, fall back to the tool provider.

use std::sync::Arc;

use crate::provider::SearchProvider;
use crate::types::{SearchRecord, MAX_RESULTS};

/// Which tier produced the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    Secondary,
    /// Neither tier produced anything.
    Exhausted,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Primary => write!(f, "primary"),
            Tier::Secondary => write!(f, "secondary"),
            Tier::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Records plus the tier that answered.
#[derive(Debug, Clone)]
pub struct BridgeOutcome {
    pub tier: Tier,
    pub records: Vec<SearchRecord>,
}

/// Sequential fallback over a primary and a secondary provider.
///
/// Each tier is tried at most once per query. Tier failures are logged and
/// never surfaced: when both tiers come up empty the result is an empty list.
#[derive(Clone)]
pub struct SearchBridge {
    primary: Arc<dyn SearchProvider>,
    secondary: Arc<dyn SearchProvider>,
}

impl SearchBridge {
    pub fn new(
        primary: impl SearchProvider + 'static,
        secondary: impl SearchProvider + 'static,
    ) -> Self {
        Self {
            primary: Arc::new(primary),
            secondary: Arc::new(secondary),
        }
    }

    pub fn secondary(&self) -> &dyn SearchProvider {
        self.secondary.as_ref()
    }

    /// Run `query` and return up to [`MAX_RESULTS`] records.
    pub async fn search(&self, query: &str) -> Vec<SearchRecord> {
        self.search_traced(query).await.records
    }

    /// Like [`search`](Self::search), but also reports which tier answered.
    pub async fn search_traced(&self, query: &str) -> BridgeOutcome {
        tracing::info!("Starting search for query: {query}");

        if let Some(records) = self.attempt(self.primary.as_ref(), query).await {
            return BridgeOutcome {
                tier: Tier::Primary,
                records,
            };
        }

        tracing::info!("Falling back to {}", self.secondary.name());

        if let Some(records) = self.attempt(self.secondary.as_ref(), query).await {
            return BridgeOutcome {
                tier: Tier::Secondary,
                records,
            };
        }

        tracing::info!("No results for query: {query}");
        BridgeOutcome {
            tier: Tier::Exhausted,
            records: Vec::new(),
        }
    }

    /// One attempt against one tier. `None` means "try the next tier".
    async fn attempt(&self, provider: &dyn SearchProvider, query: &str) -> Option<Vec<SearchRecord>> {
        let name = provider.name();
        match provider.search(query, MAX_RESULTS).await {
            Ok(mut records) if !records.is_empty() => {
                tracing::info!("Found {} results via {name}", records.len());
                records.truncate(MAX_RESULTS);
                Some(records)
            }
            Ok(_) => {
                tracing::info!("{name} returned no results");
                None
            }
            Err(e) => {
                tracing::warn!("{name} error: {e}");
                None
            }
        }
    }
}
