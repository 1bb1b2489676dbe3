//! Codex code search
//!
//! Read-only access to the index of functions, classes and modules across
//! BlackRoad repositories.
//!
//! ```rust,no_run
//! use blackroad_sdk::{BlackRoadClient, CodexQuery, ComponentType};
//!
//! async fn example(client: &BlackRoadClient) -> blackroad_sdk::BlackRoadResult<()> {
//!     let hits = client
//!         .codex()
//!         .search(&CodexQuery::new("heartbeat").with_type(ComponentType::Function))
//!         .await?;
//!     for hit in hits {
//!         println!("{} {}", hit.name, hit.location());
//!     }
//!     Ok(())
//! }
//! ```

mod types;

pub use types::{CodexComponent, CodexQuery, ComponentType, DEFAULT_SEARCH_LIMIT};

use serde_json::Value;
use std::sync::Arc;

use crate::client::{path_segment, QueryParams, RequestExecutor};
use crate::error::BlackRoadResult;
use types::{ComponentList, LanguageList};

/// Client for `/v1/codex`
#[derive(Debug, Clone)]
pub struct CodexSearch {
    executor: Arc<RequestExecutor>,
}

impl CodexSearch {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Search indexed components
    pub async fn search(&self, query: &CodexQuery) -> BlackRoadResult<Vec<CodexComponent>> {
        let list: ComponentList = self
            .executor
            .get("/v1/codex/search", &query.to_query())
            .await?;
        Ok(list.components)
    }

    /// Get a component by ID
    pub async fn get(&self, component_id: &str) -> BlackRoadResult<CodexComponent> {
        self.executor
            .get(
                &format!("/v1/codex/components/{}", path_segment(component_id)?),
                &QueryParams::new(),
            )
            .await
    }

    /// Index statistics, passed through as returned
    pub async fn stats(&self) -> BlackRoadResult<Value> {
        self.executor
            .get("/v1/codex/stats", &QueryParams::new())
            .await
    }

    /// Languages present in the index
    pub async fn languages(&self) -> BlackRoadResult<Vec<Value>> {
        let list: LanguageList = self
            .executor
            .get("/v1/codex/languages", &QueryParams::new())
            .await?;
        Ok(list.languages)
    }
}
