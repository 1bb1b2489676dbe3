//! Memory journal
//!
//! Append-only, hash-chained log shared by every agent. Entries are written
//! with [`MemorySystem::log`] and read back with [`MemorySystem::search`];
//! the chain itself is checked by the server through [`MemorySystem::verify`].
//!
//! ```rust,no_run
//! use blackroad_sdk::{BlackRoadClient, MemoryAction, MemoryQuery, NewMemoryEntry};
//!
//! async fn example(client: &BlackRoadClient) -> blackroad_sdk::BlackRoadResult<()> {
//!     client
//!         .memory()
//!         .log(&NewMemoryEntry::new(MemoryAction::Deployed, "api-gateway", "v2.1.0 live").with_tags(["prod"]))
//!         .await?;
//!
//!     let recent = client.memory().search(&MemoryQuery::default().with_tags(["prod"])).await?;
//!     println!("{} entries", recent.len());
//!     Ok(())
//! }
//! ```

mod types;

pub use types::{
    ChainVerification, MemoryAction, MemoryEntry, MemoryQuery, NewMemoryEntry,
    DEFAULT_SEARCH_LIMIT,
};

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::client::{path_segment, QueryParams, RequestExecutor};
use crate::error::BlackRoadResult;
use types::EntryList;

/// Client for `/v1/memory`
#[derive(Debug, Clone)]
pub struct MemorySystem {
    executor: Arc<RequestExecutor>,
}

impl MemorySystem {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Append an entry to the journal
    pub async fn log(&self, entry: &NewMemoryEntry) -> BlackRoadResult<MemoryEntry> {
        let logged: MemoryEntry = self.executor.post("/v1/memory/log", entry).await?;
        debug!(id = %logged.id, action = %logged.action, entity = %logged.entity, "Logged memory entry");
        Ok(logged)
    }

    /// Search the journal
    pub async fn search(&self, query: &MemoryQuery) -> BlackRoadResult<Vec<MemoryEntry>> {
        let list: EntryList = self
            .executor
            .get("/v1/memory/search", &query.to_query())
            .await?;
        Ok(list.entries)
    }

    /// Aggregate view of the journal, passed through as returned
    pub async fn summary(&self) -> BlackRoadResult<Value> {
        self.executor
            .get("/v1/memory/summary", &QueryParams::new())
            .await
    }

    /// Context the server has assembled for one agent
    pub async fn context(&self, agent_id: &str) -> BlackRoadResult<Value> {
        let path = format!("/v1/memory/context/{}", path_segment(agent_id)?);
        self.executor.get(&path, &QueryParams::new()).await
    }

    /// Ask the server to walk the hash chain
    pub async fn verify(&self) -> BlackRoadResult<ChainVerification> {
        self.executor
            .get("/v1/memory/verify", &QueryParams::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::test_support::{MockResponse, MockServer, pairs};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn memory(server: &MockServer) -> MemorySystem {
        let config = ClientConfig::resolve(server.options()).unwrap();
        MemorySystem::new(Arc::new(RequestExecutor::new(config).unwrap()))
    }

    fn entry_body(id: &str, action: &str) -> Value {
        json!({
            "id": id,
            "timestamp": "2026-04-01T09:30:00Z",
            "action": action,
            "entity": "api-gateway",
            "details": "Version 2.1.0 live",
            "tags": ["prod"],
            "agent_id": null
        })
    }

    #[tokio::test]
    async fn test_log_sends_tags_even_when_empty() {
        let server = MockServer::start().await;
        server.enqueue(MockResponse::json(201, entry_body("m-1", "fixed")));

        let entry = memory(&server)
            .log(&NewMemoryEntry::new(MemoryAction::Fixed, "api-gateway", "Version 2.1.0 live"))
            .await
            .unwrap();
        assert_eq!(entry.id, "m-1");
        assert_eq!(entry.agent_id, None);

        let req = server.last_request();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/v1/memory/log");
        assert_eq!(
            req.json(),
            Some(json!({
                "action": "fixed",
                "entity": "api-gateway",
                "details": "Version 2.1.0 live",
                "tags": []
            }))
        );
    }

    #[tokio::test]
    async fn test_log_then_search_by_tag() {
        let server = MockServer::start().await;
        let memory = memory(&server);

        server.enqueue(MockResponse::json(201, entry_body("m-7", "deployed")));
        memory
            .log(
                &NewMemoryEntry::new(MemoryAction::Deployed, "api-gateway", "Version 2.1.0 live")
                    .with_tags(["prod"]),
            )
            .await
            .unwrap();

        server.enqueue(MockResponse::json(200, json!({"entries": [entry_body("m-7", "deployed")]})));
        let found = memory
            .search(&MemoryQuery::default().with_tags(["prod"]))
            .await
            .unwrap();
        assert!(found.iter().any(|e| e.id == "m-7"));

        let req = server.last_request();
        assert_eq!(req.path, "/v1/memory/search");
        assert_eq!(req.query_pairs(), pairs(&[("limit", "100"), ("tags", "prod")]));
    }

    #[tokio::test]
    async fn test_search_sends_all_filters() {
        let server = MockServer::start().await;
        server.enqueue(MockResponse::json(200, json!({"entries": []})));

        let since = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let found = memory(&server)
            .search(
                &MemoryQuery::default()
                    .with_query("gateway")
                    .with_tags(["prod", "api"])
                    .with_action("deployed")
                    .with_agent("agent-1")
                    .since(since)
                    .with_limit(5),
            )
            .await
            .unwrap();
        assert!(found.is_empty());

        let req = server.last_request();
        assert_eq!(req.query_value("q").as_deref(), Some("gateway"));
        assert_eq!(req.query_value("tags").as_deref(), Some("prod,api"));
        assert_eq!(req.query_value("action").as_deref(), Some("deployed"));
        assert_eq!(req.query_value("agent_id").as_deref(), Some("agent-1"));
        assert_eq!(req.query_value("since").as_deref(), Some("2026-03-01T00:00:00Z"));
        assert_eq!(req.query_value("limit").as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_search_missing_envelope_key_is_empty() {
        let server = MockServer::start().await;
        server.enqueue(MockResponse::json(200, json!({"total": 0})));

        let found = memory(&server).search(&MemoryQuery::default()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_search_bad_entry_is_decode_error() {
        let server = MockServer::start().await;
        let mut bad = entry_body("m-1", "fixed");
        bad.as_object_mut().unwrap().remove("timestamp");
        server.enqueue(MockResponse::json(200, json!({"entries": [bad]})));

        let err = memory(&server).search(&MemoryQuery::default()).await.unwrap_err();
        assert!(err.is_decode(), "{err:?}");
    }

    #[tokio::test]
    async fn test_summary_and_context_pass_through() {
        let server = MockServer::start().await;
        let memory = memory(&server);

        server.enqueue(MockResponse::json(200, json!({"total_entries": 42, "by_action": {"fixed": 3}})));
        let summary = memory.summary().await.unwrap();
        assert_eq!(summary["total_entries"], json!(42));
        assert_eq!(server.last_request().path, "/v1/memory/summary");

        server.enqueue(MockResponse::json(200, json!({"agent_id": "agent-1", "recent": []})));
        let context = memory.context("agent-1").await.unwrap();
        assert_eq!(context["agent_id"], json!("agent-1"));
        assert_eq!(server.last_request().path, "/v1/memory/context/agent-1");

        server.enqueue(MockResponse::json(200, json!({})));
        memory.context("ops/agent#2").await.unwrap();
        assert_eq!(server.last_request().path, "/v1/memory/context/ops%2Fagent%232");
    }

    #[tokio::test]
    async fn test_verify() {
        let server = MockServer::start().await;
        server.enqueue(MockResponse::json(
            200,
            json!({"valid": true, "entries_checked": 128, "errors": []}),
        ));

        let report = memory(&server).verify().await.unwrap();
        assert!(report.valid);
        assert_eq!(report.entries_checked, 128);

        let req = server.last_request();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/v1/memory/verify");
    }

    #[tokio::test]
    async fn test_rate_limit_is_retryable() {
        let server = MockServer::start().await;
        server.enqueue(MockResponse::json(429, json!({"detail": "slow down"})));

        let err = memory(&server).summary().await.unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("slow down"));
    }
}
