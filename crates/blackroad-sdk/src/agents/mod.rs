//! Agent Registry
//!
//! Register agents, keep them alive with heartbeats, and look them up.
//!
//! ```rust,no_run
//! use blackroad_sdk::{AgentType, BlackRoadClient, ListAgents};
//!
//! async fn example(client: &BlackRoadClient) -> blackroad_sdk::BlackRoadResult<()> {
//!     let agents = client.agents().list(&ListAgents::default().with_type(AgentType::Ai)).await?;
//!     for agent in agents {
//!         println!("{}: {}", agent.name, agent.status);
//!     }
//!     Ok(())
//! }
//! ```

mod types;

pub use types::{
    Agent, AgentStatus, AgentType, AgentUpdate, ListAgents, RegisterAgent, DEFAULT_LIST_LIMIT,
};

use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::client::{path_segment, QueryParams, RequestExecutor};
use crate::error::BlackRoadResult;
use types::AgentList;

/// Client for `/v1/agents`
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    executor: Arc<RequestExecutor>,
}

impl AgentRegistry {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    fn agent_path(agent_id: &str) -> BlackRoadResult<String> {
        Ok(format!("/v1/agents/{}", path_segment(agent_id)?))
    }

    /// List registered agents
    pub async fn list(&self, filter: &ListAgents) -> BlackRoadResult<Vec<Agent>> {
        let list: AgentList = self.executor.get("/v1/agents", &filter.to_query()).await?;
        Ok(list.agents)
    }

    /// Get an agent by ID
    pub async fn get(&self, agent_id: &str) -> BlackRoadResult<Agent> {
        self.executor
            .get(&Self::agent_path(agent_id)?, &QueryParams::new())
            .await
    }

    /// Register a new agent; the server assigns `id` and `created_at`
    pub async fn register(&self, req: &RegisterAgent) -> BlackRoadResult<Agent> {
        let agent: Agent = self.executor.post("/v1/agents", req).await?;
        debug!(agent_id = %agent.id, name = %agent.name, "Registered agent");
        Ok(agent)
    }

    /// Update an agent and return the server's view of it
    pub async fn update(&self, agent_id: &str, update: &AgentUpdate) -> BlackRoadResult<Agent> {
        self.executor.put(&Self::agent_path(agent_id)?, update).await
    }

    /// Send a heartbeat. The server's acknowledgement is passed through as-is.
    pub async fn heartbeat(&self, agent_id: &str) -> BlackRoadResult<Value> {
        let path = format!("{}/heartbeat", Self::agent_path(agent_id)?);
        self.executor.post(&path, &json!({})).await
    }

    /// Remove an agent from the registry
    pub async fn deregister(&self, agent_id: &str) -> BlackRoadResult<bool> {
        self.executor.delete(&Self::agent_path(agent_id)?).await?;
        debug!(agent_id, "Deregistered agent");
        Ok(true)
    }
}
