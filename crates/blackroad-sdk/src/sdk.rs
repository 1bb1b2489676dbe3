//! Main SDK Entry Point
//!
//! [`BlackRoadClient`] resolves configuration once, owns the single request
//! executor, and hands out the resource clients that share it.

use std::sync::Arc;
use tracing::debug;

use crate::client::RequestExecutor;
use crate::config::{ClientConfig, ClientOptions};
use crate::error::BlackRoadResult;

#[cfg(feature = "agents")]
use crate::agents::AgentRegistry;

#[cfg(feature = "memory")]
use crate::memory::MemorySystem;

#[cfg(feature = "codex")]
use crate::codex::CodexSearch;

/// BlackRoad OS client
///
/// Construction never touches the network. [`close`](Self::close) releases
/// the connection pool; resource clients cloned out of this one share it, so
/// they fail with [`BlackRoadError::Closed`](crate::BlackRoadError::Closed)
/// from then on.
///
/// # Example
///
/// ```rust,no_run
/// use blackroad_sdk::{BlackRoadClient, ListAgents};
///
/// async fn example() -> blackroad_sdk::BlackRoadResult<()> {
///     let client = BlackRoadClient::from_env()?;
///     let agents = client.agents().list(&ListAgents::default()).await?;
///     println!("{} agents", agents.len());
///     client.close();
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct BlackRoadClient {
    executor: Arc<RequestExecutor>,

    #[cfg(feature = "agents")]
    agents: AgentRegistry,

    #[cfg(feature = "memory")]
    memory: MemorySystem,

    #[cfg(feature = "codex")]
    codex: CodexSearch,
}

impl BlackRoadClient {
    /// Create a client from explicit options, falling back to the environment
    /// for anything left unset.
    ///
    /// # Errors
    ///
    /// Returns [`BlackRoadError::Config`](crate::BlackRoadError::Config) if no
    /// API key can be found or a value is invalid.
    pub fn new(options: ClientOptions) -> BlackRoadResult<Self> {
        Self::from_config(ClientConfig::resolve(options)?)
    }

    /// Create a client configured entirely from the environment
    pub fn from_env() -> BlackRoadResult<Self> {
        Self::new(ClientOptions::default())
    }

    /// Create a client with an explicit API key and default settings
    pub fn with_api_key(api_key: impl Into<String>) -> BlackRoadResult<Self> {
        Self::new(ClientOptions::default().with_api_key(api_key))
    }

    /// Create a client from an already-resolved configuration
    pub fn from_config(config: ClientConfig) -> BlackRoadResult<Self> {
        let executor = Arc::new(RequestExecutor::new(config)?);
        debug!(base_url = executor.config().base_url(), "Created BlackRoad client");

        Ok(Self {
            #[cfg(feature = "agents")]
            agents: AgentRegistry::new(executor.clone()),
            #[cfg(feature = "memory")]
            memory: MemorySystem::new(executor.clone()),
            #[cfg(feature = "codex")]
            codex: CodexSearch::new(executor.clone()),
            executor,
        })
    }

    /// Get the agent registry
    #[cfg(feature = "agents")]
    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Get the memory journal
    #[cfg(feature = "memory")]
    pub fn memory(&self) -> &MemorySystem {
        &self.memory
    }

    /// Get the Codex search client
    #[cfg(feature = "codex")]
    pub fn codex(&self) -> &CodexSearch {
        &self.codex
    }

    /// Shared request executor, for endpoints without a typed wrapper
    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    /// Resolved configuration
    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    /// Release the connection pool. Later calls through any resource client
    /// obtained from this one fail with
    /// [`BlackRoadError::Closed`](crate::BlackRoadError::Closed).
    pub fn close(self) {
        debug!(
            base_url = self.config().base_url(),
            shared = Arc::strong_count(&self.executor) - 1,
            "Closing BlackRoad client"
        );
        self.executor.close();
    }
}
