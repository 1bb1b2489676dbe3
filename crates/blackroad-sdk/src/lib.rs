//! BlackRoad OS SDK
//!
//! Typed async client for the BlackRoad OS HTTP API. One [`BlackRoadClient`]
//! gives access to every resource:
//!
//! - **agents** - Agent Registry: register, heartbeat, update, deregister
//! - **memory** - Append-only hash-chained journal shared by all agents
//! - **codex** - Search over the index of code components
//!
//! Each resource module sits behind a cargo feature of the same name; all
//! are enabled by default.
//!
//! # Configuration
//!
//! The API key comes from [`ClientOptions::api_key`] or the
//! `BLACKROAD_API_KEY` environment variable. The base URL defaults to
//! `https://api.blackroad.io` and the timeout to 30 seconds.
//!
//! # Example
//!
//! ```rust,no_run
//! use blackroad_sdk::{BlackRoadClient, MemoryAction, NewMemoryEntry, RegisterAgent};
//!
//! async fn example() -> blackroad_sdk::BlackRoadResult<()> {
//!     let client = BlackRoadClient::from_env()?;
//!
//!     let agent = client
//!         .agents()
//!         .register(&RegisterAgent::new("indexer").with_capabilities(["search"]))
//!         .await?;
//!
//!     client
//!         .memory()
//!         .log(&NewMemoryEntry::new(MemoryAction::Announce, &agent.name, "online"))
//!         .await?;
//!
//!     client.agents().deregister(&agent.id).await?;
//!     Ok(())
//! }
//! ```

#[cfg(feature = "agents")]
pub mod agents;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "codex")]
pub mod codex;

pub mod client;
pub mod utils;

mod config;
mod error;
mod sdk;

#[cfg(test)]
mod test_support;

// Re-export main SDK types
pub use client::{path_segment, QueryParams, RequestExecutor, USER_AGENT};
pub use config::{
    ClientConfig, ClientOptions, ConfigError, API_KEY_ENV, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{parse_error_message, BlackRoadError, BlackRoadResult};
pub use reqwest::Method;
pub use sdk::BlackRoadClient;

// Re-export feature-gated modules
#[cfg(feature = "agents")]
pub use agents::{Agent, AgentRegistry, AgentStatus, AgentType, AgentUpdate, ListAgents, RegisterAgent};

#[cfg(feature = "memory")]
pub use memory::{
    ChainVerification, MemoryAction, MemoryEntry, MemoryQuery, MemorySystem, NewMemoryEntry,
};

#[cfg(feature = "codex")]
pub use codex::{CodexComponent, CodexQuery, CodexSearch, ComponentType};
