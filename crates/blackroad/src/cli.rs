//! CLI argument definitions using clap derive macros.
//!
//! Command structure mirrors the SDK: one group per API resource.

use blackroad_sdk::{AgentStatus, AgentType, ComponentType};
use clap::{Args, Parser, Subcommand};

/// BlackRoad OS command-line client
///
/// Manage agents, write to and search the shared memory journal, and query
/// the Codex code index.
#[derive(Parser, Debug)]
#[command(name = "blackroad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API base URL (overrides BLACKROAD_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Agent registry (list, register, heartbeat, run)
    Agent(AgentCommand),

    /// Memory journal (log, search, verify)
    Memory(MemoryCommand),

    /// Codex code search
    Codex(CodexCommand),

    /// Show version
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// Agent Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AgentCommand {
    #[command(subcommand)]
    pub action: AgentAction,
}

#[derive(Subcommand, Debug)]
pub enum AgentAction {
    /// List registered agents
    List {
        /// Filter by type (ai, hardware, hybrid)
        #[arg(short = 't', long = "type")]
        agent_type: Option<AgentType>,

        /// Filter by status (active, idle, offline)
        #[arg(short, long)]
        status: Option<AgentStatus>,

        /// Maximum number of agents
        #[arg(short, long, default_value = "100")]
        limit: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one agent
    Get {
        /// Agent ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a new agent
    Register {
        /// Agent name
        #[arg(short, long)]
        name: String,

        /// Agent type (ai, hardware, hybrid)
        #[arg(short = 't', long = "type", default_value = "ai")]
        agent_type: AgentType,

        /// Comma-separated capabilities
        #[arg(short, long, value_delimiter = ',')]
        capabilities: Vec<String>,

        /// Metadata as a JSON object
        #[arg(short, long)]
        metadata: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update status, capabilities or metadata
    Update {
        /// Agent ID
        id: String,

        /// New status (active, idle, offline)
        #[arg(short, long)]
        status: Option<AgentStatus>,

        /// Replacement capability list, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        capabilities: Option<Vec<String>>,

        /// Replacement metadata as a JSON object
        #[arg(short, long)]
        metadata: Option<String>,
    },

    /// Send a single heartbeat
    Heartbeat {
        /// Agent ID
        id: String,
    },

    /// Remove an agent from the registry
    Deregister {
        /// Agent ID
        id: String,
    },

    /// Register, announce, and heartbeat until Ctrl-C, then deregister
    Run {
        /// Agent name (defaults to config, then `<hostname>-agent`)
        #[arg(short, long)]
        name: Option<String>,

        /// Agent type (ai, hardware, hybrid)
        #[arg(short = 't', long = "type", default_value = "ai")]
        agent_type: AgentType,

        /// Comma-separated capabilities (defaults to config)
        #[arg(short, long, value_delimiter = ',')]
        capabilities: Vec<String>,

        /// Seconds between heartbeats (defaults to config, then 30)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct MemoryCommand {
    #[command(subcommand)]
    pub action: MemoryAction,
}

#[derive(Subcommand, Debug)]
pub enum MemoryAction {
    /// Append an entry to the journal
    Log {
        /// Action (announce, progress, deployed, fixed, milestone, ...)
        #[arg(short, long)]
        action: String,

        /// What the entry is about
        #[arg(short, long)]
        entity: String,

        /// Free-form details
        #[arg(short, long)]
        details: String,

        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the journal
    Search {
        /// Free-text query
        query: Option<String>,

        /// Comma-separated tags; entries must carry all of them
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Filter by action
        #[arg(short, long)]
        action: Option<String>,

        /// Filter by agent ID
        #[arg(long)]
        agent: Option<String>,

        /// Only entries after this time (ISO-8601, or relative: 30m, 12h, 7d)
        #[arg(long)]
        since: Option<String>,

        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show journal summary
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the context assembled for an agent
    Context {
        /// Agent ID
        agent_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify hash chain integrity
    Verify {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Codex Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct CodexCommand {
    #[command(subcommand)]
    pub action: CodexAction,
}

#[derive(Subcommand, Debug)]
pub enum CodexAction {
    /// Search the Codex index
    Search {
        /// Search query
        query: String,

        /// Filter by type (function, class, module)
        #[arg(short = 't', long = "type")]
        component_type: Option<ComponentType>,

        /// Filter by language
        #[arg(short, long = "lang")]
        language: Option<String>,

        /// Filter by repository
        #[arg(short, long = "repo")]
        repository: Option<String>,

        /// Number of results
        #[arg(short = 'n', long, default_value = "20")]
        limit: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one component
    Get {
        /// Component ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show Codex statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List indexed languages
    Languages {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
