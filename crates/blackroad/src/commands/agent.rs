//! Agent registry commands.
//!
//! `run` is the long-lived mode: it registers, announces itself in the
//! memory journal, heartbeats until interrupted, then deregisters.

use anyhow::{Context, Result, bail};
use blackroad_sdk::{
    Agent, AgentStatus, AgentType, AgentUpdate, BlackRoadClient, ListAgents, MemoryAction,
    NewMemoryEntry, RegisterAgent, USER_AGENT,
};
use colored::Colorize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{print_json, print_value, short_id};
use crate::cli::{AgentAction, AgentCommand};
use crate::config::Config;

/// Execute agent command.
pub async fn execute(cmd: AgentCommand, config: &Config) -> Result<()> {
    let client = config.client()?;

    let result = match cmd.action {
        AgentAction::List {
            agent_type,
            status,
            limit,
            json,
        } => list(&client, agent_type, status, limit, json).await,

        AgentAction::Get { id, json } => get(&client, &id, json).await,

        AgentAction::Register {
            name,
            agent_type,
            capabilities,
            metadata,
            json,
        } => register(&client, name, agent_type, capabilities, metadata.as_deref(), json).await,

        AgentAction::Update {
            id,
            status,
            capabilities,
            metadata,
        } => update(&client, &id, status, capabilities, metadata.as_deref()).await,

        AgentAction::Heartbeat { id } => heartbeat(&client, &id).await,

        AgentAction::Deregister { id } => deregister(&client, &id).await,

        AgentAction::Run {
            name,
            agent_type,
            capabilities,
            interval,
        } => run(&client, name, agent_type, capabilities, interval, config).await,
    };

    client.close();
    result
}

/// List registered agents.
async fn list(
    client: &BlackRoadClient,
    agent_type: Option<AgentType>,
    status: Option<AgentStatus>,
    limit: u32,
    json: bool,
) -> Result<()> {
    let filter = ListAgents {
        agent_type,
        status,
        limit,
    };
    let agents = client
        .agents()
        .list(&filter)
        .await
        .context("Failed to list agents")?;

    if json {
        return print_json(&agents);
    }

    if agents.is_empty() {
        println!("{} No agents found", "⚠".yellow());
        return Ok(());
    }

    println!("{} {} agents:", "✓".green(), agents.len());
    println!();
    for agent in &agents {
        print_agent(agent);
    }

    Ok(())
}

/// Show one agent.
async fn get(client: &BlackRoadClient, id: &str, json: bool) -> Result<()> {
    let agent = client
        .agents()
        .get(id)
        .await
        .with_context(|| format!("Failed to get agent {id}"))?;

    if json {
        return print_json(&agent);
    }

    print_agent(&agent);
    if !agent.metadata.is_empty() {
        println!("     Metadata:");
        print_value(&Value::Object(agent.metadata.clone()))?;
    }
    Ok(())
}

/// Register a new agent.
async fn register(
    client: &BlackRoadClient,
    name: String,
    agent_type: AgentType,
    capabilities: Vec<String>,
    metadata: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut request = RegisterAgent::new(name)
        .with_type(agent_type)
        .with_capabilities(capabilities);
    if let Some(metadata) = metadata {
        request.metadata = parse_metadata(metadata)?;
    }

    let agent = client
        .agents()
        .register(&request)
        .await
        .context("Failed to register agent")?;

    if json {
        return print_json(&agent);
    }

    println!("{} Agent registered: {}", "✓".green(), agent.id.cyan());
    Ok(())
}

/// Update an agent.
async fn update(
    client: &BlackRoadClient,
    id: &str,
    status: Option<AgentStatus>,
    capabilities: Option<Vec<String>>,
    metadata: Option<&str>,
) -> Result<()> {
    let update = AgentUpdate {
        status,
        capabilities,
        metadata: metadata.map(parse_metadata).transpose()?,
    };
    if update.is_empty() {
        bail!("Nothing to update. Pass --status, --capabilities, or --metadata");
    }

    let agent = client
        .agents()
        .update(id, &update)
        .await
        .with_context(|| format!("Failed to update agent {id}"))?;

    println!("{} Agent updated", "✓".green());
    print_agent(&agent);
    Ok(())
}

async fn heartbeat(client: &BlackRoadClient, id: &str) -> Result<()> {
    client
        .agents()
        .heartbeat(id)
        .await
        .with_context(|| format!("Failed to send heartbeat for {id}"))?;

    println!("{} Heartbeat sent for {}", "✓".green(), id.cyan());
    Ok(())
}

async fn deregister(client: &BlackRoadClient, id: &str) -> Result<()> {
    client
        .agents()
        .deregister(id)
        .await
        .with_context(|| format!("Failed to deregister agent {id}"))?;

    println!("{} Agent deregistered: {}", "✓".green(), id.cyan());
    Ok(())
}

/// Run as a live agent until Ctrl-C.
async fn run(
    client: &BlackRoadClient,
    name: Option<String>,
    agent_type: AgentType,
    capabilities: Vec<String>,
    interval: Option<u64>,
    config: &Config,
) -> Result<()> {
    let name = name
        .or_else(|| config.agent.name.clone())
        .unwrap_or_else(default_agent_name);
    let capabilities = if capabilities.is_empty() {
        config.agent.capabilities.clone()
    } else {
        capabilities
    };
    let interval = Duration::from_secs(
        interval
            .unwrap_or(config.agent.heartbeat_interval_secs)
            .max(1),
    );

    let request = RegisterAgent::new(&name)
        .with_type(agent_type)
        .with_capabilities(capabilities.iter().cloned())
        .with_metadata("host", host_name().unwrap_or_default())
        .with_metadata("client", USER_AGENT);
    let agent = client
        .agents()
        .register(&request)
        .await
        .context("Failed to register agent")?;

    println!(
        "{} Running as {} ({})",
        "✓".green(),
        agent.name.bold(),
        agent.id.cyan()
    );
    println!("  Heartbeat every {}s. Press Ctrl-C to stop.", interval.as_secs());

    let details = if capabilities.is_empty() {
        format!("{agent_type} agent online")
    } else {
        format!("{agent_type} agent online with capabilities: {}", capabilities.join(", "))
    };
    let announce = NewMemoryEntry::new(MemoryAction::Announce, &name, details)
        .with_tags(["startup", "agent"]);
    if let Err(e) = client.memory().log(&announce).await {
        warn!(error = %e, "Failed to announce agent in memory journal");
    }

    let result = heartbeat_loop(client, &agent.id, interval).await;

    match client.agents().deregister(&agent.id).await {
        Ok(_) => println!("{} Deregistered {}", "✓".green(), agent.id.cyan()),
        Err(e) => warn!(agent_id = %agent.id, error = %e, "Failed to deregister agent"),
    }

    result
}

/// Heartbeat on every tick until Ctrl-C. Retryable failures wait for the
/// next tick; anything else ends the loop.
async fn heartbeat_loop(client: &BlackRoadClient, agent_id: &str, interval: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal.context("Failed to listen for Ctrl-C")?;
                println!();
                info!(agent_id, "Shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                match client.agents().heartbeat(agent_id).await {
                    Ok(_) => debug!(agent_id, "Heartbeat sent"),
                    Err(e) if e.is_retryable() => {
                        warn!(agent_id, error = %e, "Heartbeat failed, retrying on next tick");
                    }
                    Err(e) => return Err(e).context("Heartbeat rejected"),
                }
            }
        }
    }
}

/// Parse `--metadata` into a JSON object.
fn parse_metadata(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("--metadata must be valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("--metadata must be a JSON object, got {other}"),
    }
}

fn host_name() -> Option<String> {
    hostname::get().ok().and_then(|h| h.into_string().ok())
}

fn default_agent_name() -> String {
    format!("{}-agent", host_name().unwrap_or_else(|| "blackroad".to_string()))
}

/// Print an agent with formatting.
fn print_agent(agent: &Agent) {
    let status = match agent.status {
        AgentStatus::Active => agent.status.as_str().green(),
        AgentStatus::Idle => agent.status.as_str().yellow(),
        AgentStatus::Offline => agent.status.as_str().dimmed(),
    };

    println!(
        "  {} {} [{}] {}",
        short_id(&agent.id).cyan(),
        agent.name.bold(),
        agent.agent_type,
        status
    );

    if !agent.capabilities.is_empty() {
        println!("     Capabilities: {}", agent.capabilities.join(", ").dimmed());
    }

    match agent.last_seen {
        Some(seen) => println!("     Last seen: {}", seen.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("     Registered: {}", agent.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
    }
    println!();
}
