//! Memory journal commands.
//!
//! The journal is append-only: there is no edit or delete, and integrity is
//! checked by the server (`memory verify`).

use anyhow::{Context, Result, anyhow};
use blackroad_sdk::utils::parse_datetime;
use blackroad_sdk::{BlackRoadClient, MemoryEntry, MemoryQuery, NewMemoryEntry};
use chrono::{DateTime, Duration, Utc};
use colored::Colorize;
use tracing::warn;

use super::{print_json, print_value, short_id, truncate};
use crate::cli::{MemoryAction, MemoryCommand};
use crate::config::Config;

/// Execute memory command.
pub async fn execute(cmd: MemoryCommand, config: &Config) -> Result<()> {
    let client = config.client()?;

    let result = match cmd.action {
        MemoryAction::Log {
            action,
            entity,
            details,
            tags,
            json,
        } => log(&client, action, entity, details, tags, json).await,

        MemoryAction::Search {
            query,
            tags,
            action,
            agent,
            since,
            limit,
            json,
        } => {
            let since = since.as_deref().map(parse_since).transpose()?;
            let query = MemoryQuery {
                query,
                tags,
                action,
                agent_id: agent,
                since,
                limit,
            };
            search(&client, &query, json).await
        }

        MemoryAction::Summary { json } => summary(&client, json).await,

        MemoryAction::Context { agent_id, json } => context(&client, &agent_id, json).await,

        MemoryAction::Verify { json } => verify(&client, json).await,
    };

    client.close();
    result
}

/// Append an entry.
async fn log(
    client: &BlackRoadClient,
    action: String,
    entity: String,
    details: String,
    tags: Vec<String>,
    json: bool,
) -> Result<()> {
    if action.parse::<blackroad_sdk::MemoryAction>().is_err() {
        warn!(%action, "Action is outside the recommended vocabulary");
    }

    let entry = client
        .memory()
        .log(&NewMemoryEntry::new(action, entity, details).with_tags(tags))
        .await
        .context("Failed to log memory entry")?;

    if json {
        return print_json(&entry);
    }

    println!("{} Entry logged: {}", "✓".green(), entry.id.cyan());
    if !entry.tags.is_empty() {
        println!("  Tags: {}", entry.tags.join(", "));
    }
    Ok(())
}

/// Search the journal.
async fn search(client: &BlackRoadClient, query: &MemoryQuery, json: bool) -> Result<()> {
    let entries = client
        .memory()
        .search(query)
        .await
        .context("Failed to search memory")?;

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("{} No entries found matching criteria", "⚠".yellow());
        return Ok(());
    }

    println!("{} Found {} entries:", "✓".green(), entries.len());
    println!();
    for entry in &entries {
        print_entry(entry);
    }

    Ok(())
}

async fn summary(client: &BlackRoadClient, json: bool) -> Result<()> {
    let summary = client
        .memory()
        .summary()
        .await
        .context("Failed to get memory summary")?;

    if json {
        return print_json(&summary);
    }

    println!("{} Memory Summary", "📊".cyan());
    println!();
    print_value(&summary)
}

async fn context(client: &BlackRoadClient, agent_id: &str, json: bool) -> Result<()> {
    let context = client
        .memory()
        .context(agent_id)
        .await
        .with_context(|| format!("Failed to get memory context for {agent_id}"))?;

    if json {
        return print_json(&context);
    }

    println!("{} Context for {}", "✓".green(), agent_id.cyan());
    println!();
    print_value(&context)
}

/// Ask the server to verify the hash chain.
async fn verify(client: &BlackRoadClient, json: bool) -> Result<()> {
    let report = client
        .memory()
        .verify()
        .await
        .context("Failed to verify memory chain")?;

    if json {
        return print_json(&report);
    }

    if report.valid {
        println!(
            "{} Chain valid: {} entries verified",
            "✓".green(),
            report.entries_checked
        );
    } else {
        println!("{} Chain invalid!", "✗".red());
        for error in &report.errors {
            println!("  {}", error.red());
        }
    }

    Ok(())
}

/// Parse `--since`: an ISO-8601 timestamp, or a relative age such as
/// `30m`, `12h` or `7d`.
fn parse_since(raw: &str) -> Result<DateTime<Utc>> {
    parse_since_at(raw, Utc::now())
}

fn parse_since_at(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Some(dt) = parse_datetime(raw) {
        return Ok(dt);
    }

    let invalid = || anyhow!("Invalid --since value: {raw}. Use ISO-8601 or an age like 30m, 12h, 7d");
    let raw = raw.trim();
    let split = raw.len().checked_sub(1).ok_or_else(invalid)?;
    if !raw.is_char_boundary(split) {
        return Err(invalid());
    }
    let (amount, unit) = raw.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;
    if amount < 0 {
        return Err(invalid());
    }

    let age = match unit {
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        _ => None,
    }
    .ok_or_else(invalid)?;

    now.checked_sub_signed(age).ok_or_else(invalid)
}

/// Print a journal entry with formatting.
fn print_entry(entry: &MemoryEntry) {
    let action = match entry.known_action() {
        Some(blackroad_sdk::MemoryAction::Blocked) => entry.action.red(),
        Some(blackroad_sdk::MemoryAction::Deployed | blackroad_sdk::MemoryAction::Milestone) => {
            entry.action.green()
        }
        Some(_) => entry.action.cyan(),
        None => entry.action.normal(),
    };

    println!(
        "  [{}] {} {}: {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        short_id(&entry.id).dimmed(),
        action,
        entry.entity.bold()
    );
    println!("     {}", truncate(&entry.details, 100));

    if !entry.tags.is_empty() {
        println!("     Tags: {}", entry.tags.join(", ").dimmed());
    }
    if let Some(agent_id) = &entry.agent_id {
        println!("     Agent: {}", agent_id.dimmed());
    }
    println!();
}
