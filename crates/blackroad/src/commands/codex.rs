//! Codex search commands.

use anyhow::{Context, Result};
use blackroad_sdk::{BlackRoadClient, CodexComponent, CodexQuery, ComponentType};
use colored::Colorize;
use serde_json::Value;

use super::{print_json, print_value, truncate};
use crate::cli::{CodexAction, CodexCommand};
use crate::config::Config;

/// Execute codex command.
pub async fn execute(cmd: CodexCommand, config: &Config) -> Result<()> {
    let client = config.client()?;

    let result = match cmd.action {
        CodexAction::Search {
            query,
            component_type,
            language,
            repository,
            limit,
            json,
        } => {
            let query = CodexQuery {
                query,
                component_type,
                language,
                repository,
                limit,
            };
            search(&client, &query, json).await
        }

        CodexAction::Get { id, json } => get(&client, &id, json).await,

        CodexAction::Stats { json } => stats(&client, json).await,

        CodexAction::Languages { json } => languages(&client, json).await,
    };

    client.close();
    result
}

/// Search the index.
async fn search(client: &BlackRoadClient, query: &CodexQuery, json: bool) -> Result<()> {
    let components = client
        .codex()
        .search(query)
        .await
        .context("Failed to search Codex")?;

    if json {
        return print_json(&components);
    }

    if components.is_empty() {
        println!("{} No components found for \"{}\"", "⚠".yellow(), query.query);
        return Ok(());
    }

    println!(
        "{} \"{}\" - Found {} results",
        "🔍".cyan(),
        query.query,
        components.len()
    );
    println!();
    for (i, component) in components.iter().enumerate() {
        print_component(i + 1, component);
    }

    Ok(())
}

async fn get(client: &BlackRoadClient, id: &str, json: bool) -> Result<()> {
    let component = client
        .codex()
        .get(id)
        .await
        .with_context(|| format!("Failed to get component {id}"))?;

    if json {
        return print_json(&component);
    }

    print_component(1, &component);
    if let Some(doc) = &component.docstring {
        for line in doc.lines() {
            println!("     {}", line.dimmed());
        }
    }
    Ok(())
}

async fn stats(client: &BlackRoadClient, json: bool) -> Result<()> {
    let stats = client
        .codex()
        .stats()
        .await
        .context("Failed to get Codex statistics")?;

    if json {
        return print_json(&stats);
    }

    println!("{} Codex Statistics", "📊".cyan());
    println!();
    print_value(&stats)
}

async fn languages(client: &BlackRoadClient, json: bool) -> Result<()> {
    let languages = client
        .codex()
        .languages()
        .await
        .context("Failed to list Codex languages")?;

    if json {
        return print_json(&languages);
    }

    if languages.is_empty() {
        println!("{} No languages indexed", "⚠".yellow());
        return Ok(());
    }

    println!("{} {} languages:", "✓".green(), languages.len());
    for language in &languages {
        println!("  {}", describe_language(language));
    }
    Ok(())
}

/// Languages come back either as bare names or as `{name, count}` objects.
fn describe_language(value: &Value) -> String {
    match value {
        Value::String(name) => name.clone(),
        Value::Object(map) => {
            let name = map
                .get("name")
                .or_else(|| map.get("language"))
                .and_then(Value::as_str)
                .unwrap_or("?");
            match map.get("count").and_then(Value::as_u64) {
                Some(count) => format!("{name} ({count})"),
                None => name.to_string(),
            }
        }
        other => other.to_string(),
    }
}

fn icon(component_type: ComponentType) -> &'static str {
    match component_type {
        ComponentType::Function => "ƒ",
        ComponentType::Class => "⬡",
        ComponentType::Module => "📦",
    }
}

/// Print a component with formatting.
fn print_component(index: usize, component: &CodexComponent) {
    println!(
        "  {}. {} {}",
        index,
        icon(component.component_type),
        component.name.bold()
    );
    println!("     {}", component.location().cyan());

    let mut origin = format!(
        "Language: {} | Type: {}",
        component.language, component.component_type
    );
    if let Some(repo) = &component.repository {
        origin.push_str(&format!(" | Repo: {repo}"));
    }
    println!("     {}", origin.dimmed());

    if let Some(signature) = &component.signature {
        println!("     Signature: {}", truncate(signature, 60));
    }
    println!();
}
