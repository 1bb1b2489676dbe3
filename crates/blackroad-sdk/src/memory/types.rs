//! Memory journal records and request shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::client::QueryParams;
use crate::utils::de::null_as_default;
use crate::utils::time::{format_datetime, iso8601};

/// Default page size for `search`
pub const DEFAULT_SEARCH_LIMIT: u32 = 100;

/// Recommended journal actions. The server accepts any string; this enum
/// only names the shared vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryAction {
    Announce,
    Progress,
    Deployed,
    Created,
    Configured,
    Decided,
    Coordinate,
    Blocked,
    Fixed,
    Validated,
    Milestone,
}

impl MemoryAction {
    pub const ALL: [MemoryAction; 11] = [
        Self::Announce,
        Self::Progress,
        Self::Deployed,
        Self::Created,
        Self::Configured,
        Self::Decided,
        Self::Coordinate,
        Self::Blocked,
        Self::Fixed,
        Self::Validated,
        Self::Milestone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Announce => "announce",
            Self::Progress => "progress",
            Self::Deployed => "deployed",
            Self::Created => "created",
            Self::Configured => "configured",
            Self::Decided => "decided",
            Self::Coordinate => "coordinate",
            Self::Blocked => "blocked",
            Self::Fixed => "fixed",
            Self::Validated => "validated",
            Self::Milestone => "milestone",
        }
    }
}

impl fmt::Display for MemoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unrecognized memory action: {s}"))
    }
}

impl From<MemoryAction> for String {
    fn from(action: MemoryAction) -> Self {
        action.as_str().to_string()
    }
}

/// A single journal entry. `id` and `timestamp` are assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub entity: String,
    pub details: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(alias = "agentId", default)]
    pub agent_id: Option<String>,
}

impl MemoryEntry {
    /// The action, if it belongs to the recommended vocabulary
    pub fn known_action(&self) -> Option<MemoryAction> {
        self.action.parse().ok()
    }
}

/// Body of `POST /v1/memory/log`. `tags` is always sent, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMemoryEntry {
    pub action: String,
    pub entity: String,
    pub details: String,
    pub tags: Vec<String>,
}

impl NewMemoryEntry {
    pub fn new(
        action: impl Into<String>,
        entity: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            entity: entity.into(),
            details: details.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Filters for `GET /v1/memory/search`
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryQuery {
    pub query: Option<String>,
    pub tags: Vec<String>,
    pub action: Option<String>,
    pub agent_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: u32,
}

impl Default for MemoryQuery {
    fn default() -> Self {
        Self {
            query: None,
            tags: Vec::new(),
            action: None,
            agent_id: None,
            since: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl MemoryQuery {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn to_query(&self) -> QueryParams {
        let tags = (!self.tags.is_empty()).then(|| self.tags.join(","));
        QueryParams::new()
            .push("limit", self.limit)
            .push_opt("q", self.query.as_deref())
            .push_opt("tags", tags)
            .push_opt("action", self.action.as_deref())
            .push_opt("agent_id", self.agent_id.as_deref())
            .push_opt("since", self.since.as_ref().map(format_datetime))
    }
}

/// Result of the server-side hash-chain check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainVerification {
    pub valid: bool,
    #[serde(alias = "entriesChecked", default, deserialize_with = "null_as_default")]
    pub entries_checked: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntryList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<MemoryEntry>,
}
