//! Agent records and request shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::client::QueryParams;
use crate::utils::de::null_as_default;
use crate::utils::time::{iso8601, iso8601_option};

/// Default page size for `list`
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Kind of agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    #[default]
    Ai,
    Hardware,
    Hybrid,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Hardware => "hardware",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ai" => Ok(Self::Ai),
            "hardware" => Ok(Self::Hardware),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("invalid agent type: {other}. Use: ai, hardware, or hybrid")),
        }
    }
}

/// Liveness state reported by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Idle,
    Offline,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "idle" => Ok(Self::Idle),
            "offline" => Ok(Self::Offline),
            other => Err(format!("invalid agent status: {other}. Use: active, idle, or offline")),
        }
    }
}

/// A registered agent, as last reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub status: AgentStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capabilities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
    #[serde(alias = "createdAt", with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "lastSeen", default, with = "iso8601_option")]
    pub last_seen: Option<DateTime<Utc>>,
}

/// Filters for listing agents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAgents {
    pub agent_type: Option<AgentType>,
    pub status: Option<AgentStatus>,
    pub limit: u32,
}

impl Default for ListAgents {
    fn default() -> Self {
        Self {
            agent_type: None,
            status: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ListAgents {
    pub fn with_type(mut self, agent_type: AgentType) -> Self {
        self.agent_type = Some(agent_type);
        self
    }

    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("limit", self.limit)
            .push_opt("type", self.agent_type.map(|t| t.as_str()))
            .push_opt("status", self.status.map(|s| s.as_str()))
    }
}

/// Body of `POST /v1/agents`. Every field is always sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterAgent {
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub capabilities: Vec<String>,
    pub metadata: Map<String, Value>,
}

impl RegisterAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent_type: AgentType::default(),
            capabilities: Vec::new(),
            metadata: Map::new(),
        }
    }

    pub fn with_type(mut self, agent_type: AgentType) -> Self {
        self.agent_type = agent_type;
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Body of `PUT /v1/agents/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl AgentUpdate {
    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = Some(capabilities.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.capabilities.is_none() && self.metadata.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AgentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub agents: Vec<Agent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::decode;
    use serde_json::json;

    fn agent_json() -> Value {
        json!({
            "id": "agent-1",
            "name": "test-agent",
            "type": "hybrid",
            "status": "idle",
            "capabilities": ["x", "y"],
            "metadata": {"version": "1.0.0", "cores": 4},
            "created_at": "2026-01-02T03:04:05Z",
            "last_seen": "2026-01-02T04:00:00+00:00",
            "region": "us-west"
        })
    }

    #[test]
    fn test_agent_decode_all_fields() {
        let agent: Agent = decode(agent_json()).unwrap();
        assert_eq!(agent.id, "agent-1");
        assert_eq!(agent.name, "test-agent");
        assert_eq!(agent.agent_type, AgentType::Hybrid);
        assert_eq!(agent.status, AgentStatus::Idle);
        assert_eq!(agent.capabilities, vec!["x", "y"]);
        assert_eq!(agent.metadata.get("cores"), Some(&json!(4)));
        assert_eq!(agent.created_at.to_rfc3339(), "2026-01-02T03:04:05+00:00");
        assert!(agent.last_seen.is_some());
    }

    #[test]
    fn test_agent_reencode_decodes_equal() {
        let agent: Agent = decode(agent_json()).unwrap();
        let again: Agent = decode(serde_json::to_value(&agent).unwrap()).unwrap();
        assert_eq!(agent, again);
    }

    #[test]
    fn test_agent_optional_fields_and_aliases() {
        let agent: Agent = decode(json!({
            "id": "a2",
            "name": "n",
            "type": "ai",
            "status": "active",
            "createdAt": "2026-01-02T03:04:05"
        }))
        .unwrap();
        assert!(agent.capabilities.is_empty());
        assert!(agent.metadata.is_empty());
        assert_eq!(agent.last_seen, None);
    }

    #[test]
    fn test_agent_null_collections_read_as_empty() {
        let mut value = agent_json();
        value["capabilities"] = Value::Null;
        value["metadata"] = Value::Null;
        value["last_seen"] = Value::Null;

        let agent: Agent = decode(value).unwrap();
        assert!(agent.capabilities.is_empty());
        assert!(agent.metadata.is_empty());
        assert_eq!(agent.last_seen, None);

        let list: AgentList = decode(json!({"agents": null})).unwrap();
        assert!(list.agents.is_empty());
    }

    #[test]
    fn test_agent_missing_id_is_decode_error() {
        let mut value = agent_json();
        value.as_object_mut().unwrap().remove("id");
        let err = decode::<Agent>(value).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_agent_bad_timestamp_is_decode_error() {
        let mut value = agent_json();
        value["created_at"] = json!("yesterday");
        assert!(decode::<Agent>(value).unwrap_err().is_decode());
    }

    #[test]
    fn test_agent_unknown_type_is_decode_error() {
        let mut value = agent_json();
        value["type"] = json!("toaster");
        assert!(decode::<Agent>(value).unwrap_err().is_decode());
    }

    #[test]
    fn test_list_query_omits_absent_filters() {
        let query = ListAgents::default().to_query();
        assert_eq!(query.get("limit"), Some("100"));
        assert!(!query.contains("type"));
        assert!(!query.contains("status"));

        let query = ListAgents::default()
            .with_type(AgentType::Hardware)
            .with_status(AgentStatus::Offline)
            .with_limit(5)
            .to_query();
        assert_eq!(query.get("type"), Some("hardware"));
        assert_eq!(query.get("status"), Some("offline"));
        assert_eq!(query.get("limit"), Some("5"));
        assert_eq!(query.iter().filter(|(k, _)| *k == "type").count(), 1);
    }

    #[test]
    fn test_register_body_defaults() {
        let body = serde_json::to_value(RegisterAgent::new("worker")).unwrap();
        assert_eq!(
            body,
            json!({"name": "worker", "type": "ai", "capabilities": [], "metadata": {}})
        );
    }

    #[test]
    fn test_update_body_only_set_fields() {
        let body = serde_json::to_value(AgentUpdate::default().with_status(AgentStatus::Idle)).unwrap();
        assert_eq!(body, json!({"status": "idle"}));
        assert!(AgentUpdate::default().is_empty());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("AI".parse::<AgentType>().unwrap(), AgentType::Ai);
        assert_eq!("offline".parse::<AgentStatus>().unwrap(), AgentStatus::Offline);
        assert!("service".parse::<AgentType>().is_err());
    }
}
