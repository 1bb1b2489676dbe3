//! Codex records and request shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::client::QueryParams;
use crate::utils::de::null_as_default;

/// Default page size for `search`
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Kind of indexed code unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Function,
    Class,
    Module,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Module => "module",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "function" => Ok(Self::Function),
            "class" => Ok(Self::Class),
            "module" => Ok(Self::Module),
            other => Err(format!(
                "invalid component type: {other}. Use: function, class, or module"
            )),
        }
    }
}

/// One entry of the code index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodexComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub language: String,
    #[serde(alias = "filePath")]
    pub file_path: String,
    #[serde(alias = "lineNumber")]
    pub line_number: u32,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub docstring: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

impl CodexComponent {
    /// `path:line`, as printed by editors and compilers
    pub fn location(&self) -> String {
        format!("{}:{}", self.file_path, self.line_number)
    }
}

/// Filters for `GET /v1/codex/search`. `query` is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodexQuery {
    pub query: String,
    pub component_type: Option<ComponentType>,
    pub language: Option<String>,
    pub repository: Option<String>,
    pub limit: u32,
}

impl CodexQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            component_type: None,
            language: None,
            repository: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_type(mut self, component_type: ComponentType) -> Self {
        self.component_type = Some(component_type);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("q", &self.query)
            .push("limit", self.limit)
            .push_opt("type", self.component_type.map(|t| t.as_str()))
            .push_opt("language", self.language.as_deref())
            .push_opt("repository", self.repository.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComponentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<CodexComponent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<Value>,
}
