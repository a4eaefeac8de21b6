//! Engine configuration
//!
//! Everything the engine would otherwise read from process-wide settings is
//! carried in a [`GraphConfig`] passed to the constructors.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_RESOLVER_BASE_URL: &str = "https://cn.dataone.org/cn/v2/resolve/";

pub const DEFAULT_COORDINATING_NODE_PATTERN: &str =
    r"cn\S+\.test\.dataone\.org/cn/v\d/resolve|cn\.dataone\.org/cn/v\d/resolve";

/// Configuration for a resource map graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Base URL under which bare identifiers are dereferenced when the graph
    /// itself does not reveal one
    pub resolver_base_url: String,
    /// Regex matching every equivalent coordinating-node resolve URL spelling
    pub coordinating_node_pattern: String,
    /// Declare the fixed namespace prefixes on serialized output
    pub prefixes: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            resolver_base_url: DEFAULT_RESOLVER_BASE_URL.to_string(),
            coordinating_node_pattern: DEFAULT_COORDINATING_NODE_PATTERN.to_string(),
            prefixes: true,
        }
    }
}

impl GraphConfig {
    /// Parse a configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: GraphConfig = serde_yaml::from_str(yaml)?;
        config.coordinating_node_regex()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Compile the coordinating-node pattern
    pub fn coordinating_node_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.coordinating_node_pattern)
            .map_err(|e| ConfigError::InvalidPattern(e.to_string()))
    }

    /// The resolver URL without its scheme or trailing slash, as it replaces
    /// coordinating-node URLs inside documents
    pub fn resolver_host_path(&self) -> &str {
        let url = self.resolver_base_url.as_str();
        let url = url.find("://").map_or(url, |pos| &url[pos + 3..]);
        url.trim_end_matches('/')
    }
}
