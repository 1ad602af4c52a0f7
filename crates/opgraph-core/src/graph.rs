//! Processing-graph model as far as usage generation needs it.
//!
//! A graph file may declare a header listing the sources and parameters a
//! caller has to supply; the header is what graph usage text is built from.

use serde::{Deserialize, Serialize};

use crate::descriptor::ElementDescriptor;

/// A parsed processing graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub header: Option<Header>,
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
}

/// Graph header: the graph's own externally supplied inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Id of the node producing the graph's target product.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub sources: Vec<HeaderSource>,
    #[serde(default)]
    pub parameters: Vec<HeaderParameter>,
}

/// A source declared in a graph header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderSource {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
    /// Default location given as element text.
    #[serde(default)]
    pub location: Option<String>,
}

impl HeaderSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A parameter declared in a graph header. Its type is free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderParameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub value_set: Vec<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub not_empty: bool,
}

impl HeaderParameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }
}

impl ElementDescriptor for HeaderSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn alias(&self) -> Option<&str> {
        None
    }
}

impl ElementDescriptor for HeaderParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn alias(&self) -> Option<&str> {
        None
    }
}

/// A processing node inside a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub operator: String,
}
