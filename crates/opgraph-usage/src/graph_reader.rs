//! Graph file reading.
//!
//! Graph files are markup documents with an optional `<header>` that
//! declares the sources and parameters a caller supplies. `${key}`
//! references are substituted from caller parameters before parsing.

use std::collections::HashMap;
use std::path::Path;

use opgraph_core::{Graph, GraphNode, Header, HeaderParameter, HeaderSource};
use tracing::debug;

use crate::dom::DomElement;
use crate::error::{UsageError, UsageResult};

/// Type assumed for header parameters that do not declare one.
pub const DEFAULT_PARAMETER_TYPE: &str = "string";

/// Resolves a graph file into a [`Graph`].
pub trait GraphReader {
    fn read_graph(&self, path: &Path, params: &HashMap<String, String>) -> UsageResult<Graph>;
}

/// Reads graph files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlGraphReader;

impl XmlGraphReader {
    pub fn new() -> Self {
        Self
    }
}

impl GraphReader for XmlGraphReader {
    fn read_graph(&self, path: &Path, params: &HashMap<String, String>) -> UsageResult<Graph> {
        let text = std::fs::read_to_string(path).map_err(|e| UsageError::graph_io(path, e))?;
        let text = substitute_variables(&text, params);
        let root =
            DomElement::parse(&text).map_err(|e| UsageError::graph_format(path, e.to_string()))?;
        let graph = graph_from_dom(&root).map_err(|message| UsageError::graph_format(path, message))?;

        debug!(
            path = %path.display(),
            graph = %graph.id,
            nodes = graph.nodes.len(),
            has_header = graph.header.is_some(),
            "Read graph"
        );
        Ok(graph)
    }
}

/// Replace `${key}` with `params[key]`; unknown keys are left as written.
pub fn substitute_variables(text: &str, params: &HashMap<String, String>) -> String {
    if params.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match params.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Map a parsed document onto the graph model.
pub fn graph_from_dom(root: &DomElement) -> Result<Graph, String> {
    if root.name() != "graph" {
        return Err(format!("expected root element 'graph', found '{}'", root.name()));
    }

    let nodes = root
        .children_named("node")
        .map(|node| {
            let id = node
                .attribute("id")
                .ok_or_else(|| "node without 'id' attribute".to_string())?;
            Ok(GraphNode {
                id: id.to_string(),
                operator: node.child_value("operator").unwrap_or_default().to_string(),
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(Graph {
        id: root.attribute("id").unwrap_or_default().to_string(),
        version: root.child_value("version").map(str::to_string),
        header: root.child("header").map(header_from_dom).transpose()?,
        nodes,
    })
}

fn header_from_dom(header: &DomElement) -> Result<Header, String> {
    let sources = header
        .children_named("source")
        .map(|source| {
            let name = required(source, "name", "header source")?;
            Ok(HeaderSource {
                name,
                description: optional(source, "description"),
                optional: flag(source, "optional"),
                location: source.value().map(str::to_string),
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let parameters = header
        .children_named("parameter")
        .map(|parameter| {
            let name = required(parameter, "name", "header parameter")?;
            Ok(HeaderParameter {
                name,
                type_name: optional(parameter, "type")
                    .unwrap_or_else(|| DEFAULT_PARAMETER_TYPE.to_string()),
                description: optional(parameter, "description"),
                label: optional(parameter, "label"),
                interval: optional(parameter, "interval"),
                pattern: optional(parameter, "pattern"),
                format: optional(parameter, "format"),
                value_set: parameter
                    .attribute("valueSet")
                    .map(split_value_set)
                    .unwrap_or_default(),
                default_value: optional(parameter, "defaultValue"),
                unit: optional(parameter, "unit"),
                not_null: flag(parameter, "notNull"),
                not_empty: flag(parameter, "notEmpty"),
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(Header {
        target: header
            .child("target")
            .and_then(|target| target.attribute("refid"))
            .map(str::to_string),
        sources,
        parameters,
    })
}

fn required(element: &DomElement, attribute: &str, what: &str) -> Result<String, String> {
    element
        .attribute(attribute)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("{} without '{}' attribute", what, attribute))
}

fn optional(element: &DomElement, attribute: &str) -> Option<String> {
    element
        .attribute(attribute)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn flag(element: &DomElement, attribute: &str) -> bool {
    element
        .attribute(attribute)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

fn split_value_set(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
