//! Usage commands: general usage, operator usage and graph usage.

use std::collections::HashMap;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use opgraph_core::InMemoryOperatorRegistry;
use opgraph_usage::{template_xml, Config, DefaultConverters, UsageComposer, XmlGraphReader};
use tracing::debug;

/// Catalog used when no `catalog_path` is configured.
const BUNDLED_CATALOG: &str = include_str!("../../resources/operators.json");

/// What `gpt operator <name>` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorOutput {
    Usage,
    Xml,
    Json,
}

/// Load the configured operator catalog, or the bundled one.
pub fn load_registry(config: &Config) -> Result<InMemoryOperatorRegistry> {
    let registry = match &config.catalog_path {
        Some(path) => InMemoryOperatorRegistry::from_path(path)
            .with_context(|| format!("Failed to load operator catalog {}", path.display()))?,
        None => InMemoryOperatorRegistry::from_json_str(BUNDLED_CATALOG)
            .context("Bundled operator catalog is invalid")?,
    };
    debug!(operators = registry.len(), "Loaded operator catalog");
    Ok(registry)
}

/// Converters available to the command-line tool.
fn converters() -> DefaultConverters {
    DefaultConverters::new().with_named("Rectangle")
}

/// Print text, making sure it ends with a newline.
fn emit(text: &str) {
    if text.is_empty() {
        return;
    }
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

/// Show the general usage with the operator list.
pub fn operators(config: &Config) -> Result<()> {
    let registry = load_registry(config)?;
    let converters = converters();
    let reader = XmlGraphReader::new();
    let composer = UsageComposer::new(&registry, &converters, &reader, config);

    emit(&composer.operator_catalog_summary());
    Ok(())
}

/// Show one operator. Unknown operators exit with status 1.
pub fn operator(config: &Config, name: &str, output: OperatorOutput) -> Result<ExitCode> {
    let registry = load_registry(config)?;
    let converters = converters();
    let reader = XmlGraphReader::new();
    let composer = UsageComposer::new(&registry, &converters, &reader, config);

    let Some(descriptor) = composer.operator(name) else {
        emit(&composer.usage_for_operator(name));
        return Ok(ExitCode::FAILURE);
    };

    match output {
        OperatorOutput::Usage => emit(&composer.usage_for_operator(name)),
        OperatorOutput::Xml => emit(&template_xml(descriptor)),
        OperatorOutput::Json => emit(&serde_json::to_string_pretty(descriptor)?),
    }
    Ok(ExitCode::SUCCESS)
}

/// Show the usage declared by a graph file.
pub fn graph(config: &Config, path: &Path, define: Vec<(String, String)>) -> Result<()> {
    let registry = load_registry(config)?;
    let converters = converters();
    let reader = XmlGraphReader::new();
    let composer = UsageComposer::new(&registry, &converters, &reader, config);

    let params: HashMap<String, String> = define.into_iter().collect();
    emit(&composer.usage_for_graph_with(path, &params));
    Ok(())
}
