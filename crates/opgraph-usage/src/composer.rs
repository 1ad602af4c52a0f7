//! Usage text assembly.
//!
//! [`UsageComposer`] answers the three help requests a command-line front
//! end needs: the general usage with the operator catalog, the usage of a
//! single operator and the usage of a graph file. Every answer is plain
//! text; failures to resolve an operator or read a graph are reported in
//! the text itself.

use std::collections::HashMap;
use std::path::Path;

use opgraph_core::{Graph, OperatorDescriptor, OperatorRegistry};
use tracing::debug;

use crate::config::Config;
use crate::converter::ConverterLookup;
use crate::format::{format_catalog_entry, DocElement, ElementFormatter};
use crate::graph_reader::GraphReader;
use crate::layout;
use crate::pattern::UsagePattern;
use crate::template::template_xml;

/// Placeholder for the source files an operator takes on the command line.
///
/// A negative count means "any number". Zero renders nothing.
pub fn source_files_placeholder(count: i32) -> Option<String> {
    match count {
        c if c < 0 => Some("<source-file-1> <source-file-2> ...".to_string()),
        0 => None,
        1 => Some("<source-file>".to_string()),
        2 => Some("<source-file-1> <source-file-2>".to_string()),
        3 => Some("<source-file-1> <source-file-2> <source-file-3>".to_string()),
        c => Some(format!("<source-file-1> <source-file-2> ... <source-file-{}>", c)),
    }
}

/// Accumulates finished lines; rendered to text exactly once.
#[derive(Debug, Default)]
struct UsageText {
    lines: Vec<String>,
}

impl UsageText {
    /// A titled block, separated from what precedes it by one blank line.
    fn section(&mut self, title: &str, body: Vec<String>) {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.push(format!("{}:", title));
        self.lines.extend(body);
    }

    /// A laid-out element block; omitted when there are no elements.
    fn elements(&mut self, title: &str, elements: &[DocElement]) {
        if !elements.is_empty() {
            self.section(title, layout::render(elements));
        }
    }

    fn render(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

fn indented(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| format!("  {}", line).trim_end().to_string())
        .collect()
}

/// Composes usage text from the registry, a graph reader and configuration.
pub struct UsageComposer<'a> {
    registry: &'a dyn OperatorRegistry,
    converters: &'a dyn ConverterLookup,
    graph_reader: &'a dyn GraphReader,
    config: &'a Config,
    pattern: UsagePattern,
}

impl<'a> UsageComposer<'a> {
    /// Create a composer using the pattern configured in `config`.
    pub fn new(
        registry: &'a dyn OperatorRegistry,
        converters: &'a dyn ConverterLookup,
        graph_reader: &'a dyn GraphReader,
        config: &'a Config,
    ) -> Self {
        Self {
            registry,
            converters,
            graph_reader,
            config,
            pattern: UsagePattern::load(config.usage_pattern_path.as_deref()),
        }
    }

    /// Replace the general usage pattern.
    pub fn with_pattern(mut self, pattern: UsagePattern) -> Self {
        self.pattern = pattern;
        self
    }

    fn formatter(&self) -> ElementFormatter<'a> {
        ElementFormatter::new(self.converters)
    }

    /// General usage: the usage pattern filled with tool constants and the
    /// list of public operators.
    pub fn operator_catalog_summary(&self) -> String {
        let entries: Vec<DocElement> = self
            .registry
            .list_operators()
            .into_iter()
            .filter(|operator| !operator.internal)
            .map(format_catalog_entry)
            .collect();
        debug!(operators = entries.len(), "Composing catalog summary");

        let operator_list = layout::render_text(&entries);
        let cache_size = self.config.tile_cache_size_mb.to_string();
        let parallelism = self.config.tile_scheduler_parallelism.to_string();
        let text = self.pattern.format(&[
            self.config.tool_name.as_str(),
            self.config.default_target_path.as_str(),
            self.config.default_format_name.as_str(),
            cache_size.as_str(),
            parallelism.as_str(),
            operator_list.as_str(),
        ]);

        let mut text = text.trim_end().to_string();
        text.push('\n');
        text
    }

    /// Usage of a single operator, or `Unknown operator '<name>'.`.
    pub fn usage_for_operator(&self, name: &str) -> String {
        let Some(operator) = self.registry.lookup_operator(name) else {
            debug!(operator = name, "Unknown operator");
            return format!("Unknown operator '{}'.", name);
        };
        debug!(operator = name, class = %operator.operator_class, "Composing operator usage");

        let formatter = self.formatter();
        let mut text = UsageText::default();

        let mut invocation = format!("  {} {} [options]", self.config.tool_name, name);
        if let Some(files) = operator
            .source_products_descriptor
            .as_ref()
            .and_then(|products| source_files_placeholder(products.count))
        {
            invocation.push(' ');
            invocation.push_str(&files);
        }
        text.section("Usage", vec![invocation]);

        if let Some(description) = operator.description.as_deref().filter(|d| !d.is_empty()) {
            text.section("Description", indented(description));
        }

        text.elements(
            "Computed Properties",
            &formatter.target_properties(&operator.target_property_descriptors),
        );
        text.elements(
            "Source Options",
            &formatter.sources(&operator.source_product_descriptors),
        );
        text.elements(
            "Parameter Options",
            &formatter.parameters(&operator.parameter_descriptors),
        );
        text.section("Graph XML Format", indented(&template_xml(operator)));

        text.render()
    }

    /// The bare graph template of an operator.
    pub fn template_for_operator(&self, name: &str) -> Option<String> {
        self.registry.lookup_operator(name).map(template_xml)
    }

    /// Look up an operator descriptor.
    pub fn operator(&self, name: &str) -> Option<&OperatorDescriptor> {
        self.registry.lookup_operator(name)
    }

    /// Usage of a graph file; a read failure becomes the returned text.
    ///
    /// A graph without a header has no usage and yields an empty string.
    pub fn usage_for_graph(&self, path: &Path) -> String {
        self.usage_for_graph_with(path, &HashMap::new())
    }

    /// [`usage_for_graph`](Self::usage_for_graph) with graph variables.
    pub fn usage_for_graph_with(&self, path: &Path, params: &HashMap<String, String>) -> String {
        match self.graph_reader.read_graph(path, params) {
            Ok(graph) => self.graph_usage(path, &graph),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Graph could not be read");
                e.to_string()
            }
        }
    }

    fn graph_usage(&self, path: &Path, graph: &Graph) -> String {
        let Some(header) = &graph.header else {
            return String::new();
        };

        let formatter = self.formatter();
        let mut text = UsageText::default();
        text.section(
            "Usage",
            vec![format!(
                "  {} {} [options]",
                self.config.tool_name,
                path.display()
            )],
        );

        text.elements("Source Options", &formatter.header_sources(&header.sources));
        text.elements(
            "Parameter Options",
            &formatter.header_parameters(&header.parameters),
        );
        text.render()
    }
}
