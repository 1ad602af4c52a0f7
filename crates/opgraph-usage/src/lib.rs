//! Opgraph Usage Layer
//!
//! Generates command-line help from operator descriptors and graph files.
//! Nothing here executes an operator; descriptors are only read.
//!
//! ## Architecture
//!
//! - **Element formatting**: one descriptor becomes a [`DocElement`]
//! - **Layout**: batches of elements become aligned two-column lines
//! - **Templates**: an operator becomes a graph-template [`DomElement`]
//! - **Composition**: [`UsageComposer`] assembles the full help texts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use opgraph_core::InMemoryOperatorRegistry;
//! use opgraph_usage::{Config, DefaultConverters, UsageComposer, XmlGraphReader};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let registry = InMemoryOperatorRegistry::from_path("operators.json".as_ref())?;
//!     let converters = DefaultConverters::new();
//!     let reader = XmlGraphReader::new();
//!
//!     let composer = UsageComposer::new(&registry, &converters, &reader, &config);
//!     print!("{}", composer.usage_for_operator("BandMaths"));
//!     Ok(())
//! }
//! ```

mod composer;
mod config;
mod converter;
mod dom;
mod error;
mod format;
mod graph_reader;
pub mod layout;
mod pattern;
mod template;

// Re-export public API
pub use composer::{source_files_placeholder, UsageComposer};
pub use config::{Config, CONFIG_PATH_ENV};
pub use converter::{is_listable, ConverterLookup, DefaultConverters};
pub use dom::{DomElement, DomError, MAX_DEPTH};
pub use error::{UsageError, UsageResult};
pub use format::{
    format_catalog_entry, format_parameter, format_source, format_target_property,
    parameter_description_lines, DocElement, ElementFormatter, ParameterSummary, SourceSummary,
    NO_DESCRIPTION,
};
pub use graph_reader::{
    graph_from_dom, substitute_variables, GraphReader, XmlGraphReader, DEFAULT_PARAMETER_TYPE,
};
pub use pattern::{UsagePattern, BUNDLED_PATTERN};
pub use template::{
    append_parameter, emit_template, template_xml, GRAPH_ID, GRAPH_VERSION, NODE_ID,
    REPETITION_MARKER,
};
