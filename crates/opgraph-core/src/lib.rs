//! Core descriptor model shared across the opgraph workspace.
//!
//! Operators are described, never executed, here. The crate provides:
//! - **Data types**: a closed [`DataType`] tag set with display-name derivation
//! - **Descriptors**: parameters, sources, computed properties and operators
//! - **Registry**: the [`OperatorRegistry`] lookup seam plus a JSON-backed
//!   in-memory implementation
//! - **Graph**: the header model of processing-graph files

mod data_type;
mod descriptor;
mod error;
mod graph;
mod registry;

pub use data_type::{lower_first, DataType, StructureType};
pub use descriptor::{
    ElementDescriptor, OperatorDescriptor, ParameterDescriptor, SourceProductDescriptor,
    SourceProductsDescriptor, TargetPropertyDescriptor,
};
pub use error::{CatalogError, CatalogResult};
pub use graph::{Graph, GraphNode, Header, HeaderParameter, HeaderSource};
pub use registry::{InMemoryOperatorRegistry, OperatorCatalog, OperatorRegistry};
