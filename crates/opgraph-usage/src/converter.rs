//! Value-converter availability, which decides whether a parameter can be
//! set from the command line and therefore listed in usage text.

use std::collections::HashSet;

use opgraph_core::{DataType, ParameterDescriptor};

/// Answers whether a value converter exists for a data type.
pub trait ConverterLookup {
    fn has_converter(&self, data_type: &DataType) -> bool;
}

impl<F> ConverterLookup for F
where
    F: Fn(&DataType) -> bool,
{
    fn has_converter(&self, data_type: &DataType) -> bool {
        self(data_type)
    }
}

/// The converters every tool ships with.
///
/// Scalars always convert, arrays convert when their component does and
/// structures never do. Named types convert only once registered.
#[derive(Debug, Clone, Default)]
pub struct DefaultConverters {
    named: HashSet<String>,
}

impl DefaultConverters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for an opaque named type.
    pub fn with_named(mut self, simple_name: impl Into<String>) -> Self {
        self.named.insert(simple_name.into());
        self
    }
}

impl ConverterLookup for DefaultConverters {
    fn has_converter(&self, data_type: &DataType) -> bool {
        match data_type {
            DataType::Named(name) => self.named.contains(name),
            DataType::Array(component) => self.has_converter(component),
            DataType::Structure(_) => false,
            _ => true,
        }
    }
}

/// A parameter is listable when it declares its own converter or the
/// lookup knows one for its type.
pub fn is_listable(parameter: &ParameterDescriptor, converters: &dyn ConverterLookup) -> bool {
    parameter.converter.is_some() || converters.has_converter(&parameter.data_type)
}
