//! Closed type tags carried by parameter and property descriptors.
//!
//! Descriptors never point at live types. Every value type an operator can
//! declare is named by a [`DataType`], and display names are derived from the
//! tag alone.

use serde::{Deserialize, Serialize};

use crate::descriptor::ParameterDescriptor;

/// The data type of a parameter or computed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    /// Character string (`String`).
    #[serde(rename = "string")]
    Text,
    File,
    Date,
    /// Opaque domain type known only by its simple name, e.g. `Rectangle`.
    Named(String),
    /// Homogeneous array of the component type.
    Array(Box<DataType>),
    /// Compound value with its own member parameters.
    Structure(StructureType),
}

/// A structure type: a simple name plus member descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureType {
    pub name: String,
    #[serde(default)]
    pub members: Vec<ParameterDescriptor>,
}

impl DataType {
    /// Shorthand for an array of `component`.
    pub fn array_of(component: DataType) -> Self {
        DataType::Array(Box::new(component))
    }

    /// Shorthand for a structure named `name` with the given members.
    pub fn structure(name: impl Into<String>, members: Vec<ParameterDescriptor>) -> Self {
        DataType::Structure(StructureType {
            name: name.into(),
            members,
        })
    }

    /// Shorthand for an opaque named type.
    pub fn named(name: impl Into<String>) -> Self {
        DataType::Named(name.into())
    }

    pub fn is_array(&self) -> bool {
        matches!(self, DataType::Array(_))
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, DataType::Structure(_))
    }

    /// Component type of an array, `None` for everything else.
    pub fn component(&self) -> Option<&DataType> {
        match self {
            DataType::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Member descriptors of a structure type; empty for other types.
    pub fn members(&self) -> &[ParameterDescriptor] {
        match self {
            DataType::Structure(structure) => &structure.members,
            _ => &[],
        }
    }

    /// The declared simple name, e.g. `int`, `String`, `Rectangle`, `double[]`.
    pub fn simple_name(&self) -> String {
        match self {
            DataType::Boolean => "boolean".to_string(),
            DataType::Byte => "byte".to_string(),
            DataType::Short => "short".to_string(),
            DataType::Int => "int".to_string(),
            DataType::Long => "long".to_string(),
            DataType::Float => "float".to_string(),
            DataType::Double => "double".to_string(),
            DataType::Char => "char".to_string(),
            DataType::Text => "String".to_string(),
            DataType::File => "File".to_string(),
            DataType::Date => "Date".to_string(),
            DataType::Named(name) => name.clone(),
            DataType::Array(component) => format!("{}[]", component.simple_name()),
            DataType::Structure(structure) => structure.name.clone(),
        }
    }

    /// Type name as shown to users in option labels and templates.
    ///
    /// Scalar names are lower-camel-cased (`String` becomes `string`);
    /// arrays repeat the component name: `int,int,int,...`.
    pub fn type_name(&self) -> String {
        match self {
            DataType::Array(component) => {
                let name = component.type_name();
                format!("{name},{name},{name},...")
            }
            other => lower_first(&other.simple_name()),
        }
    }
}

/// Lower-cases the first character when it is upper case.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => first.to_lowercase().chain(chars).collect(),
        _ => name.to_string(),
    }
}
