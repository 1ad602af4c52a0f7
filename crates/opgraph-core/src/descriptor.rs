//! Read-only operator descriptors.
//!
//! A descriptor is the static description of an operator's source products,
//! parameters and computed target properties. Descriptors come out of an
//! [`OperatorRegistry`](crate::OperatorRegistry) and are never mutated by the
//! usage layer.

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

// =============================================================================
// Effective names
// =============================================================================

/// Anything with a declared name and an optional alias.
pub trait ElementDescriptor {
    /// The declared name.
    fn name(&self) -> &str;

    /// The alias, if one was declared.
    fn alias(&self) -> Option<&str>;

    /// The alias if set and non-empty, otherwise the declared name.
    fn effective_name(&self) -> &str {
        match self.alias() {
            Some(alias) if !alias.is_empty() => alias,
            _ => self.name(),
        }
    }
}

macro_rules! impl_element_descriptor {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ElementDescriptor for $ty {
                fn name(&self) -> &str {
                    &self.name
                }

                fn alias(&self) -> Option<&str> {
                    self.alias.as_deref()
                }
            }
        )+
    };
}

impl_element_descriptor!(
    ParameterDescriptor,
    SourceProductDescriptor,
    SourceProductsDescriptor,
    TargetPropertyDescriptor,
    OperatorDescriptor,
);

fn is_false(value: &bool) -> bool {
    !*value
}

// =============================================================================
// Parameters
// =============================================================================

/// Describes one operator parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Valid interval in interval notation, e.g. `[0,1)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_set: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub not_null: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub not_empty: bool,
    /// Element name used for each array item in graph templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_alias: Option<String>,
    /// Array items become direct children of the enclosing element.
    #[serde(default, skip_serializing_if = "is_false")]
    pub items_inlined: bool,
    /// Name of a converter declared by the operator itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<String>,
}

impl ParameterDescriptor {
    /// Create a parameter with only a name and a type.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            data_type,
            description: None,
            interval: None,
            pattern: None,
            format: None,
            value_set: Vec::new(),
            default_value: None,
            unit: None,
            not_null: false,
            not_empty: false,
            item_alias: None,
            items_inlined: false,
            converter: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_value_set(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.value_set = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Mark the parameter as mandatory.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Require a non-empty value.
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    pub fn with_item_alias(mut self, item_alias: impl Into<String>) -> Self {
        self.item_alias = Some(item_alias.into());
        self
    }

    /// Render array items as siblings instead of under a wrapper element.
    pub fn items_inlined(mut self) -> Self {
        self.items_inlined = true;
        self
    }

    pub fn with_converter(mut self, converter: impl Into<String>) -> Self {
        self.converter = Some(converter.into());
        self
    }

    /// The item alias, ignoring empty strings.
    pub fn item_alias(&self) -> Option<&str> {
        self.item_alias.as_deref().filter(|alias| !alias.is_empty())
    }

    pub fn is_structure(&self) -> bool {
        self.data_type.is_structure()
    }

    /// Members of a structure-typed parameter.
    pub fn structure_member_descriptors(&self) -> &[ParameterDescriptor] {
        self.data_type.members()
    }
}

// =============================================================================
// Sources
// =============================================================================

/// Describes one named source product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceProductDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Pattern the source's product type must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

impl SourceProductDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            description: None,
            product_type: None,
            optional: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Describes a variable-size collection of source products.
///
/// `count < 0` means unbounded. A count of zero is not meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceProductsDescriptor {
    #[serde(default = "default_source_products_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default = "default_source_products_count")]
    pub count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_source_products_name() -> String {
    "sourceProducts".to_string()
}

fn default_source_products_count() -> i32 {
    -1
}

impl SourceProductsDescriptor {
    /// An unbounded collection named `sourceProducts`.
    pub fn unbounded() -> Self {
        Self::with_count(default_source_products_count())
    }

    pub fn with_count(count: i32) -> Self {
        Self {
            name: default_source_products_name(),
            alias: None,
            count,
            description: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

// =============================================================================
// Target properties
// =============================================================================

/// Describes a computed property an operator exposes after execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPropertyDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TargetPropertyDescriptor {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            data_type,
            description: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// Operators
// =============================================================================

/// Aggregate description of an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Fully qualified implementation identity, e.g. `org.esa.gpf.SubsetOp`.
    #[serde(default)]
    pub operator_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Internal operators are hidden from the operator catalog.
    #[serde(default, skip_serializing_if = "is_false")]
    pub internal: bool,
    #[serde(default, rename = "sources", skip_serializing_if = "Vec::is_empty")]
    pub source_product_descriptors: Vec<SourceProductDescriptor>,
    #[serde(
        default,
        rename = "sourceProducts",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_products_descriptor: Option<SourceProductsDescriptor>,
    #[serde(default, rename = "parameters", skip_serializing_if = "Vec::is_empty")]
    pub parameter_descriptors: Vec<ParameterDescriptor>,
    #[serde(
        default,
        rename = "targetProperties",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub target_property_descriptors: Vec<TargetPropertyDescriptor>,
}

impl OperatorDescriptor {
    pub fn new(name: impl Into<String>, operator_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            operator_class: operator_class.into(),
            description: None,
            internal: false,
            source_product_descriptors: Vec::new(),
            source_products_descriptor: None,
            parameter_descriptors: Vec::new(),
            target_property_descriptors: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn with_source(mut self, source: SourceProductDescriptor) -> Self {
        self.source_product_descriptors.push(source);
        self
    }

    pub fn with_source_products(mut self, sources: SourceProductsDescriptor) -> Self {
        self.source_products_descriptor = Some(sources);
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameter_descriptors.push(parameter);
        self
    }

    pub fn with_target_property(mut self, property: TargetPropertyDescriptor) -> Self {
        self.target_property_descriptors.push(property);
        self
    }

    /// Canonical alias used in the `<operator>` element of graph files.
    ///
    /// The alias when set, otherwise the simple class name.
    pub fn operator_alias(&self) -> &str {
        if let Some(alias) = self.alias.as_deref().filter(|alias| !alias.is_empty()) {
            return alias;
        }
        let simple = self
            .operator_class
            .rsplit(|c: char| c == '.' || c == '$')
            .next()
            .unwrap_or_default();
        if simple.is_empty() {
            &self.name
        } else {
            simple
        }
    }
}
