//! Turns single descriptors into [`DocElement`]s: a syntax label plus the
//! ordered description sentences shown next to it.
//!
//! Operator parameters and graph header parameters share one sentence
//! pipeline through [`ParameterSummary`]; sources likewise share
//! [`SourceSummary`].

use std::borrow::Cow;

use opgraph_core::{
    ElementDescriptor, HeaderParameter, HeaderSource, OperatorDescriptor, ParameterDescriptor,
    SourceProductDescriptor, TargetPropertyDescriptor,
};

use crate::converter::{is_listable, ConverterLookup};

/// Fallback line for operators without a description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// A syntax label with its description lines, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocElement {
    pub syntax: String,
    pub description_lines: Vec<String>,
}

impl DocElement {
    pub fn new(syntax: impl Into<String>, description_lines: Vec<String>) -> Self {
        Self {
            syntax: syntax.into(),
            description_lines,
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// =============================================================================
// Parameters
// =============================================================================

/// Borrowed view of everything a parameter contributes to usage text.
#[derive(Debug, Clone)]
pub struct ParameterSummary<'a> {
    pub name: &'a str,
    pub type_name: Cow<'a, str>,
    pub description: Option<&'a str>,
    pub interval: Option<&'a str>,
    pub pattern: Option<&'a str>,
    pub format: Option<&'a str>,
    pub value_set: &'a [String],
    pub default_value: Option<&'a str>,
    pub unit: Option<&'a str>,
    pub not_null: bool,
    pub not_empty: bool,
}

impl<'a> From<&'a ParameterDescriptor> for ParameterSummary<'a> {
    fn from(parameter: &'a ParameterDescriptor) -> Self {
        Self {
            name: parameter.effective_name(),
            type_name: Cow::Owned(parameter.data_type.type_name()),
            description: parameter.description.as_deref(),
            interval: parameter.interval.as_deref(),
            pattern: parameter.pattern.as_deref(),
            format: parameter.format.as_deref(),
            value_set: &parameter.value_set,
            default_value: parameter.default_value.as_deref(),
            unit: parameter.unit.as_deref(),
            not_null: parameter.not_null,
            not_empty: parameter.not_empty,
        }
    }
}

impl<'a> From<&'a HeaderParameter> for ParameterSummary<'a> {
    fn from(parameter: &'a HeaderParameter) -> Self {
        Self {
            name: parameter.effective_name(),
            type_name: Cow::Borrowed(&parameter.type_name),
            description: parameter.description.as_deref(),
            interval: parameter.interval.as_deref(),
            pattern: parameter.pattern.as_deref(),
            format: parameter.format.as_deref(),
            value_set: &parameter.value_set,
            default_value: parameter.default_value.as_deref(),
            unit: parameter.unit.as_deref(),
            not_null: parameter.not_null,
            not_empty: parameter.not_empty,
        }
    }
}

/// Option label and description sentences for a parameter.
pub fn format_parameter(parameter: &ParameterSummary<'_>) -> DocElement {
    let syntax = format!("  -P{}=<{}>", parameter.name, parameter.type_name);
    DocElement::new(syntax, parameter_description_lines(parameter))
}

/// Description sentences in their fixed order; each present attribute adds one.
pub fn parameter_description_lines(parameter: &ParameterSummary<'_>) -> Vec<String> {
    let mut lines = Vec::new();

    match present(parameter.description) {
        Some(description) => lines.push(description.to_string()),
        None => lines.push(format!(
            "Sets parameter '{}' to <{}>.",
            parameter.name, parameter.type_name
        )),
    }
    if let Some(interval) = present(parameter.interval) {
        lines.push(format!("Valid interval is {}.", interval));
    }
    if let Some(pattern) = present(parameter.pattern) {
        lines.push(format!("Pattern for valid values is '{}'.", pattern));
    }
    if let Some(format) = present(parameter.format) {
        lines.push(format!("Format for valid values is '{}'.", format));
    }
    if !parameter.value_set.is_empty() {
        lines.push(format!(
            "Value must be one of {}.",
            quoted_list(parameter.value_set)
        ));
    }
    if let Some(default_value) = present(parameter.default_value) {
        lines.push(format!("Default value is '{}'.", default_value));
    }
    if let Some(unit) = present(parameter.unit) {
        lines.push(format!("Parameter unit is '{}'.", unit));
    }
    if parameter.not_null {
        lines.push("This is a mandatory parameter.".to_string());
    }
    if parameter.not_empty {
        lines.push("Value must not be empty.".to_string());
    }

    lines
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| format!("'{}'", value))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Sources
// =============================================================================

/// Borrowed view of a source for usage text.
#[derive(Debug, Clone)]
pub struct SourceSummary<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub product_type: Option<&'a str>,
    pub optional: bool,
}

impl<'a> From<&'a SourceProductDescriptor> for SourceSummary<'a> {
    fn from(source: &'a SourceProductDescriptor) -> Self {
        Self {
            name: source.effective_name(),
            description: source.description.as_deref(),
            product_type: source.product_type.as_deref(),
            optional: source.optional,
        }
    }
}

impl<'a> From<&'a HeaderSource> for SourceSummary<'a> {
    fn from(source: &'a HeaderSource) -> Self {
        Self {
            name: source.effective_name(),
            description: source.description.as_deref(),
            product_type: None,
            optional: source.optional,
        }
    }
}

/// Option label and description sentences for a source.
pub fn format_source(source: &SourceSummary<'_>) -> DocElement {
    let mut lines = Vec::new();

    match present(source.description) {
        Some(description) => lines.push(description.to_string()),
        None => lines.push(format!("Sets source '{}' to <filepath>.", source.name)),
    }
    if let Some(product_type) = present(source.product_type) {
        lines.push(format!(
            "Valid product types must match '{}'.",
            product_type
        ));
    }
    if source.optional {
        lines.push("This is an optional source.".to_string());
    } else {
        lines.push("This is a mandatory source.".to_string());
    }

    DocElement::new(format!("  -S{}=<file>", source.name), lines)
}

// =============================================================================
// Properties and catalog entries
// =============================================================================

/// `<SimpleType> <name>` with the description, if any.
pub fn format_target_property(property: &TargetPropertyDescriptor) -> DocElement {
    let syntax = format!(
        "{} {}",
        property.data_type.simple_name(),
        property.effective_name()
    );
    let lines = present(property.description.as_deref())
        .map(|description| vec![description.to_string()])
        .unwrap_or_default();
    DocElement::new(syntax, lines)
}

/// One operator line in the catalog listing.
pub fn format_catalog_entry(operator: &OperatorDescriptor) -> DocElement {
    let description = present(operator.description.as_deref()).unwrap_or(NO_DESCRIPTION);
    DocElement::new(
        format!("  {}", operator.effective_name()),
        vec![description.to_string()],
    )
}

// =============================================================================
// Operator-level lists
// =============================================================================

/// Builds the element lists for an operator, filtering parameters through
/// an injected converter lookup.
pub struct ElementFormatter<'a> {
    converters: &'a dyn ConverterLookup,
}

impl<'a> ElementFormatter<'a> {
    pub fn new(converters: &'a dyn ConverterLookup) -> Self {
        Self { converters }
    }

    /// Listable parameters only; the rest are silently skipped.
    pub fn parameters(&self, parameters: &[ParameterDescriptor]) -> Vec<DocElement> {
        parameters
            .iter()
            .filter(|parameter| is_listable(parameter, self.converters))
            .map(|parameter| format_parameter(&ParameterSummary::from(parameter)))
            .collect()
    }

    pub fn sources(&self, sources: &[SourceProductDescriptor]) -> Vec<DocElement> {
        sources
            .iter()
            .map(|source| format_source(&SourceSummary::from(source)))
            .collect()
    }

    pub fn target_properties(&self, properties: &[TargetPropertyDescriptor]) -> Vec<DocElement> {
        properties.iter().map(format_target_property).collect()
    }

    /// Header parameters carry a textual type and are always listed.
    pub fn header_parameters(&self, parameters: &[HeaderParameter]) -> Vec<DocElement> {
        parameters
            .iter()
            .map(|parameter| format_parameter(&ParameterSummary::from(parameter)))
            .collect()
    }

    pub fn header_sources(&self, sources: &[HeaderSource]) -> Vec<DocElement> {
        sources
            .iter()
            .map(|source| format_source(&SourceSummary::from(source)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::DefaultConverters;
    use opgraph_core::DataType;

    #[test]
    fn test_generated_parameter_sentence() {
        let parameter = ParameterDescriptor::new("bandNames", DataType::array_of(DataType::Text));
        let element = format_parameter(&ParameterSummary::from(&parameter));

        assert_eq!(element.syntax, "  -PbandNames=<string,string,string,...>");
        assert_eq!(
            element.description_lines,
            vec!["Sets parameter 'bandNames' to <string,string,string,...>."]
        );
    }

    #[test]
    fn test_parameter_sentences_in_fixed_order() {
        let parameter = ParameterDescriptor::new("resampling", DataType::Text)
            .with_alias("method")
            .with_description("The resampling method.")
            .with_interval("[0,3]")
            .with_pattern("[A-Z_]+")
            .with_format("upper case")
            .with_value_set(["NEAREST", "BILINEAR"])
            .with_default_value("NEAREST")
            .with_unit("none")
            .not_null()
            .not_empty();

        let element = format_parameter(&ParameterSummary::from(&parameter));

        assert_eq!(element.syntax, "  -Pmethod=<string>");
        assert_eq!(
            element.description_lines,
            vec![
                "The resampling method.",
                "Valid interval is [0,3].",
                "Pattern for valid values is '[A-Z_]+'.",
                "Format for valid values is 'upper case'.",
                "Value must be one of 'NEAREST', 'BILINEAR'.",
                "Default value is 'NEAREST'.",
                "Parameter unit is 'none'.",
                "This is a mandatory parameter.",
                "Value must not be empty.",
            ]
        );
    }

    #[test]
    fn test_empty_description_counts_as_absent() {
        let parameter = ParameterDescriptor::new("scale", DataType::Double).with_description("");
        let lines = parameter_description_lines(&ParameterSummary::from(&parameter));
        assert_eq!(lines, vec!["Sets parameter 'scale' to <double>."]);
    }

    #[test]
    fn test_source_sentences() {
        let source = SourceProductDescriptor::new("sourceProduct")
            .with_alias("source")
            .with_product_type("MER_.*");
        let element = format_source(&SourceSummary::from(&source));

        assert_eq!(element.syntax, "  -Ssource=<file>");
        assert_eq!(
            element.description_lines,
            vec![
                "Sets source 'source' to <filepath>.",
                "Valid product types must match 'MER_.*'.",
                "This is a mandatory source.",
            ]
        );

        let optional = SourceProductDescriptor::new("mask")
            .with_description("Optional mask.")
            .optional();
        let element = format_source(&SourceSummary::from(&optional));
        assert_eq!(
            element.description_lines,
            vec!["Optional mask.", "This is an optional source."]
        );
    }

    #[test]
    fn test_target_property_label_keeps_simple_name() {
        let property = TargetPropertyDescriptor::new("bandNames", DataType::array_of(DataType::Text))
            .with_description("Names of the written bands.");
        let element = format_target_property(&property);

        assert_eq!(element.syntax, "String[] bandNames");
        assert_eq!(element.description_lines, vec!["Names of the written bands."]);

        let bare = TargetPropertyDescriptor::new("count", DataType::Int);
        assert!(format_target_property(&bare).description_lines.is_empty());
    }

    #[test]
    fn test_catalog_entry_fallback() {
        let op = OperatorDescriptor::new("Write", "org.esa.gpf.WriteOp");
        let element = format_catalog_entry(&op);
        assert_eq!(element.syntax, "  Write");
        assert_eq!(element.description_lines, vec![NO_DESCRIPTION]);
    }

    #[test]
    fn test_unconvertible_parameters_are_omitted() {
        let converters = DefaultConverters::new();
        let formatter = ElementFormatter::new(&converters);
        let parameters = vec![
            ParameterDescriptor::new("region", DataType::named("Rectangle")),
            ParameterDescriptor::new("subSamplingX", DataType::Int),
            ParameterDescriptor::new("band", DataType::structure("Band", vec![])),
        ];

        let elements = formatter.parameters(&parameters);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].syntax, "  -PsubSamplingX=<int>");
    }

    #[test]
    fn test_header_parameter_type_is_verbatim() {
        let mut parameter = HeaderParameter::new("threshold", "Double");
        parameter.not_null = true;
        let converters = DefaultConverters::new();
        let elements = ElementFormatter::new(&converters).header_parameters(&[parameter]);

        assert_eq!(elements[0].syntax, "  -Pthreshold=<Double>");
        assert_eq!(
            elements[0].description_lines,
            vec![
                "Sets parameter 'threshold' to <Double>.",
                "This is a mandatory parameter.",
            ]
        );
    }
}
