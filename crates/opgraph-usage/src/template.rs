//! Graph-template generation.
//!
//! Builds the markup a user would write to invoke an operator inside a
//! processing graph: sources become `${name}` placeholders and parameters
//! become elements whose text is the expected type. Arrays with an item
//! alias show one item followed by a `...` marker; structures expand into
//! their members.

use opgraph_core::{ElementDescriptor, OperatorDescriptor, ParameterDescriptor};

use crate::dom::DomElement;

pub const GRAPH_ID: &str = "someGraphId";
pub const NODE_ID: &str = "someNodeId";
pub const GRAPH_VERSION: &str = "1.0";
/// Child element marking "repeat the previous item".
pub const REPETITION_MARKER: &str = "...";

/// Build the graph template tree for an operator.
pub fn emit_template(operator: &OperatorDescriptor) -> DomElement {
    let mut graph = DomElement::new("graph");
    graph.set_attribute("id", GRAPH_ID);
    graph.create_child("version").set_value(GRAPH_VERSION);

    let node = graph.create_child("node");
    node.set_attribute("id", NODE_ID);
    node.create_child("operator")
        .set_value(operator.operator_alias());

    let sources = node.create_child("sources");
    for source in &operator.source_product_descriptors {
        append_source(source.effective_name(), sources);
    }
    if let Some(products) = &operator.source_products_descriptor {
        append_source(products.effective_name(), sources);
    }

    let parameters = node.create_child("parameters");
    for parameter in &operator.parameter_descriptors {
        append_parameter(parameter, parameters);
    }

    graph
}

/// The template as markup text.
pub fn template_xml(operator: &OperatorDescriptor) -> String {
    emit_template(operator).to_xml()
}

fn append_source(name: &str, sources: &mut DomElement) {
    sources
        .create_child(name)
        .set_value(format!("${{{}}}", name));
}

/// Append `parameter` under `parent`, recursing through structures.
pub fn append_parameter(parameter: &ParameterDescriptor, parent: &mut DomElement) {
    let name = parameter.effective_name();

    if let (Some(component), Some(item_alias)) =
        (parameter.data_type.component(), parameter.item_alias())
    {
        let container = if parameter.items_inlined {
            parent
        } else {
            parent.create_child(name)
        };
        let item = container.create_child(item_alias);
        if component.is_structure() {
            for member in component.members() {
                append_parameter(member, item);
            }
        } else {
            item.set_value(component.type_name());
        }
        container.create_child(REPETITION_MARKER);
        return;
    }

    let element = parent.create_child(name);
    if parameter.is_structure() {
        for member in parameter.structure_member_descriptors() {
            append_parameter(member, element);
        }
    } else {
        element.set_value(parameter.data_type.type_name());
    }
}
