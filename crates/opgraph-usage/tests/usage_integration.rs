//! End-to-end usage generation from files on disk: a JSON operator catalog
//! and markup graph files read through the real graph reader.

use std::collections::HashMap;
use std::fs;

use opgraph_core::InMemoryOperatorRegistry;
use opgraph_usage::{
    layout, Config, DefaultConverters, DomElement, UsageComposer, UsagePattern, XmlGraphReader,
};
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "operators": [
    {
      "name": "BandSelect",
      "operatorClass": "org.esa.gpf.BandSelectOp",
      "description": "Creates a new product with only selected bands.",
      "sources": [{ "name": "source", "alias": "sourceProduct" }],
      "parameters": [
        {
          "name": "bandNames",
          "dataType": { "array": "string" },
          "itemAlias": "band",
          "itemsInlined": true,
          "description": "The list of bands."
        },
        {
          "name": "selectedPolarisations",
          "dataType": { "array": "string" },
          "valueSet": ["HH", "HV", "VH", "VV"]
        }
      ]
    },
    {
      "name": "Reproject",
      "alias": "Reprojection",
      "operatorClass": "org.esa.gpf.ReprojectionOp",
      "sourceProducts": { "count": 1 },
      "parameters": [
        {
          "name": "crs",
          "dataType": "string",
          "defaultValue": "EPSG:4326",
          "notEmpty": true
        },
        {
          "name": "region",
          "dataType": { "named": "Geometry" }
        }
      ]
    },
    {
      "name": "Write",
      "operatorClass": "org.esa.gpf.WriteOp",
      "internal": true
    }
  ]
}"#;

const GRAPH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graph id="reprojectGraph">
  <version>1.0</version>
  <header>
    <target refid="reproject"/>
    <source name="input" description="The product to reproject.">${input}</source>
    <parameter name="crs" type="string" defaultValue="EPSG:4326"/>
  </header>
  <!-- one processing node -->
  <node id="reproject">
    <operator>Reprojection</operator>
  </node>
</graph>
"#;

struct Fixture {
    _dir: TempDir,
    registry: InMemoryOperatorRegistry,
    graph_path: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("operators.json");
    let graph_path = dir.path().join("reproject.xml");
    fs::write(&catalog_path, CATALOG).unwrap();
    fs::write(&graph_path, GRAPH).unwrap();

    Fixture {
        registry: InMemoryOperatorRegistry::from_path(&catalog_path).unwrap(),
        graph_path,
        _dir: dir,
    }
}

fn config() -> Config {
    Config {
        tile_scheduler_parallelism: 4,
        ..Config::default()
    }
}

#[test]
fn test_operator_usage_from_catalog_file() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let text = composer.usage_for_operator("BandSelect");

    assert!(text.starts_with("Usage:\n  gpt BandSelect [options]\n\nDescription:\n"));
    assert!(text.contains("  -SsourceProduct=<file>    Sets source 'sourceProduct' to <filepath>.\n"));
    assert!(text.contains("  -PbandNames=<string,string,string,...>"));
    assert!(text.contains("Value must be one of 'HH', 'HV', 'VH', 'VV'."));

    // Inlined items sit directly under <parameters>.
    assert!(text.contains(
        "      <parameters>\n        <band>string</band>\n        <.../>\n        <selectedPolarisations>"
    ));
}

#[test]
fn test_alias_and_fixed_source_count() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let text = composer.usage_for_operator("Reprojection");

    assert!(text.starts_with("Usage:\n  gpt Reprojection [options] <source-file>\n"));
    assert!(text.contains("Default value is 'EPSG:4326'."));
    assert!(text.contains("Value must not be empty."));
    // No converter for Geometry, so no option line, but the template keeps it.
    assert!(!text.contains("-Pregion="));
    assert!(text.contains("        <region>geometry</region>\n"));
    assert!(text.contains("        <sourceProducts>${sourceProducts}</sourceProducts>\n"));
}

#[test]
fn test_registered_converter_lists_named_parameter() {
    let fixture = fixture();
    let converters = DefaultConverters::new().with_named("Geometry");
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let text = composer.usage_for_operator("Reprojection");
    assert!(text.contains("  -Pregion=<geometry>"));
}

#[test]
fn test_template_parses_back_to_same_tree() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let xml = composer.template_for_operator("BandSelect").unwrap();
    let tree = DomElement::parse(&xml).unwrap();

    assert_eq!(tree.attribute("id"), Some("someGraphId"));
    let node = tree.child("node").unwrap();
    assert_eq!(node.attribute("id"), Some("someNodeId"));
    assert_eq!(node.child_value("operator"), Some("BandSelectOp"));
    assert_eq!(
        node.child("sources").unwrap().child_value("sourceProduct"),
        Some("${sourceProduct}")
    );
    assert_eq!(tree.to_xml(), xml);
}

#[test]
fn test_graph_usage_from_file() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let text = composer.usage_for_graph(&fixture.graph_path);
    let usage_line = format!("  gpt {} [options]", fixture.graph_path.display());

    assert!(text.starts_with(&format!("Usage:\n{}\n\nSource Options:\n", usage_line)));
    assert!(text.contains("  -Sinput=<file>    The product to reproject.\n"));
    assert!(text.contains("Parameter Options:\n  -Pcrs=<string>    Sets parameter 'crs' to <string>.\n"));
    assert!(text.ends_with("Default value is 'EPSG:4326'.\n"));
}

#[test]
fn test_graph_usage_with_variables() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let mut params = HashMap::new();
    params.insert("input".to_string(), "scene.dim".to_string());
    let text = composer.usage_for_graph_with(&fixture.graph_path, &params);
    assert!(text.contains("Source Options:"));
}

#[test]
fn test_graph_without_header_has_empty_usage() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let plain = fixture.graph_path.with_file_name("plain.xml");
    fs::write(
        &plain,
        "<graph id=\"plain\"><node id=\"n\"><operator>Reproject</operator></node></graph>",
    )
    .unwrap();

    assert_eq!(composer.usage_for_graph(&plain), "");
}

#[test]
fn test_missing_graph_reports_message() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let missing = fixture.graph_path.with_file_name("missing.xml");
    let text = composer.usage_for_graph(&missing);
    assert!(text.starts_with("Failed to read graph file"));
    assert!(text.contains("missing.xml"));
}

#[test]
fn test_deeply_nested_graph_reports_message() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config);

    let depth = 20_000;
    let deep = fixture.graph_path.with_file_name("deep.xml");
    fs::write(
        &deep,
        format!(
            "<graph id=\"deep\">{}{}</graph>",
            "<a>".repeat(depth),
            "</a>".repeat(depth)
        ),
    )
    .unwrap();

    let text = composer.usage_for_graph(&deep);
    assert!(text.starts_with(&format!("Invalid graph file {}", deep.display())));
    assert!(text.contains("Element nesting too deep"));
}

#[test]
fn test_catalog_summary_with_bundled_pattern() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let reader = XmlGraphReader::new();
    let config = config();
    let composer = UsageComposer::new(&fixture.registry, &converters, &reader, &config)
        .with_pattern(UsagePattern::default());

    let text = composer.operator_catalog_summary();

    assert!(text.starts_with("Usage:\n  gpt <op>|<graph-file> [options]"));
    assert!(text.contains("Default value is 'BEAM-DIMAP'."));
    assert!(text.contains("Default value is 4."));
    assert!(text.ends_with(
        "Operators:\n  BandSelect      Creates a new product with only selected bands.\n  Reprojection    No description available.\n"
    ));
    assert!(!text.contains("Write"));
}

#[test]
fn test_layout_is_permutation_invariant() {
    let fixture = fixture();
    let converters = DefaultConverters::new();
    let formatter = opgraph_usage::ElementFormatter::new(&converters);
    let operator = opgraph_core::OperatorRegistry::lookup_operator(&fixture.registry, "BandSelect")
        .unwrap();

    let elements = formatter.parameters(&operator.parameter_descriptors);
    let mut reversed = elements.clone();
    reversed.reverse();

    assert_eq!(layout::render(&elements), layout::render(&reversed));
}
