//! A small markup tree used for graph templates and graph files.
//!
//! [`DomElement::to_xml`] pretty-prints with two-space indentation and
//! [`DomElement::parse`] reads the same dialect back. Element names are
//! taken verbatim, so the `...` repetition marker of graph templates
//! survives a round trip.

use std::fmt;

use thiserror::Error;

/// A markup parse failure at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct DomError {
    pub offset: usize,
    pub message: String,
}

/// One element: name, ordered attributes, optional text value and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomElement {
    name: String,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    children: Vec<DomElement>,
}

impl DomElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set an attribute, replacing an existing one of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Append a new child and return it for further building.
    pub fn create_child(&mut self, name: impl Into<String>) -> &mut DomElement {
        self.children.push(DomElement::new(name));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn children(&self) -> &[DomElement] {
        &self.children
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&DomElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DomElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text value of the first child with the given name.
    pub fn child_value(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(DomElement::value)
    }

    /// Pretty-printed markup, lines separated by `\n`, no trailing newline.
    pub fn to_xml(&self) -> String {
        let mut lines = Vec::new();
        self.write_lines(0, &mut lines);
        lines.join("\n")
    }

    fn write_lines(&self, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        let mut open = format!("{}<{}", indent, self.name);
        for (key, value) in &self.attributes {
            open.push_str(&format!(" {}=\"{}\"", key, escape(value, true)));
        }

        match (&self.value, self.children.is_empty()) {
            (None, true) => lines.push(format!("{}/>", open)),
            (Some(value), true) => lines.push(format!(
                "{}>{}</{}>",
                open,
                escape(value, false),
                self.name
            )),
            (value, false) => {
                lines.push(format!("{}>", open));
                if let Some(value) = value {
                    lines.push(format!("{}  {}", indent, escape(value, false)));
                }
                for child in &self.children {
                    child.write_lines(depth + 1, lines);
                }
                lines.push(format!("{}</{}>", indent, self.name));
            }
        }
    }

    /// Parse markup text into a tree.
    ///
    /// Accepts an XML declaration, processing instructions, comments, a
    /// doctype, CDATA sections and the predefined and numeric entities.
    /// Whitespace-only text is dropped and text values are trimmed.
    pub fn parse(text: &str) -> Result<DomElement, DomError> {
        let mut parser = Parser {
            src: text,
            pos: 0,
            depth: 0,
        };
        parser.skip_misc()?;
        let root = parser.element()?;
        parser.skip_misc()?;
        if parser.pos < parser.src.len() {
            return Err(parser.error("Unexpected content after root element"));
        }
        Ok(root)
    }
}

impl fmt::Display for DomElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// Reader
// =============================================================================

/// Deepest element nesting the reader accepts.
pub const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> DomError {
        DomError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn expect(&mut self, token: &str) -> Result<(), DomError> {
        if self.starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(self.error(format!("Expected '{}'", token)))
        }
    }

    /// Advance past the next `terminator`, returning the text before it.
    fn take_until(&mut self, terminator: &str) -> Result<&'a str, DomError> {
        match self.rest().find(terminator) {
            Some(index) => {
                let taken = &self.rest()[..index];
                self.pos += index + terminator.len();
                Ok(taken)
            }
            None => Err(self.error(format!("Unterminated construct, missing '{}'", terminator))),
        }
    }

    /// Skip whitespace, declarations, comments and doctypes between elements.
    fn skip_misc(&mut self) -> Result<(), DomError> {
        loop {
            self.skip_whitespace();
            if self.starts_with("<?") {
                self.take_until("?>")?;
            } else if self.starts_with("<!--") {
                self.take_until("-->")?;
            } else if self.starts_with("<!DOCTYPE") {
                self.take_until(">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn name(&mut self) -> Result<&'a str, DomError> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '/' | '>' | '=' | '<'))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.error("Expected a name"));
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    fn element(&mut self) -> Result<DomElement, DomError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error("Element nesting too deep"));
        }
        self.depth += 1;
        let element = self.element_body();
        self.depth -= 1;
        element
    }

    fn element_body(&mut self) -> Result<DomElement, DomError> {
        self.expect("<")?;
        let mut element = DomElement::new(self.name()?);

        loop {
            self.skip_whitespace();
            if self.starts_with("/>") {
                self.pos += 2;
                return Ok(element);
            }
            if self.starts_with(">") {
                self.pos += 1;
                break;
            }
            let key = self.name()?;
            self.skip_whitespace();
            self.expect("=")?;
            self.skip_whitespace();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => return Err(self.error("Expected a quoted attribute value")),
            };
            self.pos += 1;
            let start = self.pos;
            let raw = self.take_until(&quote.to_string())?;
            let value = unescape(raw).map_err(|message| DomError {
                offset: start,
                message,
            })?;
            element.set_attribute(key, value);
        }

        let mut text = String::new();
        loop {
            if self.pos >= self.src.len() {
                return Err(self.error(format!("Unclosed element '{}'", element.name)));
            }
            if self.starts_with("</") {
                self.pos += 2;
                let close = self.name()?;
                if close != element.name {
                    return Err(self.error(format!(
                        "Mismatched closing tag '{}' for '{}'",
                        close, element.name
                    )));
                }
                self.skip_whitespace();
                self.expect(">")?;
                break;
            } else if self.starts_with("<!--") {
                self.take_until("-->")?;
            } else if self.starts_with("<![CDATA[") {
                self.pos += "<![CDATA[".len();
                text.push_str(self.take_until("]]>")?);
            } else if self.starts_with("<?") {
                self.take_until("?>")?;
            } else if self.starts_with("<") {
                let child = self.element()?;
                element.children.push(child);
            } else {
                let start = self.pos;
                let rest = self.rest();
                let end = rest.find('<').unwrap_or(rest.len());
                self.pos += end;
                let decoded = unescape(&rest[..end]).map_err(|message| DomError {
                    offset: start,
                    message,
                })?;
                text.push_str(&decoded);
            }
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            element.value = Some(trimmed.to_string());
        }
        Ok(element)
    }
}

fn unescape(raw: &str) -> Result<String, String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| "Unterminated entity reference".to_string())?;
        let entity = &after[..semi];
        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => numeric_entity(entity)
                .ok_or_else(|| format!("Unknown entity '&{};'", entity))?,
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn numeric_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse().ok()?
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_print() {
        let mut root = DomElement::new("graph");
        root.set_attribute("id", "g1");
        root.create_child("version").set_value("1.0");
        let node = root.create_child("node");
        node.create_child("empty");
        node.create_child("...");

        assert_eq!(
            root.to_xml(),
            "<graph id=\"g1\">\n  <version>1.0</version>\n  <node>\n    <empty/>\n    <.../>\n  </node>\n</graph>"
        );
    }

    #[test]
    fn test_escaping_round_trips() {
        let mut root = DomElement::new("expr");
        root.set_attribute("title", "a \"quoted\" <name>");
        root.set_value("radiance_1 > 0 && flags < 2");

        let xml = root.to_xml();
        assert!(xml.contains("&quot;quoted&quot;"));
        assert!(xml.contains("&amp;&amp;"));
        assert_eq!(DomElement::parse(&xml).unwrap(), root);
    }

    #[test]
    fn test_parse_skips_prolog_comments_and_reads_cdata() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- a graph -->
<graph id='g'>
  <node id="n1">
    <expression><![CDATA[a < b]]></expression>
    <!-- ignored -->
    <char>&#65;&#x42;</char>
  </node>
</graph>
"#;
        let root = DomElement::parse(text).unwrap();
        assert_eq!(root.attribute("id"), Some("g"));
        let node = root.child("node").unwrap();
        assert_eq!(node.child_value("expression"), Some("a < b"));
        assert_eq!(node.child_value("char"), Some("AB"));
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn test_set_attribute_replaces() {
        let mut element = DomElement::new("node");
        element.set_attribute("id", "a");
        element.set_attribute("id", "b");
        assert_eq!(element.attributes().len(), 1);
        assert_eq!(element.attribute("id"), Some("b"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(DomElement::parse("").is_err());
        assert!(DomElement::parse("<a><b></a>").is_err());
        assert!(DomElement::parse("<a>").is_err());
        assert!(DomElement::parse("<a/><b/>").is_err());
        assert!(DomElement::parse("<a>&bogus;</a>").is_err());

        let err = DomElement::parse("<a x=1/>").unwrap_err();
        assert_eq!(err.offset, 5);
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_limit_is_accepted() {
        let root = DomElement::parse(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(root.name(), "a");
    }

    #[test]
    fn test_nesting_beyond_limit_is_an_error() {
        let err = DomElement::parse(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err.message, "Element nesting too deep");
        assert_eq!(err.offset, MAX_DEPTH * 3);

        let err = DomElement::parse(&nested(20_000)).unwrap_err();
        assert_eq!(err.message, "Element nesting too deep");
    }
}
