//! Two-column layout of [`DocElement`]s.
//!
//! Elements are sorted by label, labels are padded to a common column and
//! every description line after the first aligns under that column. The
//! result is a list of lines; nothing is written until the caller renders.

use unicode_width::UnicodeWidthStr;

use crate::format::DocElement;

/// Minimum number of spaces between the widest label and its description.
pub const MIN_GUTTER: usize = 4;

/// Lay out `elements` as aligned lines, sorted by syntax label.
pub fn render(elements: &[DocElement]) -> Vec<String> {
    let mut sorted: Vec<&DocElement> = elements.iter().collect();
    sorted.sort_by(|a, b| a.syntax.cmp(&b.syntax));

    let width = sorted
        .iter()
        .map(|element| label_width(&element.syntax))
        .max()
        .unwrap_or(0);
    let column = MIN_GUTTER + width;
    let indent = " ".repeat(column);

    let mut lines = Vec::new();
    for element in sorted {
        if element.description_lines.is_empty() {
            lines.push(element.syntax.trim_end().to_string());
            continue;
        }

        let mut pieces = element
            .description_lines
            .iter()
            .flat_map(|description| split_description(description));

        let first = pieces.next().unwrap_or_default();
        let pad = " ".repeat(column - label_width(&element.syntax));
        lines.push(finish(format!("{}{}{}", element.syntax, pad, first)));

        for piece in pieces {
            lines.push(finish(format!("{}{}", indent, piece)));
        }
    }
    lines
}

/// [`render`] joined into one text block, each line newline-terminated.
pub fn render_text(elements: &[DocElement]) -> String {
    render(elements)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}

/// Display columns taken by a label; wide glyphs count twice.
fn label_width(syntax: &str) -> usize {
    UnicodeWidthStr::width(syntax)
}

/// Split on embedded newlines, dropping trailing empty pieces but keeping
/// at least one.
fn split_description(description: &str) -> Vec<&str> {
    let mut pieces: Vec<&str> = description
        .split('\n')
        .map(|piece| piece.strip_suffix('\r').unwrap_or(piece))
        .collect();
    while pieces.len() > 1 && pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }
    pieces
}

fn finish(line: String) -> String {
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(syntax: &str, lines: &[&str]) -> DocElement {
        DocElement::new(syntax, lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_columns_align_after_widest_label() {
        let elements = vec![
            element("  -Pb=<int>", &["Second.", "More."]),
            element("  -Paaaa=<double>", &["First."]),
        ];

        let lines = render(&elements);
        assert_eq!(
            lines,
            vec![
                "  -Paaaa=<double>    First.",
                "  -Pb=<int>          Second.",
                "                     More.",
            ]
        );
    }

    #[test]
    fn test_embedded_newlines_continue_under_column() {
        let elements = vec![element("x", &["one\ntwo\r\nthree\n"])];
        assert_eq!(render(&elements), vec!["x    one", "     two", "     three"]);
    }

    #[test]
    fn test_element_without_description_prints_label_only() {
        let elements = vec![element("int count", &[]), element("String name", &["The name."])];
        assert_eq!(
            render(&elements),
            vec!["String name    The name.", "int count"]
        );
    }

    #[test]
    fn test_sort_is_by_code_point() {
        let elements = vec![
            element("b", &["2"]),
            element("B", &["1"]),
            element("a", &["3"]),
        ];
        let lines = render(&elements);
        assert_eq!(lines, vec!["B    1", "a    3", "b    2"]);
    }

    #[test]
    fn test_output_is_independent_of_input_order() {
        let forward = vec![
            element("  -Sa=<file>", &["A."]),
            element("  -Pz=<int>", &["Z.", "Zz."]),
            element("  -Pm=<string>", &["M."]),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(render_text(&forward), render_text(&backward));
    }

    #[test]
    fn test_wide_glyphs_pad_by_display_width() {
        let elements = vec![
            element("  -P幅=<int>", &["Y"]),
            element("  -Pabc=<int>", &["X"]),
        ];
        assert_eq!(
            render(&elements),
            vec!["  -Pabc=<int>    X", "  -P幅=<int>     Y"]
        );
    }

    #[test]
    fn test_empty_batch_renders_nothing() {
        assert!(render(&[]).is_empty());
        assert_eq!(render_text(&[]), "");
    }
}
