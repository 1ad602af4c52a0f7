//! The general usage pattern: a text resource with positional `{n}`
//! placeholders filled with tool constants and the operator list.

use std::path::Path;

use tracing::{debug, warn};

/// Pattern shipped with the crate.
pub const BUNDLED_PATTERN: &str = include_str!("../resources/usage.txt");

/// A usage message pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsagePattern {
    text: String,
}

impl Default for UsagePattern {
    fn default() -> Self {
        Self::new(BUNDLED_PATTERN)
    }
}

impl UsagePattern {
    /// Build a pattern from text; every line ends up newline-terminated.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.lines().map(|line| format!("{}\n", line)).collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Load the pattern at `path`, or the bundled one when `path` is `None`.
    ///
    /// A file that cannot be read yields an empty pattern.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "Loaded usage pattern");
                Self::new(&text)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read usage pattern");
                Self::empty()
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Substitute `{n}` with `args[n]`.
    ///
    /// `''` collapses to a single quote. Placeholders whose index is out of
    /// range or not a number stay as written.
    pub fn format(&self, args: &[&str]) -> String {
        let text = self.text.as_str();
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(index) = rest.find(|c: char| c == '{' || c == '\'') {
            out.push_str(&rest[..index]);
            let tail = &rest[index..];

            if let Some(after) = tail.strip_prefix("''") {
                out.push('\'');
                rest = after;
                continue;
            }
            if tail.starts_with('\'') {
                out.push('\'');
                rest = &tail[1..];
                continue;
            }

            match placeholder(tail, args) {
                Some((value, consumed)) => {
                    out.push_str(value);
                    rest = &tail[consumed..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Resolve a `{n}` at the start of `tail` to its argument and byte length.
fn placeholder<'a>(tail: &str, args: &[&'a str]) -> Option<(&'a str, usize)> {
    let close = tail.find('}')?;
    let digits = &tail[1..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = digits.parse().ok()?;
    args.get(index).map(|value| (*value, close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_positional_substitution() {
        let pattern = UsagePattern::new("{0} writes ''{1}'' ({0})");
        assert_eq!(pattern.format(&["gpt", "x.dim"]), "gpt writes 'x.dim' (gpt)\n");
    }

    #[test]
    fn test_unknown_placeholders_stay_verbatim() {
        let pattern = UsagePattern::new("{0} {7} {name} {} {");
        assert_eq!(pattern.format(&["a"]), "a {7} {name} {} {\n");
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let pattern = UsagePattern::new("one\r\ntwo");
        assert_eq!(pattern.as_str(), "one\ntwo\n");
    }

    #[test]
    fn test_bundled_pattern_has_all_placeholders() {
        let pattern = UsagePattern::default();
        for index in 0..6 {
            assert!(
                pattern.as_str().contains(&format!("{{{}}}", index)),
                "missing placeholder {}",
                index
            );
        }
        let text = pattern.format(&["gpt", "./target.dim", "BEAM-DIMAP", "512", "8", "  Ops\n"]);
        assert!(text.starts_with("Usage:\n  gpt <op>|<graph-file>"));
        assert!(text.contains("Default value is './target.dim'."));
        assert!(text.contains("Default value is 512M."));
        assert!(text.ends_with("Operators:\n  Ops\n\n"));
    }

    #[test]
    fn test_load_configured_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Run {{0}}.").unwrap();

        let pattern = UsagePattern::load(Some(file.path()));
        assert_eq!(pattern.format(&["gpt"]), "Run gpt.\n");
    }

    #[test]
    fn test_unreadable_file_degrades_to_empty() {
        let pattern = UsagePattern::load(Some(Path::new("/nonexistent/usage.txt")));
        assert!(pattern.is_empty());
        assert_eq!(pattern.format(&["gpt"]), "");
    }
}
