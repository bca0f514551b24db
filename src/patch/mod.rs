//! In-place expectation ledger patching
//!
//! Ledger files are JavaScript data modules (`exports.tests = [ ... ]`)
//! that record per-environment expected results in nested `res: { ... }`
//! blocks. They are never parsed structurally: a patch locates the test's
//! result block by scanning lines, then replaces or inserts exactly one
//! entry, leaving every other line byte-for-byte untouched.

pub mod matcher;

use std::path::Path;

pub use matcher::LineMatcher;

use crate::common::{Error, Result};

/// Prefix of the line the exported test list declaration starts on
const DECLARATION: &str = "exports.tests = [";

/// Ordered line buffer for structure-preserving, line-oriented edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLines {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl SourceLines {
    /// Split text into lines, remembering whether a trailing newline existed
    pub fn parse(text: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if trailing_newline {
            lines.pop();
        }
        Self {
            lines,
            trailing_newline,
        }
    }

    /// Read a ledger file into lines
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        Ok(Self::parse(&text))
    }

    /// Rewrite the whole file from the current lines
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// A located result block: the line it opens on and the two inferred
/// indentation widths
struct ResultBlock {
    open: usize,
    indent: usize,
    member_indent: usize,
}

/// Record `value` under `key` in the result block addressed by `path`
///
/// An existing entry for the key is overwritten in place; otherwise the
/// entry is inserted directly after the block-opening line. Applying the
/// same patch twice yields the same file content as applying it once.
pub fn apply(
    source: &mut SourceLines,
    matcher: &LineMatcher,
    file: &str,
    path: &[String],
    key: &str,
    value: bool,
) -> Result<()> {
    let block = locate(&source.lines, matcher, file, path)?;
    let entry = format!("{}{}: {},", " ".repeat(block.member_indent), key, value);

    let mut i = block.open + 1;
    loop {
        match source.lines.get(i) {
            None => return Err(Error::patch_target(file, "result block is not terminated")),
            Some(line) if is_block_close(line, block.indent) => break,
            Some(line) if entry_names_key(line, key) => {
                source.lines[i] = entry;
                return Ok(());
            }
            Some(_) => i += 1,
        }
    }

    // Key not recorded yet: becomes the first member
    source.lines.insert(block.open + 1, entry);
    Ok(())
}

/// Read back the recorded value for `key` at `path`, if any
pub fn read_entry(
    source: &SourceLines,
    matcher: &LineMatcher,
    file: &str,
    path: &[String],
    key: &str,
) -> Result<Option<bool>> {
    let block = locate(&source.lines, matcher, file, path)?;
    let mut i = block.open + 1;
    loop {
        match source.lines.get(i) {
            None => return Err(Error::patch_target(file, "result block is not terminated")),
            Some(line) if is_block_close(line, block.indent) => return Ok(None),
            Some(line) if entry_names_key(line, key) => return Ok(entry_value(line)),
            Some(_) => i += 1,
        }
    }
}

/// Find the result block for `path` (the first element is the suite name
/// and only selects the file)
fn locate(
    lines: &[String],
    matcher: &LineMatcher,
    file: &str,
    path: &[String],
) -> Result<ResultBlock> {
    if path.len() < 2 {
        return Err(Error::patch_target(file, "path carries no test segments"));
    }

    // Scan to the exported test list declaration
    let mut i = 0;
    loop {
        match lines.get(i) {
            None => return Err(Error::patch_target(file, "test list declaration not found")),
            Some(line) if line.starts_with(DECLARATION) => break,
            Some(_) => i += 1,
        }
    }
    i += 1;

    // Match each path segment in order; scanning resumes from the line the
    // previous segment matched on
    for segment in &path[1..] {
        loop {
            match lines.get(i) {
                None => {
                    return Err(Error::patch_target(
                        file,
                        format!("path segment '{segment}' not found"),
                    ))
                }
                Some(line) if matcher.matches(line, segment) => break,
                Some(_) => i += 1,
            }
        }
    }

    // The matched test either carries its per-key entries directly below
    // (inline block) or wraps them in a dedicated res block further down
    let open = if is_inline_entry(lines.get(i + 1)) {
        i
    } else {
        let mut j = i + 1;
        loop {
            match lines.get(j) {
                None => return Err(Error::patch_target(file, "result block not found")),
                Some(line) if is_res_open(line) => break,
                Some(_) => j += 1,
            }
        }
        j
    };

    let indent = leading_spaces(&lines[open]);
    let member_indent = match lines.get(open + 1) {
        Some(line) if !is_block_close(line, indent) => leading_spaces(line),
        _ => indent + 2,
    };

    Ok(ResultBlock {
        open,
        indent,
        member_indent,
    })
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_res_open(line: &str) -> bool {
    line.contains("res: {") || line.contains("res : {")
}

/// The line closing a block opened at `indent`
fn is_block_close(line: &str, indent: usize) -> bool {
    leading_spaces(line) == indent && line[indent..].starts_with('}')
}

/// A `key: value,` member line (exactly two space-separated tokens)
fn is_inline_entry(line: Option<&String>) -> bool {
    let Some(line) = line else { return false };
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(first), Some(second), None) => first.ends_with(':') && second.ends_with(','),
        _ => false,
    }
}

/// Whether a member line records the given environment key
fn entry_names_key(line: &str, key: &str) -> bool {
    match line.trim_start().split(':').next() {
        Some(head) => head.trim_end().trim_matches(|c| c == '\'' || c == '"') == key,
        None => false,
    }
}

fn entry_value(line: &str) -> Option<bool> {
    let (_, value) = line.split_once(':')?;
    match value.trim().trim_end_matches(',').trim_end() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER: &str = "\
// Expected results for the sample feature suite.
exports.tests = [
  {
    name: 'arrow functions',
    res: {
      engine1_0: false,
      engine2_0: true,
    },
  },
  {
    name: 'iterator protocol',
    subtests: {
      'basic support': {
        res: {
          engine2_0: true,
        },
      },
      'compact form': {
        engine2_0: false,
      },
      'empty block': {
        res: {
        },
      },
    },
  },
];
";

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    fn apply_to(text: &str, segments: &[&str], key: &str, value: bool) -> String {
        let mut source = SourceLines::parse(text);
        apply(
            &mut source,
            &LineMatcher::default(),
            "data-sample.js",
            &path(segments),
            key,
            value,
        )
        .unwrap();
        source.render()
    }

    #[test]
    fn test_insert_becomes_first_member() {
        let patched = apply_to(LEDGER, &["data-sample", "arrow functions"], "engine2_3", true);
        assert!(patched.contains(
            "    res: {\n      engine2_3: true,\n      engine1_0: false,\n      engine2_0: true,\n    },"
        ));
        // Unrelated content is untouched
        assert!(patched.contains("name: 'iterator protocol',"));
        assert!(patched.starts_with("// Expected results"));
        assert!(patched.ends_with("];\n"));
    }

    #[test]
    fn test_update_overwrites_in_place() {
        let patched = apply_to(LEDGER, &["data-sample", "arrow functions"], "engine2_0", false);
        assert!(patched.contains(
            "    res: {\n      engine1_0: false,\n      engine2_0: false,\n    },"
        ));
        assert_eq!(patched.lines().count(), LEDGER.lines().count());
    }

    #[test]
    fn test_patch_is_idempotent() {
        let once = apply_to(LEDGER, &["data-sample", "arrow functions"], "engine2_3", true);
        let twice = apply_to(&once, &["data-sample", "arrow functions"], "engine2_3", true);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_subtest_path() {
        let patched = apply_to(
            LEDGER,
            &["data-sample", "iterator protocol", "basic support"],
            "engine2_3",
            false,
        );
        assert!(patched.contains(
            "        res: {\n          engine2_3: false,\n          engine2_0: true,\n        },"
        ));
        // The sibling test's block is untouched
        assert!(patched.contains("    res: {\n      engine1_0: false,\n      engine2_0: true,\n    },"));
    }

    #[test]
    fn test_inline_block_opens_on_the_matched_line() {
        let patched = apply_to(
            LEDGER,
            &["data-sample", "iterator protocol", "compact form"],
            "engine2_3",
            true,
        );
        assert!(patched.contains(
            "      'compact form': {\n        engine2_3: true,\n        engine2_0: false,\n      },"
        ));
    }

    #[test]
    fn test_empty_block_indent_fallback() {
        let patched = apply_to(
            LEDGER,
            &["data-sample", "iterator protocol", "empty block"],
            "engine2_3",
            true,
        );
        assert!(patched.contains("        res: {\n          engine2_3: true,\n        },"));
    }

    #[test]
    fn test_missing_segment_is_fatal() {
        let mut source = SourceLines::parse(LEDGER);
        let err = apply(
            &mut source,
            &LineMatcher::default(),
            "data-sample.js",
            &path(&["data-sample", "no such test"]),
            "engine2_3",
            true,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PatchTarget { .. }));
        assert!(err.to_string().contains("no such test"));
    }

    #[test]
    fn test_missing_intermediate_segment_is_fatal() {
        let mut source = SourceLines::parse(LEDGER);
        let err = apply(
            &mut source,
            &LineMatcher::default(),
            "data-sample.js",
            &path(&["data-sample", "no such branch", "basic support"]),
            "engine2_3",
            true,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no such branch"));
    }

    #[test]
    fn test_missing_declaration_is_fatal() {
        let mut source = SourceLines::parse("var x = 1;\n");
        let err = apply(
            &mut source,
            &LineMatcher::default(),
            "data-sample.js",
            &path(&["data-sample", "arrow functions"]),
            "engine2_3",
            true,
        )
        .unwrap_err();
        assert!(err.to_string().contains("declaration"));
    }

    #[test]
    fn test_round_trip_read_back() {
        let mut source = SourceLines::parse(LEDGER);
        let matcher = LineMatcher::default();
        let p = path(&["data-sample", "iterator protocol", "basic support"]);
        apply(&mut source, &matcher, "data-sample.js", &p, "engine2_3", false).unwrap();
        let value = read_entry(&source, &matcher, "data-sample.js", &p, "engine2_3").unwrap();
        assert_eq!(value, Some(false));
        // A key that was never recorded reads back as absent
        let missing = read_entry(&source, &matcher, "data-sample.js", &p, "engine9_9").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_trailing_newline_is_preserved() {
        assert!(apply_to(LEDGER, &["data-sample", "arrow functions"], "engine2_3", true).ends_with("];\n"));

        let no_newline = LEDGER.trim_end_matches('\n');
        let patched = apply_to(no_newline, &["data-sample", "arrow functions"], "engine2_3", true);
        assert!(patched.ends_with("];"));
    }

    #[test]
    fn test_source_lines_render_round_trip() {
        assert_eq!(SourceLines::parse(LEDGER).render(), LEDGER);
        assert_eq!(SourceLines::parse("a\nb").render(), "a\nb");
        assert_eq!(SourceLines::parse("").render(), "");
    }
}
