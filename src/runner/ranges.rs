//! Splits a `run:` value into the ranges of its individual command lines.

use std::sync::LazyLock;

use lsp_types::{Position, Range};
use regex::Regex;
use serde::Serialize;

use crate::document::node::{Node, Span};
use crate::document::tree::Snapshot;

/// One line of leading indentation plus the rest of the line.
static LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*)(.*)$").expect("line pattern compiles"));

/// A runnable command line inside a workflow value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandRange {
    /// Character span of the command text.
    pub span: Span,
    pub range: Range,
}

impl CommandRange {
    /// Returns true if `position` lies on the closed range.
    pub fn contains(&self, position: Position) -> bool {
        self.range.start <= position && position <= self.range.end
    }
}

/// Decomposes a matched value into command ranges.
///
/// A `|` block yields one range per content line, with the indentation
/// excluded; the header line never produces a range. A blank or
/// whitespace-only line yields a zero-length range where its indentation
/// ends. Any other
/// scalar yields a single range over its whole span. Mappings and sequences
/// yield nothing.
pub fn command_ranges(snapshot: &Snapshot, value: &Node) -> Vec<CommandRange> {
    let Node::Scalar(scalar) = value else {
        return Vec::new();
    };

    if !scalar.raw.starts_with('|') {
        return vec![CommandRange {
            span: scalar.span,
            range: snapshot.range(scalar.span),
        }];
    }

    line_spans(&scalar.raw, scalar.span.start)
        .into_iter()
        .map(|span| CommandRange {
            span,
            range: snapshot.range(span),
        })
        .collect()
}

/// Character spans of the content lines of a block literal starting at `base`.
fn line_spans(raw: &str, base: usize) -> Vec<Span> {
    LINE.captures_iter(raw)
        .skip(1)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            // the empty match after the final line break is not a line
            if whole.start() == raw.len() && raw.ends_with('\n') {
                return None;
            }
            let indent = caps.get(1)?.as_str();
            let content = caps.get(2)?.as_str().trim_end_matches('\r');

            let start = base + raw[..whole.start()].chars().count() + indent.chars().count();
            Some(Span::new(start, start + content.chars().count()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_workflow;

    fn ranges_text(text: &str) -> Vec<String> {
        let snapshot = parse_workflow(text).unwrap();
        let value = &snapshot.root().as_mapping().unwrap().pairs[0].value;
        command_ranges(&snapshot, value)
            .into_iter()
            .map(|r| snapshot.slice(r.span))
            .collect()
    }

    #[test]
    fn test_line_spans_skip_header() {
        let raw = "|\n  echo a\n  echo b\n";
        let spans = line_spans(raw, 0);
        assert_eq!(spans, vec![Span::new(4, 10), Span::new(13, 19)]);
    }

    #[test]
    fn test_line_spans_keep_blank_lines_as_empty_ranges() {
        let raw = "|\n  echo a\n\n   \n  echo b\n";
        assert_eq!(
            line_spans(raw, 0),
            vec![
                Span::new(4, 10),
                Span::new(11, 11),
                Span::new(15, 15),
                Span::new(18, 24),
            ]
        );
    }

    #[test]
    fn test_line_spans_trim_carriage_return() {
        let raw = "|\r\n  echo a\r\n  \r\n";
        assert_eq!(
            line_spans(raw, 10),
            vec![Span::new(15, 21), Span::new(25, 25)]
        );
    }

    #[test]
    fn test_line_spans_last_line_without_break() {
        assert_eq!(line_spans("|\n  make", 0), vec![Span::new(4, 8)]);
    }

    #[test]
    fn test_block_literal_lines() {
        assert_eq!(
            ranges_text("run: |\n  echo a\n  echo b\n"),
            vec!["echo a", "echo b"]
        );
    }

    #[test]
    fn test_block_literal_keeps_relative_indentation_out() {
        let text = "run: |\n  if true; then\n    echo nested\n  fi\n";
        assert_eq!(ranges_text(text), vec!["if true; then", "echo nested", "fi"]);
    }

    #[test]
    fn test_block_with_chomping_indicator() {
        assert_eq!(ranges_text("run: |-\n  make\n"), vec!["make"]);
    }

    #[test]
    fn test_plain_scalar_is_one_range() {
        let text = "run: cargo test --all\n";
        let snapshot = parse_workflow(text).unwrap();
        let value = &snapshot.root().as_mapping().unwrap().pairs[0].value;
        let ranges = command_ranges(&snapshot, value);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].span, value.span());
        assert_eq!(ranges[0].range, Range::new(Position::new(0, 5), Position::new(0, 21)));
    }

    #[test]
    fn test_folded_scalar_is_one_range() {
        let ranges = ranges_text("run: >\n  echo a\n  echo b\n");
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].starts_with('>'));
    }

    #[test]
    fn test_containers_yield_nothing() {
        assert!(ranges_text("run:\n  a: 1\n").is_empty());
        assert!(ranges_text("run: [a, b]\n").is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "run: |\n  echo \u{e9}t\u{e9}\n  ls\n";
        assert_eq!(ranges_text(text), vec!["echo \u{e9}t\u{e9}", "ls"]);
    }

    #[test]
    fn test_range_contains_is_closed() {
        let range = CommandRange {
            span: Span::new(0, 4),
            range: Range::new(Position::new(1, 2), Position::new(1, 6)),
        };
        assert!(range.contains(Position::new(1, 2)));
        assert!(range.contains(Position::new(1, 6)));
        assert!(!range.contains(Position::new(1, 7)));
        assert!(!range.contains(Position::new(0, 4)));
    }
}
