//! YAML parsing with source position tracking.
//!
//! This module turns document text into a [`Snapshot`]: a syntax tree whose
//! nodes know their character spans in the source. The low-level event API of
//! `yaml-rust2` reports only where each event *starts*, so end offsets are
//! recovered from the text itself:
//!
//! - quoted scalars end after their closing quote;
//! - single-line plain scalars end after their text;
//! - block scalars (`|`, `>`) start at their indicator, which the scanner
//!   does not report, and end after their last content line, including its
//!   line break;
//! - multi-line plain scalars end at the last non-blank, non-comment character
//!   before the next event;
//! - implicit empty values (`key:` with nothing after it) get a zero-width
//!   span right after their key;
//! - containers end where their last child ends, or after the closing bracket
//!   for flow collections; block mappings start at their first key.
//!
//! Only the first document of a multi-document stream becomes the tree.
//!
//! # Example
//!
//! ```
//! use workflowlens::document::parser::parse_workflow;
//!
//! let text = "jobs:\n  build:\n    runs-on: ubuntu-latest\n";
//! let snapshot = parse_workflow(text).unwrap();
//! assert_eq!(snapshot.root().span().end, text.chars().count());
//! ```

use yaml_rust2::parser::Parser;
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::Event;

use super::error::DocumentError;
use super::node::{Key, MappingNode, Node, Pair, ScalarNode, ScalarStyle, SequenceNode, Span};
use super::tree::Snapshot;

/// Parses workflow text into a [`Snapshot`].
///
/// Empty (or comment-only) text yields an empty mapping root. The root node's
/// span always covers the whole text.
///
/// # Errors
///
/// Returns [`DocumentError::Syntax`] if the text is not well-formed YAML.
///
/// ```
/// use workflowlens::document::parser::parse_workflow;
///
/// assert!(parse_workflow("jobs: [unclosed").is_err());
/// ```
pub fn parse_workflow(text: &str) -> Result<Snapshot, DocumentError> {
    let chars: Vec<char> = text.chars().collect();
    let events = collect_events(text, &chars)?;

    let mut builder = TreeBuilder {
        chars: &chars,
        events,
        pos: 0,
    };
    let mut root = builder.build_root();
    *root.span_mut() = Span::new(0, chars.len());

    tracing::trace!(chars = chars.len(), "parsed workflow snapshot");
    Ok(Snapshot::new(text.to_string(), root))
}

/// Runs the event parser to completion, keeping the start offset of each event.
///
/// Offsets come from the marker's line and column: inside block scalars the
/// marker index advances by bytes rather than characters.
fn collect_events(text: &str, chars: &[char]) -> Result<Vec<(Event, usize)>, DocumentError> {
    let starts = line_starts(chars);
    let mut parser = Parser::new_from_str(text);
    let mut events = Vec::new();
    loop {
        let (event, marker) = parser.next_token().map_err(|err| {
            let offset = char_offset(&starts, chars.len(), err.marker());
            DocumentError::from_scan(&err, offset)
        })?;
        let done = event == Event::StreamEnd;
        events.push((event, char_offset(&starts, chars.len(), &marker)));
        if done {
            return Ok(events);
        }
    }
}

/// Character offset of every line start. `\r\n`, `\n` and a lone `\r` each
/// end a line, as they do for the scanner.
fn line_starts(chars: &[char]) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, ch) in chars.iter().enumerate() {
        let breaks = match ch {
            '\n' => true,
            '\r' => chars.get(idx + 1) != Some(&'\n'),
            _ => false,
        };
        if breaks {
            starts.push(idx + 1);
        }
    }
    starts
}

fn char_offset(starts: &[usize], len: usize, marker: &Marker) -> usize {
    marker
        .line()
        .checked_sub(1)
        .and_then(|line| starts.get(line))
        .map_or(len, |start| (start + marker.col()).min(len))
}

struct TreeBuilder<'a> {
    chars: &'a [char],
    events: Vec<(Event, usize)>,
    pos: usize,
}

/// A block mapping is reported at its first `:`; it really starts at its
/// first key.
fn block_start(pairs: &[Pair], mark: usize) -> usize {
    pairs.first().map_or(mark, |pair| pair.key.span.start.min(mark))
}

impl TreeBuilder<'_> {
    fn build_root(&mut self) -> Node {
        while let Some((event, _)) = self.events.get(self.pos) {
            match event {
                Event::StreamStart | Event::DocumentStart | Event::Nothing => self.pos += 1,
                _ => break,
            }
        }

        match self.events.get(self.pos) {
            Some((Event::StreamEnd, _)) | Some((Event::DocumentEnd, _)) | None => {
                Node::Mapping(MappingNode {
                    span: Span::new(0, self.chars.len()),
                    pairs: Vec::new(),
                })
            }
            Some(_) => self.node(None),
        }
    }

    /// Offset at which the event after the current one starts.
    fn next_mark(&self) -> usize {
        self.events
            .get(self.pos)
            .map_or(self.chars.len(), |(_, mark)| (*mark).min(self.chars.len()))
    }

    /// Builds the node starting at the current event. `empty_at` positions an
    /// implicit empty scalar (right after its key).
    fn node(&mut self, empty_at: Option<usize>) -> Node {
        let Some((event, mark)) = self.events.get(self.pos).cloned() else {
            let end = self.chars.len();
            return Node::Scalar(self.implicit_empty(end));
        };
        self.pos += 1;

        match event {
            Event::Scalar(value, style, _, _) => {
                Node::Scalar(self.scalar(value, style, mark, empty_at))
            }
            Event::Alias(_) => Node::Scalar(self.alias(mark)),
            Event::SequenceStart(..) => Node::Sequence(self.sequence(mark)),
            Event::MappingStart(..) => Node::Mapping(self.mapping(mark)),
            _ => Node::Scalar(self.implicit_empty(empty_at.unwrap_or(mark))),
        }
    }

    fn sequence(&mut self, start: usize) -> SequenceNode {
        let flow = self.chars.get(start) == Some(&'[');
        let mut items = Vec::new();

        loop {
            match self.events.get(self.pos) {
                Some((Event::SequenceEnd, end_mark)) => {
                    let end_mark = *end_mark;
                    self.pos += 1;
                    let end = if flow {
                        end_mark + 1
                    } else {
                        items.last().map(|n: &Node| n.span().end).unwrap_or(start)
                    };
                    return SequenceNode {
                        span: Span::new(start, end.max(start)),
                        items,
                    };
                }
                Some((Event::StreamEnd, _)) | None => {
                    let end = items.last().map(|n| n.span().end).unwrap_or(start);
                    return SequenceNode {
                        span: Span::new(start, end),
                        items,
                    };
                }
                Some(_) => items.push(self.node(None)),
            }
        }
    }

    fn mapping(&mut self, start: usize) -> MappingNode {
        let flow = self.chars.get(start) == Some(&'{');
        let mut pairs: Vec<Pair> = Vec::new();

        loop {
            match self.events.get(self.pos) {
                Some((Event::MappingEnd, end_mark)) => {
                    let end_mark = *end_mark;
                    self.pos += 1;
                    let end = if flow {
                        end_mark + 1
                    } else {
                        pairs.last().map(|p| p.span.end).unwrap_or(start)
                    };
                    let start = if flow { start } else { block_start(&pairs, start) };
                    return MappingNode {
                        span: Span::new(start, end.max(start)),
                        pairs,
                    };
                }
                Some((Event::StreamEnd, _)) | None => {
                    let end = pairs.last().map(|p| p.span.end).unwrap_or(start);
                    let start = if flow { start } else { block_start(&pairs, start) };
                    return MappingNode {
                        span: Span::new(start, end.max(start)),
                        pairs,
                    };
                }
                Some(_) => {
                    let key = self.key();
                    let after_key = self.after_colon(key.span.end);
                    let value = self.node(Some(after_key));
                    let end = value.span().end.max(key.span.end);
                    pairs.push(Pair {
                        span: Span::new(key.span.start, end),
                        key,
                        value,
                    });
                }
            }
        }
    }

    fn key(&mut self) -> Key {
        let node = self.node(None);
        match node {
            Node::Scalar(scalar) => Key {
                span: scalar.span,
                value: scalar.value,
            },
            // Complex keys are identified by their source text
            other => {
                let span = other.span();
                Key {
                    span,
                    value: self.slice(span).trim().to_string(),
                }
            }
        }
    }

    /// Position right after the `:` that follows a key, if there is one on
    /// the same line; otherwise the key end itself.
    fn after_colon(&self, key_end: usize) -> usize {
        let mut idx = key_end;
        while let Some(ch) = self.chars.get(idx) {
            match ch {
                ' ' | '\t' | '"' | '\'' => idx += 1,
                ':' => return idx + 1,
                _ => break,
            }
        }
        key_end
    }

    fn scalar(
        &self,
        value: String,
        style: TScalarStyle,
        mark: usize,
        empty_at: Option<usize>,
    ) -> ScalarNode {
        let style = match style {
            TScalarStyle::Plain => ScalarStyle::Plain,
            TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            TScalarStyle::Literal => ScalarStyle::Literal,
            TScalarStyle::Folded => ScalarStyle::Folded,
        };

        if style == ScalarStyle::Plain && value.is_empty() {
            return self.implicit_empty(empty_at.unwrap_or(mark));
        }

        let span = match style {
            ScalarStyle::SingleQuoted => Span::new(mark, self.single_quoted_end(mark)),
            ScalarStyle::DoubleQuoted => Span::new(mark, self.double_quoted_end(mark)),
            ScalarStyle::Literal | ScalarStyle::Folded => {
                let indicator = self.block_indicator(mark);
                Span::new(indicator, self.block_end(indicator))
            }
            ScalarStyle::Plain => Span::new(mark, self.plain_end(&value, mark)),
        };

        ScalarNode {
            span,
            raw: self.slice(span),
            value,
            style,
        }
    }

    fn alias(&self, mark: usize) -> ScalarNode {
        let mut end = mark + 1;
        while let Some(ch) = self.chars.get(end) {
            if ch.is_whitespace() || matches!(ch, ',' | '[' | ']' | '{' | '}') {
                break;
            }
            end += 1;
        }
        let span = Span::new(mark, end);
        let raw = self.slice(span);
        ScalarNode {
            span,
            value: raw.clone(),
            raw,
            style: ScalarStyle::Plain,
        }
    }

    fn implicit_empty(&self, at: usize) -> ScalarNode {
        ScalarNode {
            span: Span::new(at, at),
            value: String::new(),
            raw: String::new(),
            style: ScalarStyle::Plain,
        }
    }

    fn single_quoted_end(&self, mark: usize) -> usize {
        let mut idx = mark + 1;
        while idx < self.chars.len() {
            if self.chars[idx] == '\'' {
                if self.chars.get(idx + 1) == Some(&'\'') {
                    idx += 2;
                    continue;
                }
                return idx + 1;
            }
            idx += 1;
        }
        self.chars.len()
    }

    fn double_quoted_end(&self, mark: usize) -> usize {
        let mut idx = mark + 1;
        while idx < self.chars.len() {
            match self.chars[idx] {
                '\\' => idx += 2,
                '"' => return idx + 1,
                _ => idx += 1,
            }
        }
        self.chars.len()
    }

    fn plain_end(&self, value: &str, mark: usize) -> usize {
        let len = value.chars().count();
        let single_line = !value.contains('\n')
            && self
                .chars
                .get(mark..mark + len)
                .is_some_and(|src| src.iter().copied().eq(value.chars()));
        if single_line {
            return mark + len;
        }

        // Folded multi-line plain scalar: take the text up to the next event
        // and drop trailing blanks and comments.
        let limit = self.next_mark().max(mark);
        let mut end = mark;
        let mut line_start = mark;
        while line_start < limit {
            let line_end = (line_start..limit)
                .find(|&i| self.chars[i] == '\n')
                .unwrap_or(limit);
            let content_end = self.strip_comment(line_start, line_end);
            if content_end > line_start {
                end = content_end;
            }
            line_start = line_end + 1;
        }
        end.max(mark + 1).min(self.chars.len())
    }

    /// End of the content on `[start, end)`, excluding a trailing comment
    /// and whitespace.
    fn strip_comment(&self, start: usize, end: usize) -> usize {
        let mut cut = end;
        for i in start..end {
            if self.chars[i] == '#' && (i == start || self.chars[i - 1].is_whitespace()) {
                cut = i;
                break;
            }
        }
        while cut > start && self.chars[cut - 1].is_whitespace() {
            cut -= 1;
        }
        cut
    }

    /// Position of the `|` or `>` that opens a block scalar.
    ///
    /// The scanner reports a block scalar at its first content character, so
    /// the header is searched for on the lines above, skipping blank ones.
    fn block_indicator(&self, mark: usize) -> usize {
        if self.is_block_header(mark) {
            return mark;
        }

        let mut line_end = mark;
        loop {
            let line_start = self.line_start(line_end);
            if let Some(found) = (line_start..line_end).find(|&i| self.is_block_header(i)) {
                return found;
            }
            let blank = (line_start..line_end).all(|i| self.chars[i].is_whitespace());
            if line_start == 0 || !blank {
                return mark;
            }
            line_end = line_start - 1;
            if line_end > 0 && self.chars[line_end] == '\n' && self.chars[line_end - 1] == '\r' {
                line_end -= 1;
            }
        }
    }

    /// Start of the line holding `offset`.
    fn line_start(&self, offset: usize) -> usize {
        let mut idx = offset.min(self.chars.len());
        while idx > 0 && !matches!(self.chars[idx - 1], '\n' | '\r') {
            idx -= 1;
        }
        idx
    }

    /// Returns true if a block scalar header (`|`, `>-`, `|+2 # note`, ...)
    /// starts at `idx`.
    fn is_block_header(&self, idx: usize) -> bool {
        if !matches!(self.chars.get(idx), Some('|' | '>')) {
            return false;
        }
        if idx > 0 && !matches!(self.chars[idx - 1], ' ' | '\t' | '\n' | '\r') {
            return false;
        }

        let mut i = idx + 1;
        while matches!(self.chars.get(i), Some(c) if c.is_ascii_digit() || *c == '+' || *c == '-') {
            i += 1;
        }
        let mut spaced = false;
        while matches!(self.chars.get(i), Some(' ' | '\t')) {
            spaced = true;
            i += 1;
        }
        match self.chars.get(i) {
            None | Some('\n' | '\r') => true,
            Some('#') => spaced,
            Some(_) => false,
        }
    }

    /// End of a block scalar whose indicator sits at `mark`.
    ///
    /// Content lines run up to the next event. Trailing blank lines, and
    /// trailing comment lines indented less than the content, are excluded.
    fn block_end(&self, mark: usize) -> usize {
        let limit = self.next_mark().max(mark);
        let header_end = (mark..limit)
            .find(|&i| self.chars[i] == '\n')
            .unwrap_or(limit);
        if header_end >= limit {
            return limit;
        }

        let mut content_indent: Option<usize> = None;
        let mut end = header_end + 1;
        let mut line_start = header_end + 1;
        while line_start < limit {
            let line_end = (line_start..limit)
                .find(|&i| self.chars[i] == '\n')
                .unwrap_or(limit);
            let indent = (line_start..line_end)
                .take_while(|&i| self.chars[i] == ' ')
                .count();
            let body = line_start + indent;
            let blank = (body..line_end).all(|i| self.chars[i].is_whitespace());

            if !blank {
                let indent_floor = *content_indent.get_or_insert(indent);
                let is_outer_comment = self.chars[body] == '#' && indent < indent_floor;
                if !is_outer_comment {
                    end = if line_end < self.chars.len() && line_end < limit {
                        line_end + 1
                    } else {
                        line_end
                    };
                }
            }
            line_start = line_end + 1;
        }
        end
    }

    fn slice(&self, span: Span) -> String {
        let end = span.end.min(self.chars.len());
        self.chars[span.start.min(end)..end].iter().collect()
    }
}
