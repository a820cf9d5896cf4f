//! Translation between character offsets and editor positions.
//!
//! The syntax tree speaks in character offsets while editors speak in
//! (line, character) positions. Characters in a position are counted in UTF-16
//! code units, the default encoding of the language server protocol.

use lsp_types::{Position, Range};

use super::node::Span;

/// Line table for one version of a document's text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineIndex {
    chars: Vec<char>,
    /// Character offset at which each line starts. Always non-empty.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut line_starts = vec![0];
        for (idx, ch) in chars.iter().enumerate() {
            if *ch == '\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { chars, line_starts }
    }

    /// Number of characters in the text.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a character offset to a position. Offsets past the end clamp
    /// to the end of the text.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.chars.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character: usize = self.chars[line_start..offset]
            .iter()
            .map(|c| c.len_utf16())
            .sum();
        Position::new(line as u32, character as u32)
    }

    /// Converts a position to a character offset.
    ///
    /// Lines past the end clamp to the end of the text; characters past the
    /// end of a line clamp to the end of that line (before its line break).
    pub fn position_to_offset(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return self.chars.len();
        }
        let start = self.line_starts[line];
        let end = self.line_content_end(line);

        let mut units = 0usize;
        let mut offset = start;
        while offset < end {
            let width = self.chars[offset].len_utf16();
            if units + width > position.character as usize {
                break;
            }
            units += width;
            offset += 1;
        }
        offset
    }

    /// Converts a character span to an editor range.
    pub fn range(&self, span: Span) -> Range {
        Range::new(
            self.offset_to_position(span.start),
            self.offset_to_position(span.end),
        )
    }

    /// Returns the text covered by a span.
    pub fn slice(&self, span: Span) -> String {
        let end = span.end.min(self.chars.len());
        let start = span.start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Character offset just past the last character of `line`, excluding
    /// its `\n` or `\r\n` terminator.
    fn line_content_end(&self, line: usize) -> usize {
        let mut end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.chars.len(),
        };
        if end > self.line_starts[line] && self.chars.get(end - 1) == Some(&'\r') {
            end -= 1;
        }
        end
    }
}
