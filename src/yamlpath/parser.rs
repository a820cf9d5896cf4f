//! Key-path pattern parser.

use super::ast::{KeyPath, PathSegment};
use super::error::YamlPathError;

/// Parser for key-path pattern strings such as `jobs.*.steps.run`.
///
/// Segments are separated by `.`; `*` is the wildcard. Keys that contain
/// separators can be written in brackets: `jobs['my.job'].steps`. A leading
/// `$` root marker is accepted and ignored.
pub struct Parser {
    input: Vec<char>,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given pattern string.
    pub fn new(query: &str) -> Self {
        Self {
            input: query.chars().collect(),
            position: 0,
        }
    }

    /// Parses the pattern string into a KeyPath.
    pub fn parse(query: &str) -> Result<KeyPath, YamlPathError> {
        let mut parser = Parser::new(query);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<KeyPath, YamlPathError> {
        let mut segments = Vec::new();

        self.skip_whitespace();
        if self.is_eof() {
            return Err(YamlPathError::Empty);
        }

        if self.peek() == Some('$') {
            self.next();
            self.skip_whitespace();
            match self.peek() {
                Some('.') => {
                    self.next();
                }
                Some('[') | None => {}
                Some(ch) => {
                    return Err(YamlPathError::UnexpectedChar {
                        position: self.position,
                        found: ch,
                        expected: "'.' or '[' after '$'",
                    })
                }
            }
        }

        if self.peek() == Some('[') {
            segments.push(self.parse_bracket_expression()?);
        } else {
            segments.push(self.parse_dotted_segment()?);
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('.') => {
                    self.next();
                    segments.push(self.parse_dotted_segment()?);
                }
                Some('[') => {
                    segments.push(self.parse_bracket_expression()?);
                }
                Some(ch) => {
                    return Err(YamlPathError::UnexpectedChar {
                        position: self.position,
                        found: ch,
                        expected: "'.' or '['",
                    })
                }
                None => break,
            }
        }

        Ok(KeyPath::new(segments))
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Checks if we've reached the end of input.
    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char, describe: &'static str) -> Result<(), YamlPathError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(YamlPathError::UnexpectedChar {
                position: pos,
                found: ch,
                expected: describe,
            }),
            None => Err(YamlPathError::UnexpectedEnd { expected: describe }),
        }
    }

    /// Parses a segment written after a dot (or at the start): `*` or a key.
    fn parse_dotted_segment(&mut self) -> Result<PathSegment, YamlPathError> {
        self.skip_whitespace();
        if self.peek() == Some('*') {
            self.next();
            return Ok(PathSegment::Wildcard);
        }
        Ok(PathSegment::Key(self.parse_identifier()?))
    }

    /// Parses an unquoted key name.
    fn parse_identifier(&mut self) -> Result<String, YamlPathError> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, '.' | '[' | ']' | '*' | '\'' | '"') {
                break;
            }
            name.push(ch);
            self.next();
        }
        if name.is_empty() {
            match self.peek() {
                Some(ch) => Err(YamlPathError::UnexpectedChar {
                    position: self.position,
                    found: ch,
                    expected: "key name",
                }),
                None => Err(YamlPathError::UnexpectedEnd {
                    expected: "key name",
                }),
            }
        } else {
            Ok(name)
        }
    }

    /// Parses bracket expression: ['key'], ["key"] or [*]
    fn parse_bracket_expression(&mut self) -> Result<PathSegment, YamlPathError> {
        self.expect('[', "'['")?;
        self.skip_whitespace();

        let segment = match self.peek() {
            Some('*') => {
                self.next();
                PathSegment::Wildcard
            }
            Some('\'') | Some('"') => PathSegment::Key(self.parse_quoted()?),
            Some(_) => {
                return Err(YamlPathError::UnsupportedBracket {
                    position: self.position,
                })
            }
            None => {
                return Err(YamlPathError::UnexpectedEnd {
                    expected: "quoted key or '*'",
                })
            }
        };

        self.expect(']', "']'")?;
        Ok(segment)
    }

    /// Parses a single- or double-quoted key with backslash escapes.
    fn parse_quoted(&mut self) -> Result<String, YamlPathError> {
        let Some(quote) = self.next() else {
            return Err(YamlPathError::UnexpectedEnd {
                expected: "opening quote",
            });
        };

        let mut value = String::new();
        loop {
            match self.next() {
                Some(ch) if ch == quote => break,
                Some('\\') => match self.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('\\') => value.push('\\'),
                    Some('\'') => value.push('\''),
                    Some('"') => value.push('"'),
                    Some(_) | None => {
                        return Err(YamlPathError::InvalidEscape {
                            position: self.position - 1,
                        })
                    }
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(YamlPathError::UnexpectedEnd {
                        expected: "closing quote",
                    })
                }
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> PathSegment {
        PathSegment::Key(name.to_string())
    }

    #[test]
    fn test_parse_single_key() {
        let path = Parser::parse("jobs").unwrap();
        assert_eq!(path.segments, vec![key("jobs")]);
    }

    #[test]
    fn test_parse_dotted_path_with_wildcard() {
        let path = Parser::parse("jobs.*.steps.run").unwrap();
        assert_eq!(
            path.segments,
            vec![key("jobs"), PathSegment::Wildcard, key("steps"), key("run")]
        );
    }

    #[test]
    fn test_parse_keys_with_dashes() {
        let path = Parser::parse("jobs.build.runs-on").unwrap();
        assert_eq!(path.segments[2], key("runs-on"));
    }

    #[test]
    fn test_parse_bracket_notation() {
        let path = Parser::parse("jobs['my.job'][\"steps\"][*]").unwrap();
        assert_eq!(
            path.segments,
            vec![key("jobs"), key("my.job"), key("steps"), PathSegment::Wildcard]
        );
    }

    #[test]
    fn test_parse_root_marker_is_optional() {
        assert_eq!(
            Parser::parse("$.jobs.*").unwrap(),
            Parser::parse("jobs.*").unwrap()
        );
        assert_eq!(
            Parser::parse("$['jobs']").unwrap().segments,
            vec![key("jobs")]
        );
    }

    #[test]
    fn test_parse_whitespace_handling() {
        let path = Parser::parse(" jobs . * . steps ").unwrap();
        assert_eq!(path.segments, vec![key("jobs"), PathSegment::Wildcard, key("steps")]);
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["jobs.*.steps.run", "jobs['my.job'].steps", "on.push.branches"] {
            let path = Parser::parse(text).unwrap();
            assert_eq!(Parser::parse(&path.to_string()).unwrap(), path);
        }
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(matches!(
            Parser::parse(""),
            Err(YamlPathError::Empty)
        ));
        assert_eq!(Parser::parse("   "), Err(YamlPathError::Empty));
    }

    #[test]
    fn test_parse_trailing_dot_fails() {
        assert!(matches!(
            Parser::parse("jobs."),
            Err(YamlPathError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_parse_double_dot_fails() {
        assert!(matches!(
            Parser::parse("jobs..run"),
            Err(YamlPathError::UnexpectedChar {
                position: 5,
                found: '.',
                ..
            })
        ));
    }

    #[test]
    fn test_parse_unclosed_bracket_fails() {
        assert!(Parser::parse("jobs['build'").is_err());
        assert!(Parser::parse("jobs['build").is_err());
    }

    #[test]
    fn test_parse_bracket_index_is_rejected() {
        assert!(matches!(
            Parser::parse("steps[0]"),
            Err(YamlPathError::UnsupportedBracket { position: 6 })
        ));
    }

    #[test]
    fn test_parse_bad_escape_fails() {
        let err = Parser::parse(r"jobs['a\qb']").unwrap_err();
        assert_eq!(err, YamlPathError::InvalidEscape { position: 8 });
        assert_eq!(
            err.to_string(),
            "invalid escape in quoted key at position 8"
        );
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        assert_eq!(
            Parser::parse("jobs..run").unwrap_err().to_string(),
            "unexpected '.' at position 5, expected key name"
        );
        assert_eq!(
            Parser::parse("jobs['build'").unwrap_err().to_string(),
            "key-path ends early, expected ']'"
        );
    }
}
