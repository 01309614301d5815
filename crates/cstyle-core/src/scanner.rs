//! Line-oriented lexical scanner.
//!
//! Splits each source line into classified [`Span`]s (code, comments,
//! literals, preprocessor) while carrying block-comment state across line
//! boundaries. The scanner never fails: unterminated literals are reported
//! through [`ScannedLine::unterminated`] and the rest of the line is
//! rescanned as plain code.

use serde::{Deserialize, Serialize};

/// Classification of a [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Ordinary code, tokenized for style checks.
    Code,
    /// `// ...` up to the end of the line.
    LineComment,
    /// `/* ... */`, or the part of one that lies on this line.
    BlockComment,
    /// `"..."`.
    StringLiteral,
    /// `'...'`.
    CharLiteral,
    /// A whole `#...` directive line.
    Preprocessor,
}

impl SpanKind {
    /// Returns true for both comment kinds.
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Returns true for string and char literals.
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(self, Self::StringLiteral | Self::CharLiteral)
    }
}

/// A classified byte range `[start, end)` of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// What this range contains.
    pub kind: SpanKind,
    /// Start byte offset within the line.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Returns the text this span covers in `line`.
    #[must_use]
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }

    /// Returns true if the span contains only whitespace in `line`.
    #[must_use]
    pub fn is_blank(&self, line: &str) -> bool {
        self.text(line).trim().is_empty()
    }
}

/// A string or char literal that reached the end of its line unclosed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnterminatedLiteral {
    /// Column of the opening quote.
    pub column: usize,
    /// Literal kind that was left open.
    pub kind: SpanKind,
}

/// Output of scanning one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// Spans covering the line in order, without gaps or overlaps.
    pub spans: Vec<Span>,
    /// First unterminated literal on the line, if any.
    pub unterminated: Option<UnterminatedLiteral>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    BlockComment,
    Literal {
        kind: SpanKind,
        quote: u8,
        escaped: bool,
    },
}

/// Stateful scanner, fed the lines of a single file in order.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    in_block_comment: bool,
    in_directive: bool,
}

impl Scanner {
    /// Creates a scanner positioned at the start of a file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the previous line left a block comment open.
    #[must_use]
    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// Returns true if the previous line was a directive ending in `\`.
    #[must_use]
    pub fn in_directive(&self) -> bool {
        self.in_directive
    }

    /// Scans the next line of the file.
    ///
    /// A directive continued with a trailing backslash keeps its following
    /// lines opaque as well, so macro bodies never reach the rules.
    pub fn scan_line(&mut self, line: &str) -> ScannedLine {
        let is_directive = self.in_directive
            || (!self.in_block_comment && line.trim_start().starts_with('#'));
        let scanned = self.scan_spans(line);
        self.in_directive = is_directive && line.trim_end().ends_with('\\');

        if is_directive {
            // Directives are opaque; only the comment carry-over survives.
            return ScannedLine {
                spans: vec![Span::new(SpanKind::Preprocessor, 0, line.len())],
                unterminated: None,
            };
        }

        scanned
    }

    fn scan_spans(&mut self, line: &str) -> ScannedLine {
        let bytes = line.as_bytes();
        let len = bytes.len();
        let mut spans = Vec::new();
        let mut unterminated = None;
        let mut mode = if self.in_block_comment {
            Mode::BlockComment
        } else {
            Mode::Code
        };
        let mut start = 0;
        let mut i = 0;

        loop {
            while i < len {
                let next = bytes.get(i + 1).copied();
                match mode {
                    Mode::Code => match (bytes[i], next) {
                        (b'/', Some(b'/')) => {
                            push_span(&mut spans, SpanKind::Code, start, i);
                            push_span(&mut spans, SpanKind::LineComment, i, len);
                            start = len;
                            i = len;
                        }
                        (b'/', Some(b'*')) => {
                            push_span(&mut spans, SpanKind::Code, start, i);
                            start = i;
                            mode = Mode::BlockComment;
                            i += 2;
                        }
                        (quote @ (b'"' | b'\''), _) => {
                            push_span(&mut spans, SpanKind::Code, start, i);
                            start = i;
                            let kind = if quote == b'"' {
                                SpanKind::StringLiteral
                            } else {
                                SpanKind::CharLiteral
                            };
                            mode = Mode::Literal {
                                kind,
                                quote,
                                escaped: false,
                            };
                            i += 1;
                        }
                        _ => i += 1,
                    },
                    Mode::BlockComment => {
                        if bytes[i] == b'*' && next == Some(b'/') {
                            i += 2;
                            push_span(&mut spans, SpanKind::BlockComment, start, i);
                            start = i;
                            mode = Mode::Code;
                        } else {
                            i += 1;
                        }
                    }
                    Mode::Literal {
                        kind,
                        quote,
                        escaped,
                    } => {
                        let b = bytes[i];
                        i += 1;
                        if escaped {
                            mode = Mode::Literal {
                                kind,
                                quote,
                                escaped: false,
                            };
                        } else if b == b'\\' {
                            mode = Mode::Literal {
                                kind,
                                quote,
                                escaped: true,
                            };
                        } else if b == quote {
                            push_span(&mut spans, kind, start, i);
                            start = i;
                            mode = Mode::Code;
                        }
                    }
                }
            }

            // An open literal never spans lines: report it and rescan what
            // follows the quote as plain code.
            if let Mode::Literal { kind, .. } = mode {
                unterminated.get_or_insert(UnterminatedLiteral {
                    column: start,
                    kind,
                });
                mode = Mode::Code;
                i = start + 1;
                continue;
            }
            break;
        }

        match mode {
            Mode::BlockComment => push_span(&mut spans, SpanKind::BlockComment, start, len),
            _ => push_span(&mut spans, SpanKind::Code, start, len),
        }
        self.in_block_comment = mode == Mode::BlockComment;

        ScannedLine {
            spans,
            unterminated,
        }
    }
}

fn push_span(spans: &mut Vec<Span>, kind: SpanKind, start: usize, end: usize) {
    if start >= end {
        return;
    }
    // Adjacent code runs (after literal recovery) are merged.
    if let Some(last) = spans.last_mut() {
        if last.kind == kind && kind == SpanKind::Code && last.end == start {
            last.end = end;
            return;
        }
    }
    spans.push(Span::new(kind, start, end));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(scanned: &ScannedLine) -> Vec<SpanKind> {
        scanned.spans.iter().map(|s| s.kind).collect()
    }

    fn assert_covers(line: &str, scanned: &ScannedLine) {
        let mut pos = 0;
        for span in &scanned.spans {
            assert_eq!(span.start, pos, "gap or overlap in {:?}", scanned.spans);
            pos = span.end;
        }
        assert_eq!(pos, line.len());
    }

    #[test]
    fn plain_code_is_one_span() {
        let mut scanner = Scanner::new();
        let line = "int x = 1;";
        let scanned = scanner.scan_line(line);
        assert_eq!(scanned.spans, vec![Span::new(SpanKind::Code, 0, line.len())]);
        assert!(scanned.unterminated.is_none());
    }

    #[test]
    fn line_comment_runs_to_end() {
        let mut scanner = Scanner::new();
        let line = "x = 1; // note /* not a block";
        let scanned = scanner.scan_line(line);
        assert_eq!(kinds(&scanned), vec![SpanKind::Code, SpanKind::LineComment]);
        assert_covers(line, &scanned);
        assert!(!scanner.in_block_comment());
    }

    #[test]
    fn comment_markers_inside_strings_are_ignored() {
        let mut scanner = Scanner::new();
        let line = r#"puts( "a // b /* c" );"#;
        let scanned = scanner.scan_line(line);
        assert_eq!(
            kinds(&scanned),
            vec![SpanKind::Code, SpanKind::StringLiteral, SpanKind::Code]
        );
        assert_covers(line, &scanned);
        assert!(!scanner.in_block_comment());
    }

    #[test]
    fn escaped_quote_does_not_close_literal() {
        let mut scanner = Scanner::new();
        let line = r#"s = "say \"hi\""; c = '\'';"#;
        let scanned = scanner.scan_line(line);
        assert_eq!(
            kinds(&scanned),
            vec![
                SpanKind::Code,
                SpanKind::StringLiteral,
                SpanKind::Code,
                SpanKind::CharLiteral,
                SpanKind::Code
            ]
        );
        assert_eq!(scanned.spans[1].text(line), r#""say \"hi\"""#);
        assert!(scanned.unterminated.is_none());
    }

    #[test]
    fn block_comment_carries_across_lines() {
        let mut scanner = Scanner::new();
        let first = scanner.scan_line("int a; /* start");
        assert_eq!(kinds(&first), vec![SpanKind::Code, SpanKind::BlockComment]);
        assert!(scanner.in_block_comment());

        let middle = scanner.scan_line("   still comment // here");
        assert_eq!(kinds(&middle), vec![SpanKind::BlockComment]);
        assert!(scanner.in_block_comment());

        let line = "end */ int b;";
        let last = scanner.scan_line(line);
        assert_eq!(kinds(&last), vec![SpanKind::BlockComment, SpanKind::Code]);
        assert_eq!(last.spans[0].text(line), "end */");
        assert!(!scanner.in_block_comment());
    }

    #[test]
    fn hash_inside_block_comment_is_not_a_directive() {
        let mut scanner = Scanner::new();
        scanner.scan_line("/*");
        let scanned = scanner.scan_line("#include <nope.h>");
        assert_eq!(kinds(&scanned), vec![SpanKind::BlockComment]);
    }

    #[test]
    fn directive_is_one_span() {
        let mut scanner = Scanner::new();
        let line = "  #define QUOTE '\"' /* open";
        let scanned = scanner.scan_line(line);
        assert_eq!(
            scanned.spans,
            vec![Span::new(SpanKind::Preprocessor, 0, line.len())]
        );
        assert!(scanned.unterminated.is_none());
    }

    #[test]
    fn directive_can_open_block_comment() {
        let mut scanner = Scanner::new();
        scanner.scan_line("#endif /* CONFIG_X");
        assert!(scanner.in_block_comment());
    }

    #[test]
    fn backslash_continues_a_directive() {
        let mut scanner = Scanner::new();
        let lines = [
            "#define SWAP( a, b ) \\",
            "    do { \\",
            "        int t = a; a = b; b = t; \\",
            "    } while ( 0 )",
            "int x;",
        ];
        let kinds: Vec<SpanKind> = lines
            .iter()
            .map(|line| scanner.scan_line(line).spans[0].kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SpanKind::Preprocessor,
                SpanKind::Preprocessor,
                SpanKind::Preprocessor,
                SpanKind::Preprocessor,
                SpanKind::Code
            ]
        );
        assert!(!scanner.in_directive());
    }

    #[test]
    fn backslash_outside_a_directive_is_code() {
        let mut scanner = Scanner::new();
        scanner.scan_line("x = \\");
        assert!(!scanner.in_directive());
        assert_eq!(kinds(&scanner.scan_line("{")), vec![SpanKind::Code]);
    }

    #[test]
    fn unterminated_string_is_reported_and_rescanned() {
        let mut scanner = Scanner::new();
        let line = r#"printf( "oops ); // tail"#;
        let scanned = scanner.scan_line(line);
        assert_eq!(
            scanned.unterminated,
            Some(UnterminatedLiteral {
                column: 8,
                kind: SpanKind::StringLiteral
            })
        );
        assert_eq!(kinds(&scanned), vec![SpanKind::Code, SpanKind::LineComment]);
        assert_covers(line, &scanned);
    }

    #[test]
    fn only_first_unterminated_literal_is_reported() {
        let mut scanner = Scanner::new();
        let scanned = scanner.scan_line("a = 'x; b = \"y;");
        let lit = scanned.unterminated.expect("literal should be reported");
        assert_eq!(lit.column, 4);
        assert_eq!(lit.kind, SpanKind::CharLiteral);
    }

    #[test]
    fn empty_line_has_no_spans() {
        let mut scanner = Scanner::new();
        assert!(scanner.scan_line("").spans.is_empty());
    }

    #[test]
    fn multibyte_text_keeps_char_boundaries() {
        let mut scanner = Scanner::new();
        let line = "s = \"héllo\"; /* ü */";
        let scanned = scanner.scan_line(line);
        assert_covers(line, &scanned);
        for span in &scanned.spans {
            let _ = span.text(line);
        }
    }
}
