//! Lightweight tokenizer for the code spans of a line.
//!
//! Token kinds are resolved with a small lookahead window instead of a
//! grammar: `template` is only a keyword when a `<` follows, numerals absorb
//! their `.` and exponent signs, and `<`/`>` pairs that enclose type-like
//! tokens are turned into angle brackets.

use crate::scanner::{Span, SpanKind};

/// Kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier.
    Identifier,
    /// Reserved word.
    Keyword,
    /// Numeric literal, including suffixes and exponents.
    Number,
    /// String or char literal (one token per literal span).
    Literal,
    /// Operator such as `+`, `->` or `<<=`.
    Operator,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `<` opening a template argument list.
    OpenAngle,
    /// `>` (or `>>`) closing a template argument list.
    CloseAngle,
    /// `;`, `,`, `[`, `]` and any character the tokenizer does not know.
    Punctuation,
}

/// A lexical unit within a code span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token kind.
    pub kind: TokenKind,
    /// Source text.
    pub text: &'a str,
    /// Start byte column within the line.
    pub column: usize,
}

impl Token<'_> {
    /// End byte column (exclusive).
    #[must_use]
    pub fn end(&self) -> usize {
        self.column + self.text.len()
    }

    /// Returns true if this token's text is `text`.
    #[must_use]
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

/// Reserved words of C and C++.
pub const KEYWORDS: &[&str] = &[
    "alignas", "alignof", "auto", "bool", "break", "case", "catch", "char", "class", "const",
    "constexpr", "continue", "default", "delete", "do", "double", "else", "enum", "explicit",
    "extern", "float", "for", "friend", "goto", "if", "inline", "int", "long", "mutable",
    "namespace", "new", "noexcept", "operator", "private", "protected", "public", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "this",
    "throw", "try", "typedef", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "while",
];

/// Operators, longest first within each length class.
const OPERATORS_3: &[&str] = &["<<=", ">>=", "...", "->*"];
const OPERATORS_2: &[&str] = &[
    "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "::", ".*",
];
const OPERATORS_1: &[u8] = b"+-*/%<>=!&|^~?:.";

/// Tokenizes the code and literal spans of `line`.
///
/// Comment and preprocessor spans produce no tokens.
#[must_use]
pub fn tokenize<'a>(line: &'a str, spans: &[Span]) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    for span in spans {
        match span.kind {
            SpanKind::Code => lex_code(line, span.start, span.end, &mut tokens),
            SpanKind::StringLiteral | SpanKind::CharLiteral => tokens.push(Token {
                kind: TokenKind::Literal,
                text: span.text(line),
                column: span.start,
            }),
            SpanKind::LineComment | SpanKind::BlockComment | SpanKind::Preprocessor => {}
        }
    }
    resolve_template_keyword(line, &mut tokens);
    mark_angle_brackets(&mut tokens);
    tokens
}

fn lex_code<'a>(line: &'a str, start: usize, end: usize, tokens: &mut Vec<Token<'a>>) {
    let bytes = line.as_bytes();
    let mut i = start;

    while i < end {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let (kind, len) = if b.is_ascii_alphabetic() || b == b'_' {
            let len = scan_while(bytes, i, end, |c| c.is_ascii_alphanumeric() || c == b'_');
            let word = &line[i..i + len];
            let kind = if KEYWORDS.contains(&word) || word == "template" {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            (kind, len)
        } else if b.is_ascii_digit()
            || (b == b'.' && i + 1 < end && bytes[i + 1].is_ascii_digit())
        {
            (TokenKind::Number, scan_number(bytes, i, end))
        } else if let Some(op) = match_operator(&line[i..end]) {
            (TokenKind::Operator, op.len())
        } else {
            let kind = match b {
                b'(' => TokenKind::OpenParen,
                b')' => TokenKind::CloseParen,
                b'{' => TokenKind::OpenBrace,
                b'}' => TokenKind::CloseBrace,
                _ => TokenKind::Punctuation,
            };
            let len = line[i..].chars().next().map_or(1, char::len_utf8);
            (kind, len)
        };

        tokens.push(Token {
            kind,
            text: &line[i..i + len],
            column: i,
        });
        i += len;
    }
}

fn scan_while(bytes: &[u8], start: usize, end: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes[start..end].iter().take_while(|&&c| pred(c)).count()
}

fn scan_number(bytes: &[u8], start: usize, end: usize) -> usize {
    let is_hex = bytes[start] == b'0' && matches!(bytes.get(start + 1), Some(b'x' | b'X'));
    let mut i = start;
    while i < end {
        let c = bytes[i];
        let exponent_sign = (c == b'+' || c == b'-')
            && i > start
            && match bytes[i - 1] {
                b'e' | b'E' => !is_hex,
                b'p' | b'P' => true,
                _ => false,
            };
        if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' || exponent_sign {
            i += 1;
        } else {
            break;
        }
    }
    i - start
}

fn match_operator(rest: &str) -> Option<&'static str> {
    OPERATORS_3
        .iter()
        .chain(OPERATORS_2)
        .find(|op| rest.starts_with(**op))
        .copied()
        .or_else(|| {
            let first = *rest.as_bytes().first()?;
            OPERATORS_1.contains(&first).then(|| single_operator(first))
        })
}

fn single_operator(b: u8) -> &'static str {
    match b {
        b'+' => "+",
        b'-' => "-",
        b'*' => "*",
        b'/' => "/",
        b'%' => "%",
        b'<' => "<",
        b'>' => ">",
        b'=' => "=",
        b'!' => "!",
        b'&' => "&",
        b'|' => "|",
        b'^' => "^",
        b'~' => "~",
        b'?' => "?",
        b':' => ":",
        _ => ".",
    }
}

/// Demotes `template` to an identifier unless the next significant
/// character on the line is `<`.
fn resolve_template_keyword(line: &str, tokens: &mut [Token<'_>]) {
    for token in tokens.iter_mut() {
        if token.kind == TokenKind::Keyword && token.is("template") {
            let followed_by_angle = line[token.end()..].trim_start().starts_with('<');
            if !followed_by_angle {
                token.kind = TokenKind::Identifier;
            }
        }
    }
}

/// Turns `<`...`>` pairs that delimit template arguments into angle tokens.
fn mark_angle_brackets(tokens: &mut [Token<'_>]) {
    let mut k = 0;
    while k < tokens.len() {
        if tokens[k].is("<") && opens_argument_list(tokens, k) {
            if let Some(marks) = match_angles(tokens, k) {
                let last = marks.last().copied().unwrap_or(k);
                for idx in marks {
                    tokens[idx].kind = if tokens[idx].text.starts_with('<') {
                        TokenKind::OpenAngle
                    } else {
                        TokenKind::CloseAngle
                    };
                }
                k = last + 1;
                continue;
            }
        }
        k += 1;
    }
}

fn opens_argument_list(tokens: &[Token<'_>], open: usize) -> bool {
    let Some(prev) = open.checked_sub(1).map(|p| tokens[p]) else {
        return false;
    };
    match prev.kind {
        TokenKind::Keyword => prev.is("template"),
        TokenKind::Identifier => prev.end() == tokens[open].column,
        _ => false,
    }
}

fn match_angles(tokens: &[Token<'_>], open: usize) -> Option<Vec<usize>> {
    let mut depth = 0usize;
    let mut marks = Vec::new();

    for (idx, token) in tokens.iter().enumerate().skip(open) {
        match token.text {
            "<" => {
                depth += 1;
                marks.push(idx);
            }
            ">" => {
                depth -= 1;
                marks.push(idx);
                if depth == 0 {
                    return Some(marks);
                }
            }
            ">>" if depth >= 2 => {
                depth -= 2;
                marks.push(idx);
                if depth == 0 {
                    return Some(marks);
                }
            }
            "::" | "," | "*" | "&" | "..." | "=" => {}
            _ if matches!(
                token.kind,
                TokenKind::Identifier | TokenKind::Keyword | TokenKind::Number
            ) => {}
            _ => return None,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    fn lex(line: &str) -> Vec<(TokenKind, String)> {
        let scanned = Scanner::new().scan_line(line);
        tokenize(line, &scanned.spans)
            .into_iter()
            .map(|t| (t.kind, t.text.to_string()))
            .collect()
    }

    fn texts(line: &str) -> Vec<String> {
        lex(line).into_iter().map(|(_, text)| text).collect()
    }

    #[test]
    fn splits_statement() {
        assert_eq!(
            texts("int x = a->b + 1;"),
            vec!["int", "x", "=", "a", "->", "b", "+", "1", ";"]
        );
    }

    #[test]
    fn columns_point_into_line() {
        let line = "  ob1->a = 10;";
        let scanned = Scanner::new().scan_line(line);
        let tokens = tokenize(line, &scanned.spans);
        assert_eq!(tokens[0].column, 2);
        assert_eq!(tokens[1].text, "->");
        assert_eq!(tokens[1].column, 5);
        assert_eq!(tokens[1].end(), 7);
    }

    #[test]
    fn numbers_keep_decimal_point_and_exponent() {
        assert_eq!(texts("x = 1.5e-3 + .5;"), vec!["x", "=", "1.5e-3", "+", ".5", ";"]);
        assert_eq!(lex("1.5")[0].0, TokenKind::Number);
    }

    #[test]
    fn hex_digit_e_is_not_an_exponent() {
        assert_eq!(texts("0x1e+5"), vec!["0x1e", "+", "5"]);
        assert_eq!(texts("0x1p-3"), vec!["0x1p-3"]);
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(texts("a <<= b >= c"), vec!["a", "<<=", "b", ">=", "c"]);
        assert_eq!(texts("i++ && j--"), vec!["i", "++", "&&", "j", "--"]);
    }

    #[test]
    fn comments_produce_no_tokens() {
        assert_eq!(texts("a = 1; // b + c"), vec!["a", "=", "1", ";"]);
        assert_eq!(texts("a /* + */ = 1;"), vec!["a", "=", "1", ";"]);
    }

    #[test]
    fn literals_are_single_tokens() {
        let tokens = lex(r#"puts( "a + b" );"#);
        assert_eq!(tokens[2], (TokenKind::Literal, "\"a + b\"".to_string()));
    }

    #[test]
    fn template_keyword_needs_angle() {
        assert_eq!(lex("template <class P>")[0].0, TokenKind::Keyword);
        assert_eq!(lex("template = 3;")[0].0, TokenKind::Identifier);
        assert_eq!(lex("obj.template;")[2].0, TokenKind::Identifier);
    }

    #[test]
    fn template_parameters_become_angles() {
        let tokens = lex("template <class P>");
        assert_eq!(tokens[1].0, TokenKind::OpenAngle);
        assert_eq!(tokens[2].0, TokenKind::Keyword);
        assert_eq!(tokens[4].0, TokenKind::CloseAngle);
    }

    #[test]
    fn glued_type_arguments_become_angles() {
        let tokens = lex("std::vector<std::vector<int>> v;");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.0).collect();
        assert!(kinds.contains(&TokenKind::OpenAngle));
        assert!(kinds.contains(&TokenKind::CloseAngle));
        assert!(!tokens.iter().any(|t| t.0 == TokenKind::Operator && t.1 == ">>"));
    }

    #[test]
    fn comparisons_stay_operators() {
        let tokens = lex("if ( a<b && c>d )");
        assert!(tokens
            .iter()
            .any(|t| t.0 == TokenKind::Operator && t.1 == "<"));
        assert!(tokens
            .iter()
            .any(|t| t.0 == TokenKind::Operator && t.1 == ">"));
        assert_eq!(lex("x = a < b;")[3].0, TokenKind::Operator);
    }

    #[test]
    fn unknown_characters_are_punctuation() {
        let tokens = lex("a @ b $");
        assert_eq!(tokens[1], (TokenKind::Punctuation, "@".to_string()));
        assert_eq!(tokens[3], (TokenKind::Punctuation, "$".to_string()));
    }

    #[test]
    fn non_ascii_is_one_token() {
        let tokens = lex("x = ü;");
        assert_eq!(tokens[2], (TokenKind::Punctuation, "ü".to_string()));
    }
}
