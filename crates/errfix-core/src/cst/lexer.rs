//! Trivia-preserving Python lexer
//!
//! Produces every byte of the input as some token so the parser can build a
//! lossless tree. Besides ordinary tokens it tracks the layout rules of the
//! language:
//!
//! - a line break ends a logical line ([`PySyntaxKind::Newline`]) only outside
//!   brackets and only when the line carried a significant token; every other
//!   line break is [`PySyntaxKind::Nl`] trivia
//! - indentation changes at the start of a logical line emit zero-width
//!   [`PySyntaxKind::Indent`] / [`PySyntaxKind::Dedent`] markers; a tab moves the
//!   column to the next multiple of eight
//! - end of input closes the last logical line and every open block

use super::PySyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: PySyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: PySyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Operators and punctuation, longest first
const OPERATORS: &[(&str, PySyntaxKind)] = &[
    ("**=", PySyntaxKind::DoubleStarEq),
    ("//=", PySyntaxKind::DoubleSlashEq),
    (">>=", PySyntaxKind::ShrEq),
    ("<<=", PySyntaxKind::ShlEq),
    ("...", PySyntaxKind::Ellipsis),
    ("->", PySyntaxKind::Arrow),
    (":=", PySyntaxKind::ColonEq),
    ("**", PySyntaxKind::DoubleStar),
    ("//", PySyntaxKind::DoubleSlash),
    ("<<", PySyntaxKind::Shl),
    (">>", PySyntaxKind::Shr),
    ("<=", PySyntaxKind::LtEq),
    (">=", PySyntaxKind::GtEq),
    ("==", PySyntaxKind::EqEq),
    ("!=", PySyntaxKind::NotEq),
    ("<>", PySyntaxKind::LtGt),
    ("+=", PySyntaxKind::PlusEq),
    ("-=", PySyntaxKind::MinusEq),
    ("*=", PySyntaxKind::StarEq),
    ("/=", PySyntaxKind::SlashEq),
    ("%=", PySyntaxKind::PercentEq),
    ("&=", PySyntaxKind::AmpEq),
    ("|=", PySyntaxKind::PipeEq),
    ("^=", PySyntaxKind::CaretEq),
    ("@=", PySyntaxKind::AtEq),
    ("(", PySyntaxKind::LParen),
    (")", PySyntaxKind::RParen),
    ("[", PySyntaxKind::LBracket),
    ("]", PySyntaxKind::RBracket),
    ("{", PySyntaxKind::LBrace),
    ("}", PySyntaxKind::RBrace),
    (",", PySyntaxKind::Comma),
    (":", PySyntaxKind::Colon),
    (";", PySyntaxKind::Semicolon),
    (".", PySyntaxKind::Dot),
    ("@", PySyntaxKind::At),
    ("`", PySyntaxKind::Backquote),
    ("=", PySyntaxKind::Eq),
    ("+", PySyntaxKind::Plus),
    ("-", PySyntaxKind::Minus),
    ("*", PySyntaxKind::Star),
    ("/", PySyntaxKind::Slash),
    ("%", PySyntaxKind::Percent),
    ("&", PySyntaxKind::Amp),
    ("|", PySyntaxKind::Pipe),
    ("^", PySyntaxKind::Caret),
    ("~", PySyntaxKind::Tilde),
    ("<", PySyntaxKind::Lt),
    (">", PySyntaxKind::Gt),
];

/// Lex input preserving all trivia for CST construction
///
/// Concatenating the text of the returned tokens reproduces `input` exactly.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut lexer = Lexer::new(input);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<CstToken>,
    errors: Vec<LexerError>,
    indents: Vec<usize>,
    depth: usize,
    at_line_start: bool,
    line_has_content: bool,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
            indents: vec![0],
            depth: 0,
            at_line_start: true,
            line_has_content: false,
        }
    }

    fn run(&mut self) {
        while self.pos < self.input.len() {
            if self.at_line_start && self.depth == 0 && !self.lex_indentation() {
                continue;
            }
            self.lex_token();
        }
        self.finish();
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn push(&mut self, kind: PySyntaxKind, start: usize) {
        let text = &self.input[start..self.pos];
        self.tokens.push(CstToken::new(kind, text, start..self.pos));
        if !kind.is_trivia()
            && !matches!(
                kind,
                PySyntaxKind::Newline | PySyntaxKind::Indent | PySyntaxKind::Dedent
            )
        {
            self.line_has_content = true;
        }
    }

    fn push_marker(&mut self, kind: PySyntaxKind) {
        self.tokens
            .push(CstToken::new(kind, "", self.pos..self.pos));
    }

    fn error(&mut self, message: impl Into<String>, span: CstSpan) {
        self.errors.push(LexerError::new(message, span));
    }

    /// Measure the indentation of a fresh line. Returns `true` when the line
    /// holds code, after emitting any indent or dedent markers.
    fn lex_indentation(&mut self) -> bool {
        let start = self.pos;
        let mut column = 0;
        while let Some(c) = self.peek() {
            match c {
                ' ' => column += 1,
                '\t' => column = (column / 8 + 1) * 8,
                '\x0c' => column = 0,
                _ => break,
            }
            self.pos += 1;
        }
        if self.pos > start {
            self.push(PySyntaxKind::Whitespace, start);
        }

        match self.peek() {
            None => false,
            Some('\n' | '\r') => {
                self.lex_line_break();
                false
            }
            Some('#') => {
                self.lex_comment();
                false
            }
            Some(_) => {
                self.apply_indentation(column);
                self.at_line_start = false;
                true
            }
        }
    }

    fn apply_indentation(&mut self, column: usize) {
        let current = self.indents.last().copied().unwrap_or(0);
        if column > current {
            self.indents.push(column);
            self.push_marker(PySyntaxKind::Indent);
            return;
        }

        while column < self.indents.last().copied().unwrap_or(0) {
            self.indents.pop();
            self.push_marker(PySyntaxKind::Dedent);
        }
        if column != self.indents.last().copied().unwrap_or(0) {
            self.error(
                "unindent does not match any outer indentation level",
                self.pos..self.pos,
            );
        }
    }

    fn lex_token(&mut self) {
        let start = self.pos;
        let Some(current) = self.peek() else {
            return;
        };

        match current {
            ' ' | '\t' | '\x0c' => {
                while matches!(self.peek(), Some(' ' | '\t' | '\x0c')) {
                    self.pos += 1;
                }
                self.push(PySyntaxKind::Whitespace, start);
            }
            '\n' | '\r' => self.lex_line_break(),
            '#' => self.lex_comment(),
            '\\' => self.lex_continuation(),
            '0'..='9' => self.lex_number(),
            '.' if matches!(self.peek_nth(1), Some('0'..='9')) => self.lex_number(),
            '"' | '\'' => self.lex_string(start),
            c if is_ident_start(c) => self.lex_name(),
            _ => self.lex_operator(),
        }
    }

    fn lex_line_break(&mut self) {
        let start = self.pos;
        self.pos += if self.rest().starts_with("\r\n") { 2 } else { 1 };

        if self.depth == 0 && self.line_has_content {
            self.push(PySyntaxKind::Newline, start);
            self.line_has_content = false;
            self.at_line_start = true;
        } else {
            self.push(PySyntaxKind::Nl, start);
        }
    }

    fn lex_comment(&mut self) {
        let start = self.pos;
        let len = self
            .rest()
            .find(['\n', '\r'])
            .unwrap_or(self.rest().len());
        self.pos += len;
        self.push(PySyntaxKind::Comment, start);
    }

    fn lex_continuation(&mut self) {
        let start = self.pos;
        self.pos += 1;
        if self.rest().starts_with("\r\n") {
            self.pos += 2;
        } else if matches!(self.peek(), Some('\n' | '\r')) {
            self.pos += 1;
        } else {
            self.error(
                "unexpected character after line continuation character",
                start..self.pos,
            );
            self.push(PySyntaxKind::ErrorToken, start);
            return;
        }
        self.push(PySyntaxKind::LineContinuation, start);
    }

    fn lex_name(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_continue(c) {
                break;
            }
            self.pos += c.len_utf8();
        }

        let word = &self.input[start..self.pos];
        if matches!(self.peek(), Some('"' | '\'')) && is_string_prefix(word) {
            self.lex_string(start);
            return;
        }

        let kind = PySyntaxKind::from_keyword(word).unwrap_or(PySyntaxKind::Ident);
        self.push(kind, start);
    }

    /// Lex a string literal whose prefix (if any) began at `start`; the
    /// cursor sits on the opening quote.
    fn lex_string(&mut self, start: usize) {
        let Some(quote) = self.peek() else {
            return;
        };
        let delimiter = if quote == '"' { "\"\"\"" } else { "'''" };
        let triple = self.rest().starts_with(delimiter);
        self.pos += if triple { 3 } else { 1 };

        let closed = loop {
            let Some(c) = self.peek() else {
                break false;
            };
            match c {
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek() {
                        self.pos += escaped.len_utf8();
                    }
                }
                '\n' | '\r' if !triple => break false,
                c if c == quote => {
                    if !triple {
                        self.pos += 1;
                        break true;
                    }
                    if self.rest().starts_with(delimiter) {
                        self.pos += 3;
                        break true;
                    }
                    self.pos += 1;
                }
                c => self.pos += c.len_utf8(),
            }
        };

        if !closed {
            self.error("unterminated string literal", start..self.pos);
        }
        self.push(PySyntaxKind::Str, start);
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        let radix_prefix = ["0x", "0X", "0o", "0O", "0b", "0B"];

        if radix_prefix.iter().any(|p| self.rest().starts_with(p)) {
            self.pos += 2;
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                self.pos += 1;
            }
            self.push(PySyntaxKind::Number, start);
            return;
        }

        self.eat_digits();
        if self.peek() == Some('.') {
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if matches!(self.peek_nth(digit_at), Some('0'..='9')) {
                self.pos += digit_at;
                self.eat_digits();
            }
        }
        if matches!(self.peek(), Some('j' | 'J' | 'l' | 'L')) {
            self.pos += 1;
        }
        self.push(PySyntaxKind::Number, start);
    }

    fn eat_digits(&mut self) {
        while matches!(self.peek(), Some('0'..='9' | '_')) {
            self.pos += 1;
        }
    }

    fn lex_operator(&mut self) {
        let start = self.pos;
        let rest = self.rest();
        let Some((text, kind)) = OPERATORS
            .iter()
            .find(|(text, _)| rest.starts_with(text))
            .copied()
        else {
            let c = rest.chars().next().unwrap_or('\0');
            self.pos += c.len_utf8().max(1);
            self.error(format!("unexpected character '{c}'"), start..self.pos);
            self.push(PySyntaxKind::ErrorToken, start);
            return;
        };

        self.pos += text.len();
        match kind {
            PySyntaxKind::LParen | PySyntaxKind::LBracket | PySyntaxKind::LBrace => {
                self.depth += 1
            }
            PySyntaxKind::RParen | PySyntaxKind::RBracket | PySyntaxKind::RBrace => {
                self.depth = self.depth.saturating_sub(1)
            }
            _ => {}
        }
        self.push(kind, start);
    }

    fn finish(&mut self) {
        if self.line_has_content {
            self.push_marker(PySyntaxKind::Newline);
            self.line_has_content = false;
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push_marker(PySyntaxKind::Dedent);
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_string_prefix(word: &str) -> bool {
    word.len() <= 2
        && word
            .chars()
            .all(|c| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use PySyntaxKind::*;

    fn kinds(source: &str) -> Vec<PySyntaxKind> {
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn significant(source: &str) -> Vec<PySyntaxKind> {
        kinds(source)
            .into_iter()
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_simple_assignment() {
        assert_eq!(
            kinds("x = 1\n"),
            vec![Ident, Whitespace, Eq, Whitespace, Number, Newline]
        );
    }

    #[test]
    fn test_lossless() {
        let source = "def f(a, b=2):  # doc\n\tif a:\r\n\t\treturn b'x' \\\n + 1\n\n";
        let (tokens, _) = lex_with_trivia(source);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_indent_and_dedent() {
        assert_eq!(
            significant("if x:\n    y\nz\n"),
            vec![IfKw, Ident, Colon, Newline, Indent, Ident, Newline, Dedent, Ident, Newline]
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_trivia() {
        assert_eq!(
            kinds("a\n\n# note\nb\n"),
            vec![Ident, Newline, Nl, Comment, Nl, Ident, Newline]
        );
    }

    #[test]
    fn test_comment_lines_do_not_dedent() {
        assert_eq!(
            significant("if x:\n    y\n# gone\n    z\n"),
            vec![IfKw, Ident, Colon, Newline, Indent, Ident, Newline, Ident, Newline, Dedent]
        );
    }

    #[test]
    fn test_line_breaks_inside_brackets() {
        assert_eq!(
            significant("f(a,\n  b)\n"),
            vec![Ident, LParen, Ident, Comma, Ident, RParen, Newline]
        );
    }

    #[test]
    fn test_implicit_newline_and_dedents_at_eof() {
        assert_eq!(
            significant("def f():\n    return 1"),
            vec![DefKw, Ident, LParen, RParen, Colon, Newline, Indent, ReturnKw, Number, Newline, Dedent]
        );
        let (tokens, _) = lex_with_trivia("x");
        assert_eq!(tokens.last().map(|t| t.text.as_str()), Some(""));
    }

    #[test]
    fn test_tabs_advance_to_multiple_of_eight() {
        assert_eq!(
            significant("if x:\n\ty\n        z\n"),
            vec![IfKw, Ident, Colon, Newline, Indent, Ident, Newline, Ident, Newline, Dedent]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(significant("'a\\'b'\n"), vec![Str, Newline]);
        assert_eq!(significant("rb\"x\" f'{y}'\n"), vec![Str, Str, Newline]);
        assert_eq!(significant("\"\"\"one\ntwo \" \"\"\"\n"), vec![Str, Newline]);
        assert_eq!(significant("u'\\\nx'\n"), vec![Str, Newline]);
    }

    #[test]
    fn test_unterminated_string_is_reported() {
        let (_, errors) = lex_with_trivia("x = 'abc\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unterminated string literal");
    }

    #[test]
    fn test_numbers() {
        for number in ["42", "0x1F", "1_000", "3.14", ".5", "1e-3", "2j", "10L", "0o17"] {
            assert_eq!(significant(number), vec![Number, Newline], "{number}");
        }
    }

    #[test]
    fn test_keywords_and_operators() {
        assert_eq!(
            significant("a **= not b != c -> d := ...\n"),
            vec![Ident, DoubleStarEq, NotKw, Ident, NotEq, Ident, Arrow, Ident, ColonEq, Ellipsis, Newline]
        );
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(
            kinds("a = \\\n  1\n"),
            vec![Ident, Whitespace, Eq, Whitespace, LineContinuation, Whitespace, Number, Newline]
        );
    }

    #[test]
    fn test_backquote() {
        assert_eq!(
            significant("x = `a, b`\n"),
            vec![Ident, Eq, Backquote, Ident, Comma, Ident, Backquote, Newline]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, errors) = lex_with_trivia("a $ b\n");
        assert_eq!(errors.len(), 1);
        assert!(tokens.iter().any(|t| t.kind == ErrorToken && t.text == "$"));
    }

    #[test]
    fn test_inconsistent_dedent_is_reported() {
        let (_, errors) = lex_with_trivia("if x:\n    y\n  z\n");
        assert_eq!(errors.len(), 1);
    }
}
