//! Recursive-descent parser for Python source
//!
//! Builds a lossless tree from the trivia-preserving token stream. Trivia is
//! never parsed directly: it is attached to whichever node is open when the
//! next significant token (or node) is added, so a node never begins with
//! trivia and the whitespace before a node always lives in its parent.
//!
//! The grammar follows Python 3 with a few legacy forms kept for older
//! sources (`<>`, `except E, e`, `raise E, V`, long integer suffixes, the
//! `exec` statement and backquote repr). The Python 2 `print` statement is a
//! syntax error, since `print` is parsed as a function.

use rowan::{Checkpoint, GreenNode};

use super::lexer::{CstSpan, LexerError};
use super::{CstBuilder, CstToken, PySyntaxKind, PySyntaxNode};
use crate::ErrfixError;

use PySyntaxKind::*;

/// Where a parse error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Lexer,
    Syntax,
}

/// A problem found while lexing or parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: CstSpan,
}

impl ParseError {
    /// One-based line and column of the error start within `source`
    pub fn location(&self, source: &str) -> (usize, usize) {
        let mut offset = self.span.start.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        (line, column)
    }

    pub fn into_error(self, source: &str) -> ErrfixError {
        let (line, column) = self.location(source);
        ErrfixError::parse_error(self.message, line, column)
    }
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        Self {
            kind: ParseErrorKind::Lexer,
            message: err.message,
            span: err.span,
        }
    }
}

/// Green tree plus every error found while building it
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Immutable view of the tree
    pub fn syntax(&self) -> PySyntaxNode {
        PySyntaxNode::new_root(self.green.clone())
    }

    /// Mutable copy of the tree for in-place edits
    pub fn syntax_mut(&self) -> PySyntaxNode {
        self.syntax().clone_for_update()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The tree if it parsed cleanly, otherwise the first error located in `source`
    pub fn into_result(self, source: &str) -> crate::Result<PySyntaxNode> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err.into_error(source)),
            None => Ok(PySyntaxNode::new_root(self.green)),
        }
    }
}

/// Parse Python source into a lossless tree
///
/// The tree text always equals `source`, even when errors are reported.
///
/// # Example
///
/// ```rust,ignore
/// use errfix_core::cst::parse_python;
///
/// let source = "result.error(1, 'boom')\n";
/// let parse = parse_python(source);
/// assert!(parse.ok());
/// assert_eq!(parse.syntax().text().to_string(), source);
/// ```
pub fn parse_python(source: &str) -> Parse {
    let (tokens, lex_errors) = super::lex_with_trivia(source);
    let mut parser = Parser::new(&tokens, source.len());
    parser.parse_module();

    let mut errors: Vec<ParseError> = lex_errors.into_iter().map(ParseError::from).collect();
    errors.extend(parser.errors);
    errors.sort_by_key(|e| e.span.start);

    Parse {
        green: parser.builder.finish(),
        errors,
    }
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    end: usize,
    builder: CstBuilder,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken], end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    // ---- token cursor -------------------------------------------------

    fn nth_index(&self, n: usize) -> Option<usize> {
        self.tokens[self.pos..]
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.kind.is_trivia())
            .nth(n)
            .map(|(index, _)| self.pos + index)
    }

    fn nth(&self, n: usize) -> PySyntaxKind {
        self.nth_index(n).map_or(Eof, |index| self.tokens[index].kind)
    }

    fn current(&self) -> PySyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: PySyntaxKind) -> bool {
        self.current() == kind
    }

    fn current_text(&self) -> &str {
        self.nth_index(0)
            .map_or("", |index| self.tokens[index].text.as_str())
    }

    fn current_span(&self) -> CstSpan {
        self.nth_index(0)
            .map_or(self.end..self.end, |index| self.tokens[index].span.clone())
    }

    /// Attach pending trivia to the open node
    fn flush_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind, &token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.flush_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind, &token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: PySyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: PySyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {}", kind.describe()));
        false
    }

    fn start_node(&mut self, kind: PySyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: PySyntaxKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    fn wrap_token(&mut self, kind: PySyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    fn error(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.errors.push(ParseError {
            kind: ParseErrorKind::Syntax,
            message: message.into(),
            span,
        });
    }

    /// Report an error and skip to the end of the logical line
    fn error_recover(&mut self, message: &str) {
        self.error(message);
        self.start_node(Error);
        while !matches!(self.current(), Newline | Eof) {
            self.bump();
        }
        self.finish_node();
    }

    fn at_expr_start(&self) -> bool {
        matches!(
            self.current(),
            Ident
                | Number
                | Str
                | LParen
                | LBracket
                | LBrace
                | Minus
                | Plus
                | Tilde
                | NotKw
                | LambdaKw
                | AwaitKw
                | NoneKw
                | TrueKw
                | FalseKw
                | Ellipsis
                | Backquote
        )
    }

    /// `exec` followed by an operand that cannot continue a plain name
    fn at_exec_stmt(&self) -> bool {
        self.at(Ident)
            && self.current_text() == "exec"
            && matches!(
                self.nth(1),
                Ident
                    | Number
                    | Str
                    | LBrace
                    | Backquote
                    | NoneKw
                    | TrueKw
                    | FalseKw
                    | LambdaKw
            )
    }

    fn at_star_expr_start(&self) -> bool {
        self.at(Star) || self.at_expr_start()
    }

    fn at_comp_for(&self) -> bool {
        self.at(ForKw) || (self.at(AsyncKw) && self.nth(1) == ForKw)
    }

    // ---- statements ---------------------------------------------------

    fn parse_module(&mut self) {
        self.builder.start_node(Module);
        loop {
            match self.current() {
                Eof => break,
                Newline => self.bump(),
                Indent => {
                    self.error("unexpected indent");
                    self.wrap_token(Error);
                }
                Dedent => self.wrap_token(Error),
                _ => self.parse_statement(),
            }
        }
        self.flush_trivia();
        self.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current() {
            IfKw => self.parse_if_stmt(),
            WhileKw => self.parse_while_stmt(),
            ForKw => self.parse_for_stmt(),
            TryKw => self.parse_try_stmt(),
            WithKw => self.parse_with_stmt(),
            DefKw => self.parse_funcdef(),
            ClassKw => self.parse_classdef(),
            At => self.parse_decorated(),
            AsyncKw => match self.nth(1) {
                DefKw => self.parse_funcdef(),
                ForKw => self.parse_for_stmt(),
                WithKw => self.parse_with_stmt(),
                _ => self.parse_simple_stmt(),
            },
            _ => self.parse_simple_stmt(),
        }
    }

    fn parse_simple_stmt(&mut self) {
        self.start_node(SimpleStmt);
        loop {
            self.parse_small_stmt();
            if !self.eat(Semicolon) || matches!(self.current(), Newline | Eof) {
                break;
            }
        }
        if !self.eat(Newline) && !self.at(Eof) {
            self.error_recover("invalid syntax");
            self.eat(Newline);
        }
        self.finish_node();
    }

    fn parse_small_stmt(&mut self) {
        match self.current() {
            PassKw => self.wrap_token(PassStmt),
            BreakKw => self.wrap_token(BreakStmt),
            ContinueKw => self.wrap_token(ContinueStmt),
            ReturnKw => {
                self.start_node(ReturnStmt);
                self.bump();
                if self.at_star_expr_start() {
                    self.parse_sequence(Self::parse_star_or_test);
                }
                self.finish_node();
            }
            RaiseKw => self.parse_raise_stmt(),
            GlobalKw | NonlocalKw => {
                let kind = if self.at(GlobalKw) { GlobalStmt } else { NonlocalStmt };
                self.start_node(kind);
                self.bump();
                self.expect(Ident);
                while self.eat(Comma) {
                    self.expect(Ident);
                }
                self.finish_node();
            }
            DelKw => {
                self.start_node(DelStmt);
                self.bump();
                self.parse_sequence(Self::parse_star_or_bitor);
                self.finish_node();
            }
            AssertKw => {
                self.start_node(AssertStmt);
                self.bump();
                self.parse_test();
                if self.eat(Comma) {
                    self.parse_test();
                }
                self.finish_node();
            }
            ImportKw => self.parse_import_stmt(),
            FromKw => self.parse_import_from_stmt(),
            Ident if self.at_exec_stmt() => self.parse_exec_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_exec_stmt(&mut self) {
        self.start_node(ExecStmt);
        self.bump();
        self.parse_bitor();
        if self.eat(InKw) {
            self.parse_test();
            if self.eat(Comma) {
                self.parse_test();
            }
        }
        self.finish_node();
    }

    fn parse_raise_stmt(&mut self) {
        self.start_node(RaiseStmt);
        self.bump();
        if self.at_expr_start() {
            self.parse_test();
            if self.eat(FromKw) {
                self.parse_test();
            } else if self.eat(Comma) {
                self.parse_test();
                if self.eat(Comma) {
                    self.parse_test();
                }
            }
        }
        self.finish_node();
    }

    fn parse_expr_stmt(&mut self) {
        self.start_node(ExprStmt);
        if !self.at_star_expr_start() && !self.at(YieldKw) {
            self.error_recover("invalid syntax");
            self.finish_node();
            return;
        }

        self.parse_assign_value();
        match self.current() {
            Colon => {
                self.bump();
                self.parse_test();
                if self.eat(Eq) {
                    self.parse_assign_value();
                }
            }
            kind if kind.is_augmented_assign() => {
                self.bump();
                self.parse_assign_value();
            }
            _ => {
                while self.eat(Eq) {
                    self.parse_assign_value();
                }
            }
        }
        self.finish_node();
    }

    fn parse_assign_value(&mut self) {
        if self.at(YieldKw) {
            self.parse_yield_expr();
        } else {
            self.parse_sequence(Self::parse_star_or_test);
        }
    }

    fn parse_import_stmt(&mut self) {
        self.start_node(ImportStmt);
        self.bump();
        loop {
            self.start_node(ImportAlias);
            self.parse_dotted_name();
            if self.eat(AsKw) {
                self.expect(Ident);
            }
            self.finish_node();
            if !self.eat(Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_import_from_stmt(&mut self) {
        self.start_node(ImportFromStmt);
        self.bump();

        let mut relative = false;
        while matches!(self.current(), Dot | Ellipsis) {
            self.bump();
            relative = true;
        }
        if self.at(Ident) {
            self.parse_dotted_name();
        } else if !relative {
            self.error("expected module name");
        }

        self.expect(ImportKw);
        if !self.eat(Star) {
            let parenthesized = self.eat(LParen);
            loop {
                self.start_node(ImportAlias);
                self.expect(Ident);
                if self.eat(AsKw) {
                    self.expect(Ident);
                }
                self.finish_node();
                if !self.eat(Comma) || !self.at(Ident) {
                    break;
                }
            }
            if parenthesized {
                self.expect(RParen);
            }
        }
        self.finish_node();
    }

    fn parse_dotted_name(&mut self) {
        self.start_node(DottedName);
        self.expect(Ident);
        while self.at(Dot) && self.nth(1) == Ident {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    fn parse_if_stmt(&mut self) {
        self.start_node(IfStmt);
        self.bump();
        self.parse_namedexpr_test();
        self.expect(Colon);
        self.parse_suite();
        while self.at(ElifKw) {
            self.start_node(ElifClause);
            self.bump();
            self.parse_namedexpr_test();
            self.expect(Colon);
            self.parse_suite();
            self.finish_node();
        }
        self.parse_else_clause();
        self.finish_node();
    }

    fn parse_else_clause(&mut self) {
        if self.at(ElseKw) {
            self.start_node(ElseClause);
            self.bump();
            self.expect(Colon);
            self.parse_suite();
            self.finish_node();
        }
    }

    fn parse_while_stmt(&mut self) {
        self.start_node(WhileStmt);
        self.bump();
        self.parse_namedexpr_test();
        self.expect(Colon);
        self.parse_suite();
        self.parse_else_clause();
        self.finish_node();
    }

    fn parse_for_stmt(&mut self) {
        self.start_node(ForStmt);
        self.eat(AsyncKw);
        self.expect(ForKw);
        self.parse_sequence(Self::parse_star_or_bitor);
        self.expect(InKw);
        self.parse_sequence(Self::parse_star_or_test);
        self.expect(Colon);
        self.parse_suite();
        self.parse_else_clause();
        self.finish_node();
    }

    fn parse_try_stmt(&mut self) {
        self.start_node(TryStmt);
        self.bump();
        self.expect(Colon);
        self.parse_suite();

        let mut handled = false;
        while self.at(ExceptKw) {
            handled = true;
            self.start_node(ExceptClause);
            self.bump();
            self.eat(Star);
            if self.at_expr_start() {
                self.parse_test();
                if self.eat(AsKw) {
                    self.expect(Ident);
                } else if self.eat(Comma) {
                    self.parse_test();
                }
            }
            self.expect(Colon);
            self.parse_suite();
            self.finish_node();
        }
        if handled {
            self.parse_else_clause();
        }
        if self.at(FinallyKw) {
            handled = true;
            self.start_node(FinallyClause);
            self.bump();
            self.expect(Colon);
            self.parse_suite();
            self.finish_node();
        }
        if !handled {
            self.error("expected 'except' or 'finally' block");
        }
        self.finish_node();
    }

    fn parse_with_stmt(&mut self) {
        self.start_node(WithStmt);
        self.eat(AsyncKw);
        self.expect(WithKw);
        loop {
            self.start_node(WithItem);
            self.parse_test();
            if self.eat(AsKw) {
                self.parse_star_or_bitor();
            }
            self.finish_node();
            if !self.eat(Comma) {
                break;
            }
        }
        self.expect(Colon);
        self.parse_suite();
        self.finish_node();
    }

    fn parse_funcdef(&mut self) {
        self.start_node(FuncDef);
        self.eat(AsyncKw);
        self.expect(DefKw);
        self.expect(Ident);
        if self.expect(LParen) {
            self.parse_params(RParen, true);
            self.expect(RParen);
        }
        if self.eat(Arrow) {
            self.parse_test();
        }
        self.expect(Colon);
        self.parse_suite();
        self.finish_node();
    }

    fn parse_params(&mut self, closing: PySyntaxKind, annotated: bool) {
        if self.at(closing) {
            return;
        }
        self.start_node(ParamList);
        loop {
            self.parse_param(annotated);
            if !self.eat(Comma) || self.at(closing) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_param(&mut self, annotated: bool) {
        self.start_node(Param);
        match self.current() {
            Slash => self.bump(),
            Star => {
                self.bump();
                if self.eat(Ident) {
                    self.parse_annotation(annotated);
                }
            }
            DoubleStar => {
                self.bump();
                self.expect(Ident);
                self.parse_annotation(annotated);
            }
            _ => {
                self.expect(Ident);
                self.parse_annotation(annotated);
                if self.eat(Eq) {
                    self.parse_test();
                }
            }
        }
        self.finish_node();
    }

    fn parse_annotation(&mut self, annotated: bool) {
        if annotated && self.eat(Colon) {
            self.parse_test();
        }
    }

    fn parse_classdef(&mut self) {
        self.start_node(ClassDef);
        self.bump();
        self.expect(Ident);
        if self.eat(LParen) {
            if !self.at(RParen) {
                self.parse_arglist();
            }
            self.expect(RParen);
        }
        self.expect(Colon);
        self.parse_suite();
        self.finish_node();
    }

    fn parse_decorated(&mut self) {
        self.start_node(Decorated);
        while self.at(At) {
            self.start_node(Decorator);
            self.bump();
            self.parse_namedexpr_test();
            self.expect(Newline);
            self.finish_node();
        }
        match self.current() {
            DefKw => self.parse_funcdef(),
            ClassKw => self.parse_classdef(),
            AsyncKw if self.nth(1) == DefKw => self.parse_funcdef(),
            _ => self.error("expected function or class definition"),
        }
        self.finish_node();
    }

    fn parse_suite(&mut self) {
        self.start_node(Suite);
        if !self.eat(Newline) {
            self.parse_simple_stmt();
            self.finish_node();
            return;
        }

        if self.expect(Indent) {
            loop {
                match self.current() {
                    Dedent => {
                        self.bump();
                        break;
                    }
                    Eof => break,
                    Newline => self.bump(),
                    Indent => {
                        self.error("unexpected indent");
                        self.wrap_token(Error);
                    }
                    _ => self.parse_statement(),
                }
            }
        }
        self.finish_node();
    }

    // ---- expressions --------------------------------------------------

    /// One element, or several separated by commas wrapped in a tuple
    fn parse_sequence(&mut self, element: fn(&mut Self)) {
        let checkpoint = self.checkpoint();
        element(self);
        if self.at(Comma) {
            self.start_node_at(checkpoint, TupleExpr);
            while self.eat(Comma) {
                if !self.at_star_expr_start() {
                    break;
                }
                element(self);
            }
            self.finish_node();
        }
    }

    fn parse_star_or_test(&mut self) {
        if self.at(Star) {
            self.parse_star_expr();
        } else {
            self.parse_namedexpr_test();
        }
    }

    fn parse_star_or_bitor(&mut self) {
        if self.at(Star) {
            self.parse_star_expr();
        } else {
            self.parse_bitor();
        }
    }

    fn parse_star_expr(&mut self) {
        self.start_node(StarExpr);
        self.bump();
        self.parse_bitor();
        self.finish_node();
    }

    fn parse_namedexpr_test(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_test();
        if self.at(ColonEq) {
            self.start_node_at(checkpoint, NamedExpr);
            self.bump();
            self.parse_test();
            self.finish_node();
        }
    }

    fn parse_test(&mut self) {
        if self.at(LambdaKw) {
            self.parse_lambda();
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_or_test();
        if self.at(IfKw) {
            self.start_node_at(checkpoint, TernaryExpr);
            self.bump();
            self.parse_or_test();
            self.expect(ElseKw);
            self.parse_test();
            self.finish_node();
        }
    }

    fn parse_test_nocond(&mut self) {
        if self.at(LambdaKw) {
            self.parse_lambda();
        } else {
            self.parse_or_test();
        }
    }

    fn parse_lambda(&mut self) {
        self.start_node(LambdaExpr);
        self.bump();
        self.parse_params(Colon, false);
        self.expect(Colon);
        self.parse_test();
        self.finish_node();
    }

    /// Left-associative chain of `operand (op operand)*`
    fn parse_infix(&mut self, node: PySyntaxKind, ops: &[PySyntaxKind], operand: fn(&mut Self)) {
        let checkpoint = self.checkpoint();
        operand(self);
        while ops.contains(&self.current()) {
            self.start_node_at(checkpoint, node);
            self.bump();
            operand(self);
            self.finish_node();
        }
    }

    fn parse_or_test(&mut self) {
        self.parse_infix(BoolOpExpr, &[OrKw], Self::parse_and_test);
    }

    fn parse_and_test(&mut self) {
        self.parse_infix(BoolOpExpr, &[AndKw], Self::parse_not_test);
    }

    fn parse_not_test(&mut self) {
        if self.at(NotKw) {
            self.start_node(NotExpr);
            self.bump();
            self.parse_not_test();
            self.finish_node();
        } else {
            self.parse_comparison();
        }
    }

    fn parse_comparison(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_bitor();
        loop {
            let op_len = match self.current() {
                Lt | Gt | EqEq | GtEq | LtEq | LtGt | NotEq | InKw => 1,
                IsKw if self.nth(1) == NotKw => 2,
                IsKw => 1,
                NotKw if self.nth(1) == InKw => 2,
                _ => break,
            };
            self.start_node_at(checkpoint, CompareExpr);
            for _ in 0..op_len {
                self.bump();
            }
            self.parse_bitor();
            self.finish_node();
        }
    }

    fn parse_bitor(&mut self) {
        self.parse_infix(BinExpr, &[Pipe], Self::parse_bitxor);
    }

    fn parse_bitxor(&mut self) {
        self.parse_infix(BinExpr, &[Caret], Self::parse_bitand);
    }

    fn parse_bitand(&mut self) {
        self.parse_infix(BinExpr, &[Amp], Self::parse_shift);
    }

    fn parse_shift(&mut self) {
        self.parse_infix(BinExpr, &[Shl, Shr], Self::parse_arith);
    }

    fn parse_arith(&mut self) {
        self.parse_infix(BinExpr, &[Plus, Minus], Self::parse_term);
    }

    fn parse_term(&mut self) {
        self.parse_infix(
            BinExpr,
            &[Star, Slash, Percent, DoubleSlash, At],
            Self::parse_factor,
        );
    }

    fn parse_factor(&mut self) {
        if matches!(self.current(), Plus | Minus | Tilde) {
            self.start_node(UnaryExpr);
            self.bump();
            self.parse_factor();
            self.finish_node();
        } else {
            self.parse_power();
        }
    }

    /// `await`, atom, trailers and `**` all land in one [`PowerExpr`] node
    fn parse_power(&mut self) {
        let checkpoint = self.checkpoint();
        let mut compound = self.eat(AwaitKw);
        self.parse_atom();
        while self.parse_trailer() {
            compound = true;
        }
        if self.eat(DoubleStar) {
            compound = true;
            self.parse_factor();
        }
        if compound {
            self.start_node_at(checkpoint, PowerExpr);
            self.finish_node();
        }
    }

    fn parse_trailer(&mut self) -> bool {
        match self.current() {
            LParen => {
                self.start_node(CallTrailer);
                self.bump();
                if !self.at(RParen) {
                    self.parse_arglist();
                }
                self.expect(RParen);
                self.finish_node();
            }
            LBracket => {
                self.start_node(SubscriptTrailer);
                self.bump();
                self.parse_subscriptlist();
                self.expect(RBracket);
                self.finish_node();
            }
            Dot => {
                self.start_node(AttrTrailer);
                self.bump();
                self.expect(Ident);
                self.finish_node();
            }
            _ => return false,
        }
        true
    }

    fn parse_atom(&mut self) {
        match self.current() {
            Ident => self.wrap_token(Name),
            Number | NoneKw | TrueKw | FalseKw | Ellipsis => self.wrap_token(Literal),
            Str => {
                self.start_node(StringLiteral);
                while self.at(Str) {
                    self.bump();
                }
                self.finish_node();
            }
            LParen => {
                self.start_node(ParenExpr);
                self.bump();
                if self.at(YieldKw) {
                    self.parse_yield_expr();
                } else if !self.at(RParen) {
                    self.parse_testlist_comp(RParen);
                }
                self.expect(RParen);
                self.finish_node();
            }
            LBracket => {
                self.start_node(ListExpr);
                self.bump();
                if !self.at(RBracket) {
                    self.parse_testlist_comp(RBracket);
                }
                self.expect(RBracket);
                self.finish_node();
            }
            Backquote => {
                self.start_node(ReprExpr);
                self.bump();
                self.parse_sequence(Self::parse_test);
                self.expect(Backquote);
                self.finish_node();
            }
            LBrace => {
                self.start_node(BraceExpr);
                self.bump();
                if !self.at(RBrace) {
                    self.parse_dict_or_set();
                }
                self.expect(RBrace);
                self.finish_node();
            }
            kind => {
                self.error("expected expression");
                if !matches!(
                    kind,
                    Newline
                        | Eof
                        | Indent
                        | Dedent
                        | RParen
                        | RBracket
                        | RBrace
                        | Colon
                        | Comma
                        | Eq
                        | Semicolon
                ) {
                    self.wrap_token(Error);
                }
            }
        }
    }

    fn parse_testlist_comp(&mut self, closing: PySyntaxKind) {
        self.parse_star_or_test();
        if self.at_comp_for() {
            self.parse_comp_for();
            return;
        }
        while self.eat(Comma) {
            if self.at(closing) || !self.at_star_expr_start() {
                break;
            }
            self.parse_star_or_test();
        }
    }

    fn parse_dict_or_set(&mut self) {
        self.parse_dict_or_set_item();
        if self.at_comp_for() {
            self.parse_comp_for();
            return;
        }
        while self.eat(Comma) {
            if self.at(RBrace) {
                break;
            }
            self.parse_dict_or_set_item();
        }
    }

    fn parse_dict_or_set_item(&mut self) {
        match self.current() {
            DoubleStar => {
                self.start_node(DictEntry);
                self.bump();
                self.parse_bitor();
                self.finish_node();
            }
            Star => self.parse_star_expr(),
            _ => {
                let checkpoint = self.checkpoint();
                self.parse_test();
                if self.at(Colon) {
                    self.start_node_at(checkpoint, DictEntry);
                    self.bump();
                    self.parse_test();
                    self.finish_node();
                }
            }
        }
    }

    fn parse_subscriptlist(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_subscript();
        if self.at(Comma) {
            self.start_node_at(checkpoint, SubscriptList);
            while self.eat(Comma) {
                if self.at(RBracket) {
                    break;
                }
                self.parse_subscript();
            }
            self.finish_node();
        }
    }

    fn parse_subscript(&mut self) {
        let checkpoint = self.checkpoint();
        if !self.at(Colon) {
            self.parse_star_or_test();
        }
        if self.at(Colon) {
            self.start_node_at(checkpoint, Slice);
            self.bump();
            if self.at_expr_start() {
                self.parse_test();
            }
            if self.eat(Colon) && self.at_expr_start() {
                self.parse_test();
            }
            self.finish_node();
        }
    }

    fn parse_arglist(&mut self) {
        self.start_node(ArgList);
        loop {
            self.parse_argument();
            if !self.eat(Comma) || self.at(RParen) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_argument(&mut self) {
        if matches!(self.current(), Star | DoubleStar) {
            self.start_node(Argument);
            self.bump();
            self.parse_test();
            self.finish_node();
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_namedexpr_test();
        if self.at(Eq) {
            self.start_node_at(checkpoint, Argument);
            self.bump();
            self.parse_test();
            self.finish_node();
        } else if self.at_comp_for() {
            self.start_node_at(checkpoint, Argument);
            self.parse_comp_for();
            self.finish_node();
        }
    }

    fn parse_comp_for(&mut self) {
        self.start_node(CompFor);
        self.eat(AsyncKw);
        self.expect(ForKw);
        self.parse_sequence(Self::parse_star_or_bitor);
        self.expect(InKw);
        self.parse_or_test();
        loop {
            if self.at_comp_for() {
                self.parse_comp_for();
            } else if self.at(IfKw) {
                self.start_node(CompIf);
                self.bump();
                self.parse_test_nocond();
                self.finish_node();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_yield_expr(&mut self) {
        self.start_node(YieldExpr);
        self.bump();
        if self.eat(FromKw) {
            self.parse_test();
        } else if self.at_star_expr_start() {
            self.parse_sequence(Self::parse_star_or_test);
        }
        self.finish_node();
    }
}
