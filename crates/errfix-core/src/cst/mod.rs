//! Concrete Syntax Tree (CST) for Python source
//!
//! Python sources are parsed into a lossless rowan tree. Every byte of the
//! input (whitespace, comments, line continuations and blank lines) is a
//! token somewhere in the tree, so printing the tree reproduces the file
//! exactly and edits only touch the bytes they replace.
//!
//! # Layers
//!
//! - **Green tree**: immutable, deduplicated storage built by the parser
//! - **Red tree**: [`PySyntaxNode`] views with parent pointers and offsets;
//!   `clone_for_update` turns a tree into a mutable one for in-place edits
//!
//! # Trivia
//!
//! Whitespace, comments, non-logical line breaks and backslash continuations
//! are trivia tokens. The parser attaches them to the node that is open when
//! the next significant token arrives, so the trivia in front of a node (its
//! *prefix*) always sits before it among its ancestors' children. The
//! [`trivia`] module reads and rewrites those prefixes; [`edit`] splices new
//! elements into a mutable tree.
//!
//! # Example
//!
//! ```rust,ignore
//! use errfix_core::cst::parse_python;
//!
//! let source = "def f():\n    return 1  # one\n";
//! let parse = parse_python(source);
//! assert!(parse.ok());
//! assert_eq!(parse.syntax().to_string(), source);
//! ```

mod builder;
pub mod edit;
mod language;
pub mod lexer;
pub mod parser;
mod syntax_kind;
pub mod trivia;

pub use builder::CstBuilder;
pub use language::PyLanguage;
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use parser::{Parse, ParseError, ParseErrorKind, parse_python};
pub use rowan::{NodeOrToken, TextRange, TextSize, WalkEvent};
pub use syntax_kind::PySyntaxKind;

/// Red tree node for Python
pub type PySyntaxNode = rowan::SyntaxNode<PyLanguage>;

/// Red tree token for Python
pub type PySyntaxToken = rowan::SyntaxToken<PyLanguage>;

/// Either a node or a token
pub type PySyntaxElement = rowan::SyntaxElement<PyLanguage>;

/// One-based line on which `node` starts
pub fn line_number(node: &PySyntaxNode) -> usize {
    let offset = node.text_range().start();
    let root = node.ancestors().last().unwrap_or_else(|| node.clone());
    let mut line = 1;
    root.text()
        .slice(TextRange::up_to(offset))
        .for_each_chunk(|chunk| line += chunk.matches('\n').count());
    line
}

/// Indented dump of a tree, one element per line. Tokens show their text.
pub fn debug_tree(node: &PySyntaxNode) -> String {
    let mut lines = Vec::new();
    let mut depth = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            WalkEvent::Enter(NodeOrToken::Node(node)) => {
                lines.push(format!("{}{:?}", "  ".repeat(depth), node.kind()));
                depth += 1;
            }
            WalkEvent::Enter(NodeOrToken::Token(token)) => {
                lines.push(format!(
                    "{}{:?} {:?}",
                    "  ".repeat(depth),
                    token.kind(),
                    token.text()
                ));
            }
            WalkEvent::Leave(NodeOrToken::Node(_)) => depth = depth.saturating_sub(1),
            WalkEvent::Leave(NodeOrToken::Token(_)) => {}
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_number() {
        let tree = parse_python("a = 1\n\nif a:\n    b(2)\n").syntax();
        let call = tree
            .descendants()
            .find(|n| n.kind() == PySyntaxKind::PowerExpr)
            .expect("call");
        assert_eq!(line_number(&call), 4);
        assert_eq!(line_number(&tree), 1);
    }

    #[test]
    fn test_debug_tree_shows_trivia() {
        let tree = parse_python("x  # c\n").syntax();
        insta::assert_snapshot!(debug_tree(&tree), @r##"
        Module
          SimpleStmt
            ExprStmt
              Name
                Ident "x"
            Whitespace "  "
            Comment "# c"
            Newline "\n"
        "##);
    }
}
