//! Trivia queries and edits
//!
//! The trivia in front of an element is its *prefix*: the run of
//! whitespace, comment, line-break and continuation tokens between the
//! previous significant token and the element's first token. Because the
//! parser never starts a node with trivia, the prefix is found by walking
//! backwards from the element's first token.

use rowan::NodeOrToken;

use super::{PySyntaxElement, PySyntaxKind, PySyntaxNode, PySyntaxToken, edit};
use crate::{ErrfixError, Result};

/// Children of `node` that are not trivia, in order
pub fn significant_children(node: &PySyntaxNode) -> impl Iterator<Item = PySyntaxElement> + use<> {
    node.children_with_tokens()
        .filter(|element| !element.kind().is_trivia())
}

/// Trivia tokens immediately before `element`, in source order
pub fn leading_trivia_tokens(element: &PySyntaxElement) -> Vec<PySyntaxToken> {
    let first = match element {
        NodeOrToken::Node(node) => node.first_token(),
        NodeOrToken::Token(token) => Some(token.clone()),
    };

    let mut trivia = Vec::new();
    let mut cursor = first.and_then(|token| token.prev_token());
    while let Some(token) = cursor {
        if !token.kind().is_trivia() {
            break;
        }
        cursor = token.prev_token();
        trivia.push(token);
    }
    trivia.reverse();
    trivia
}

/// Text of the prefix of `element`
pub fn leading_trivia(element: &PySyntaxElement) -> String {
    leading_trivia_tokens(element)
        .iter()
        .map(|token| token.text())
        .collect()
}

/// Replace the prefix of `element` with `text`, which must be horizontal
/// whitespace. The element must belong to a mutable tree.
pub fn set_leading_trivia(element: &PySyntaxElement, text: &str) -> Result<()> {
    for token in leading_trivia_tokens(element) {
        token.detach();
    }
    if text.is_empty() {
        return Ok(());
    }
    if text.chars().any(|c| !matches!(c, ' ' | '\t' | '\x0c')) {
        return Err(ErrfixError::internal_error(format!(
            "prefix {text:?} is not horizontal whitespace"
        )));
    }
    edit::insert_before(element, vec![edit::token(PySyntaxKind::Whitespace, text).into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_python;

    fn first_arg(tree: &PySyntaxNode) -> PySyntaxElement {
        tree.descendants()
            .find(|n| n.kind() == PySyntaxKind::ArgList)
            .and_then(|list| list.first_child())
            .expect("argument")
            .into()
    }

    #[test]
    fn test_significant_children_skip_trivia() {
        let tree = parse_python("f( a , b )\n").syntax();
        let list = tree
            .descendants()
            .find(|n| n.kind() == PySyntaxKind::ArgList)
            .expect("arglist");
        let kinds: Vec<_> = significant_children(&list).map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![PySyntaxKind::Name, PySyntaxKind::Comma, PySyntaxKind::Name]
        );
    }

    #[test]
    fn test_leading_trivia_crosses_node_boundaries() {
        let tree = parse_python("f(  # note\n    a)\n").syntax();
        assert_eq!(leading_trivia(&first_arg(&tree)), "  # note\n    ");
    }

    #[test]
    fn test_leading_trivia_empty() {
        let tree = parse_python("f(a)\n").syntax();
        assert_eq!(leading_trivia(&first_arg(&tree)), "");
    }

    #[test]
    fn test_set_leading_trivia() {
        let tree = parse_python("f(\n    a)\n").syntax_mut();
        set_leading_trivia(&first_arg(&tree), " ").expect("edit");
        assert_eq!(tree.to_string(), "f( a)\n");

        set_leading_trivia(&first_arg(&tree), "").expect("edit");
        assert_eq!(tree.to_string(), "f(a)\n");
    }

    #[test]
    fn test_set_leading_trivia_rejects_line_breaks() {
        let tree = parse_python("f(a)\n").syntax_mut();
        assert!(set_leading_trivia(&first_arg(&tree), "\n").is_err());
    }
}
