//! In-place edits on mutable trees
//!
//! Elements created here are detached and mutable, ready to be spliced into
//! a tree obtained from [`Parse::syntax_mut`](super::Parse::syntax_mut).

use rowan::NodeOrToken;

use super::{CstBuilder, PySyntaxElement, PySyntaxKind, PySyntaxNode, PySyntaxToken};
use crate::{ErrfixError, Result};

/// A detached token of `kind` with `text`
pub fn token(kind: PySyntaxKind, text: &str) -> PySyntaxToken {
    let mut builder = CstBuilder::new();
    builder.start_node(PySyntaxKind::Module);
    builder.token(kind, text);
    builder.finish_node();
    let holder = builder.finish_mutable();
    let token = holder
        .first_token()
        .unwrap_or_else(|| unreachable!("holder node always has one token"));
    token.detach();
    token
}

pub fn comma() -> PySyntaxToken {
    token(PySyntaxKind::Comma, ",")
}

/// A detached `Literal` node holding the decimal numeral for `value`
pub fn number_literal(value: u64) -> PySyntaxNode {
    let mut builder = CstBuilder::new();
    builder.start_node(PySyntaxKind::Literal);
    builder.token(PySyntaxKind::Number, &value.to_string());
    builder.finish_node();
    builder.finish_mutable()
}

/// A detached `ArgList` whose only argument is the numeral for `value`
pub fn number_arg_list(value: u64) -> PySyntaxNode {
    let mut builder = CstBuilder::new();
    builder.start_node(PySyntaxKind::ArgList);
    builder.start_node(PySyntaxKind::Literal);
    builder.token(PySyntaxKind::Number, &value.to_string());
    builder.finish_node();
    builder.finish_node();
    builder.finish_mutable()
}

fn parent_and_index(element: &PySyntaxElement) -> Result<(PySyntaxNode, usize)> {
    let (parent, index) = match element {
        NodeOrToken::Node(node) => (node.parent(), node.index()),
        NodeOrToken::Token(token) => (token.parent(), token.index()),
    };
    let parent = parent.ok_or_else(|| {
        ErrfixError::internal_error(format!("{:?} has no parent to edit", element.kind()))
    })?;
    Ok((parent, index))
}

fn detach(element: &PySyntaxElement) {
    match element {
        NodeOrToken::Node(node) => node.detach(),
        NodeOrToken::Token(token) => token.detach(),
    }
}

fn splice(parent: &PySyntaxNode, at: std::ops::Range<usize>, elements: Vec<PySyntaxElement>) {
    for element in &elements {
        detach(element);
    }
    parent.splice_children(at, elements);
}

/// Insert `elements` directly before `anchor`, under the same parent
pub fn insert_before(anchor: &PySyntaxElement, elements: Vec<PySyntaxElement>) -> Result<()> {
    let (parent, index) = parent_and_index(anchor)?;
    splice(&parent, index..index, elements);
    Ok(())
}

/// Insert `elements` directly after `anchor`, under the same parent
pub fn insert_after(anchor: &PySyntaxElement, elements: Vec<PySyntaxElement>) -> Result<()> {
    let (parent, index) = parent_and_index(anchor)?;
    splice(&parent, index + 1..index + 1, elements);
    Ok(())
}

/// Swap `old` for `new`. Trivia around `old` is left where it is.
pub fn replace(old: &PySyntaxElement, new: PySyntaxElement) -> Result<()> {
    let (parent, index) = parent_and_index(old)?;
    splice(&parent, index..index + 1, vec![new]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_python;

    fn find(tree: &PySyntaxNode, kind: PySyntaxKind) -> PySyntaxNode {
        tree.descendants()
            .find(|n| n.kind() == kind)
            .expect("node of kind")
    }

    #[test]
    fn test_fresh_elements_are_detached() {
        assert!(comma().parent().is_none());
        assert_eq!(comma().text(), ",");
        assert_eq!(number_literal(42).to_string(), "42");
        assert_eq!(number_arg_list(7).kind(), PySyntaxKind::ArgList);
    }

    #[test]
    fn test_replace_keeps_surrounding_trivia() {
        let tree = parse_python("f( 1 , x)\n").syntax_mut();
        let arg = find(&tree, PySyntaxKind::Literal);
        replace(&arg.into(), number_literal(123).into()).expect("replace");
        assert_eq!(tree.to_string(), "f( 123 , x)\n");
    }

    #[test]
    fn test_insert_before_and_after() {
        let tree = parse_python("f(x)\n").syntax_mut();
        let name = find(&tree, PySyntaxKind::ArgList).first_child().expect("arg");
        insert_before(
            &name.clone().into(),
            vec![number_literal(5).into(), comma().into()],
        )
        .expect("insert");
        assert_eq!(tree.to_string(), "f(5,x)\n");

        insert_after(
            &name.into(),
            vec![comma().into(), token(PySyntaxKind::Whitespace, " ").into()],
        )
        .expect("insert");
        assert_eq!(tree.to_string(), "f(5,x, )\n");
    }

    #[test]
    fn test_insert_arg_list_after_paren() {
        let tree = parse_python("g()\n").syntax_mut();
        let call = find(&tree, PySyntaxKind::CallTrailer);
        let lparen = call.first_token().expect("paren");
        insert_after(&lparen.into(), vec![number_arg_list(9).into()]).expect("insert");
        assert_eq!(tree.to_string(), "g(9)\n");
    }

    #[test]
    fn test_editing_root_fails() {
        let tree = parse_python("x\n").syntax_mut();
        assert!(replace(&tree.clone().into(), number_literal(1).into()).is_err());
    }
}
