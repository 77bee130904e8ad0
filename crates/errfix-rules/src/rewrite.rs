//! Writing error codes into matched calls

use errfix_core::cst::{
    NodeOrToken, PySyntaxElement, PySyntaxKind, edit, line_number, trivia::set_leading_trivia,
};
use errfix_core::{ErrfixError, Result};
use tracing::debug;

use crate::matcher::{CallShape, ErrorCallMatch, MatchedArgs};
use crate::series::ErrorSeries;

/// How a code ended up in a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixKind {
    /// The call had no code and one was added in front
    Inserted,
    /// An existing leading argument was renumbered
    Replaced { previous: String },
}

/// Record of one rewritten call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    /// One-based line of the call in the parsed text
    pub line: usize,
    pub code: u64,
    pub kind: FixKind,
    pub shape: CallShape,
}

/// Put the next code of `series` into the matched call
///
/// The counter always advances, whatever the arity. A call with two
/// arguments has its first one replaced, a call with one gets the code and a
/// comma in front of it, an empty call gets the code as its only argument.
pub fn apply_error_code(found: ErrorCallMatch, series: &mut dyn ErrorSeries) -> Result<AppliedFix> {
    let code = series.next_code()?;
    let line = line_number(&found.target);

    let kind = match &found.args {
        MatchedArgs::Two { arg_1, arg_2 } => {
            debug!("found 2 [{} {}] at line {}", text(arg_1), text(arg_2), line);
            let previous = text(arg_1);
            edit::replace(arg_1, edit::number_literal(code).into())?;
            FixKind::Replaced { previous }
        }
        MatchedArgs::One { arg_1 } => {
            debug!("found 1 [{}] at line {}", text(arg_1), line);
            edit::insert_before(
                arg_1,
                vec![edit::number_literal(code).into(), edit::comma().into()],
            )?;
            set_leading_trivia(arg_1, " ")?;
            FixKind::Inserted
        }
        MatchedArgs::Empty => {
            debug!("found 0 [] at line {}", line);
            let lparen = found
                .call
                .children_with_tokens()
                .find(|element| element.kind() == PySyntaxKind::LParen)
                .ok_or_else(|| {
                    ErrfixError::internal_error(format!(
                        "call to {} on line {} has no opening parenthesis",
                        found.shape, line
                    ))
                })?;
            edit::insert_after(&lparen, vec![edit::number_arg_list(code).into()])?;
            FixKind::Inserted
        }
    };

    Ok(AppliedFix {
        line,
        code,
        kind,
        shape: found.shape,
    })
}

fn text(element: &PySyntaxElement) -> String {
    match element {
        NodeOrToken::Node(node) => node.to_string(),
        NodeOrToken::Token(token) => token.text().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_error_call;
    use crate::series::LocalSeries;
    use errfix_core::cst::{PySyntaxNode, parse_python};

    fn rewrite_first(source: &str, seed: u64) -> (String, AppliedFix) {
        let tree: PySyntaxNode = parse_python(source).syntax_mut();
        let found = tree
            .descendants()
            .find_map(|node| match_error_call(&node))
            .expect("a matching call");
        let mut series = LocalSeries::new(seed);
        let fix = apply_error_code(found, &mut series).unwrap();
        (tree.to_string(), fix)
    }

    #[test]
    fn test_replaces_existing_code() {
        let (output, fix) = rewrite_first("result.error(234, \"This is 234\")\n", 9000);
        assert_eq!(output, "result.error(9001, \"This is 234\")\n");
        assert_eq!(
            fix.kind,
            FixKind::Replaced {
                previous: "234".to_string()
            }
        );
        assert_eq!(fix.code, 9001);
    }

    #[test]
    fn test_replacement_keeps_surrounding_trivia() {
        let (output, _) = rewrite_first("result.error(  OLD_CODE ,  'x')\n", 1);
        assert_eq!(output, "result.error(  2 ,  'x')\n");
    }

    #[test]
    fn test_inserts_before_single_argument() {
        let (output, fix) = rewrite_first("result.error(\"This is 1234\")\n", 41);
        assert_eq!(output, "result.error(42, \"This is 1234\")\n");
        assert_eq!(fix.kind, FixKind::Inserted);
    }

    #[test]
    fn test_insertion_moves_prefix_to_the_code() {
        let source = "self.logger.error(\n    'long message'\n)\n";
        let (output, _) = rewrite_first(source, 0);
        assert_eq!(output, "self.logger.error(\n    1, 'long message'\n)\n");
    }

    #[test]
    fn test_empty_call() {
        let (output, fix) = rewrite_first("result.error()\n", 99);
        assert_eq!(output, "result.error(100)\n");
        assert_eq!(fix.kind, FixKind::Inserted);

        let (output, _) = rewrite_first("result.error( )\n", 99);
        assert_eq!(output, "result.error(100 )\n");
    }

    #[test]
    fn test_line_is_reported() {
        let (_, fix) = rewrite_first("x = 1\n\nif x:\n    result.error('x')\n", 0);
        assert_eq!(fix.line, 4);
        assert_eq!(fix.shape, CallShape::ResultError);
    }
}
