//! Recognizing error-reporting calls
//!
//! Two call shapes are recognized, whatever their formatting:
//!
//! ```text
//! result.error(...)
//! self.logger.error(...)
//! self.logger.user_error(...)
//! ```
//!
//! The call must be the whole `PowerExpr`: an `await` prefix, a further
//! trailer or a `**` exponent rules it out. Arguments must be absent, a single
//! positional argument, or exactly two positional arguments.

use errfix_core::cst::trivia::significant_children;
use errfix_core::cst::{PySyntaxElement, PySyntaxKind, PySyntaxNode};
use std::fmt;

const RESULT_RECEIVER: &str = "result";
const SELF_RECEIVER: &str = "self";
const LOGGER_ATTR: &str = "logger";
const ERROR_METHOD: &str = "error";
const USER_ERROR_METHOD: &str = "user_error";

/// Logger method named by a `self.logger.<method>(...)` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerMethod {
    Error,
    UserError,
}

impl LoggerMethod {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            ERROR_METHOD => Some(Self::Error),
            USER_ERROR_METHOD => Some(Self::UserError),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => ERROR_METHOD,
            Self::UserError => USER_ERROR_METHOD,
        }
    }
}

/// Which of the recognized receivers a call goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    ResultError,
    LoggerError { method: LoggerMethod },
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResultError => write!(f, "{RESULT_RECEIVER}.{ERROR_METHOD}"),
            Self::LoggerError { method } => {
                write!(f, "{SELF_RECEIVER}.{LOGGER_ATTR}.{}", method.as_str())
            }
        }
    }
}

/// Arguments bound by a match
#[derive(Debug, Clone)]
pub enum MatchedArgs {
    Empty,
    One {
        arg_1: PySyntaxElement,
    },
    /// `arg_1` holds the existing code, `arg_2` the message
    Two {
        arg_1: PySyntaxElement,
        arg_2: PySyntaxElement,
    },
}

impl MatchedArgs {
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One { .. } => 1,
            Self::Two { .. } => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A matched call, consumed right away by the rewriter
#[derive(Debug, Clone)]
pub struct ErrorCallMatch {
    /// The whole `PowerExpr`
    pub target: PySyntaxNode,
    /// Its final `CallTrailer`
    pub call: PySyntaxNode,
    pub shape: CallShape,
    pub args: MatchedArgs,
}

/// Match `node` against the recognized call shapes
pub fn match_error_call(node: &PySyntaxNode) -> Option<ErrorCallMatch> {
    if node.kind() != PySyntaxKind::PowerExpr {
        return None;
    }

    let children: Vec<PySyntaxElement> = significant_children(node).collect();
    let (shape, call) = match children.as_slice() {
        [receiver, attr, call]
            if is_name(receiver, RESULT_RECEIVER) && attr_name(attr).as_deref() == Some(ERROR_METHOD) =>
        {
            (CallShape::ResultError, call)
        }
        [receiver, logger, attr, call]
            if is_name(receiver, SELF_RECEIVER) && attr_name(logger).as_deref() == Some(LOGGER_ATTR) =>
        {
            let method = attr_name(attr).and_then(|name| LoggerMethod::from_name(&name))?;
            (CallShape::LoggerError { method }, call)
        }
        _ => return None,
    };

    let call = call
        .as_node()
        .filter(|n| n.kind() == PySyntaxKind::CallTrailer)?
        .clone();
    let args = match_arguments(&call)?;

    Some(ErrorCallMatch {
        target: node.clone(),
        call,
        shape,
        args,
    })
}

fn is_name(element: &PySyntaxElement, expected: &str) -> bool {
    element
        .as_node()
        .filter(|n| n.kind() == PySyntaxKind::Name)
        .and_then(|n| n.first_token())
        .is_some_and(|token| token.kind() == PySyntaxKind::Ident && token.text() == expected)
}

/// Identifier of a `.name` trailer
fn attr_name(element: &PySyntaxElement) -> Option<String> {
    let trailer = element
        .as_node()
        .filter(|n| n.kind() == PySyntaxKind::AttrTrailer)?;
    match significant_children(trailer).collect::<Vec<_>>().as_slice() {
        [dot, ident] if dot.kind() == PySyntaxKind::Dot && ident.kind() == PySyntaxKind::Ident => {
            ident.as_token().map(|token| token.text().to_string())
        }
        _ => None,
    }
}

fn match_arguments(call: &PySyntaxNode) -> Option<MatchedArgs> {
    let children: Vec<PySyntaxElement> = significant_children(call).collect();
    let arg_list = match children.as_slice() {
        [lparen, rparen]
            if lparen.kind() == PySyntaxKind::LParen && rparen.kind() == PySyntaxKind::RParen =>
        {
            return Some(MatchedArgs::Empty);
        }
        [lparen, args, rparen]
            if lparen.kind() == PySyntaxKind::LParen
                && args.kind() == PySyntaxKind::ArgList
                && rparen.kind() == PySyntaxKind::RParen =>
        {
            args.as_node()?.clone()
        }
        _ => return None,
    };

    match significant_children(&arg_list).collect::<Vec<_>>().as_slice() {
        [arg_1] if is_positional(arg_1) => Some(MatchedArgs::One {
            arg_1: arg_1.clone(),
        }),
        [arg_1, comma, arg_2]
            if comma.kind() == PySyntaxKind::Comma && is_positional(arg_1) && is_positional(arg_2) =>
        {
            Some(MatchedArgs::Two {
                arg_1: arg_1.clone(),
                arg_2: arg_2.clone(),
            })
        }
        _ => None,
    }
}

/// Plain expressions and `*iterable` unpacking are positional. Keyword
/// arguments, `**mapping` and bare generator arguments are not.
fn is_positional(element: &PySyntaxElement) -> bool {
    let Some(node) = element.as_node() else {
        return false;
    };
    if node.kind() != PySyntaxKind::Argument {
        return true;
    }
    significant_children(node)
        .next()
        .is_some_and(|first| first.kind() == PySyntaxKind::Star)
}

#[cfg(test)]
mod tests {
    use super::*;
    use errfix_core::cst::parse_python;

    fn matches(source: &str) -> Vec<ErrorCallMatch> {
        let parse = parse_python(source);
        assert!(parse.ok(), "errors for {source:?}: {:?}", parse.errors());
        parse
            .syntax()
            .descendants()
            .filter_map(|node| match_error_call(&node))
            .collect()
    }

    fn arity(source: &str) -> Option<usize> {
        let found = matches(source);
        assert!(found.len() <= 1, "{source:?} matched {} times", found.len());
        found.first().map(|m| m.args.len())
    }

    #[test]
    fn test_result_error_arities() {
        assert_eq!(arity("result.error()\n"), Some(0));
        assert_eq!(arity("result.error('boom')\n"), Some(1));
        assert_eq!(arity("result.error(12, 'boom')\n"), Some(2));
        assert_eq!(arity("result.error(1, 2, 3)\n"), None);
    }

    #[test]
    fn test_logger_methods() {
        let found = matches("self.logger.error('a')\nself.logger.user_error('b')\n");
        let shapes: Vec<_> = found.iter().map(|m| m.shape).collect();
        assert_eq!(
            shapes,
            vec![
                CallShape::LoggerError {
                    method: LoggerMethod::Error
                },
                CallShape::LoggerError {
                    method: LoggerMethod::UserError
                },
            ]
        );
        assert_eq!(shapes[1].to_string(), "self.logger.user_error");
    }

    #[test]
    fn test_other_receivers_and_methods_do_not_match() {
        for source in [
            "results.error('x')\n",
            "result.warning('x')\n",
            "Result.error('x')\n",
            "self.logger.info('x')\n",
            "self.log.error('x')\n",
            "logger.error('x')\n",
            "self.result.error('x')\n",
            "result.error\n",
            "result['error']('x')\n",
        ] {
            assert_eq!(arity(source), None, "{source:?}");
        }
    }

    #[test]
    fn test_extra_trailers_and_prefixes_do_not_match() {
        for source in [
            "result.error('x')()\n",
            "result.error('x').strip()\n",
            "result.error('x')[0]\n",
            "result.error('x') ** 2\n",
            "async def f():\n    await result.error('x')\n",
        ] {
            assert_eq!(arity(source), None, "{source:?}");
        }
    }

    #[test]
    fn test_argument_kinds() {
        assert_eq!(arity("result.error(message='x')\n"), None);
        assert_eq!(arity("result.error(1, message='x')\n"), None);
        assert_eq!(arity("result.error(**kw)\n"), None);
        assert_eq!(arity("result.error(1, **kw)\n"), None);
        assert_eq!(arity("result.error(x for x in y)\n"), None);
        assert_eq!(arity("result.error(*parts)\n"), Some(1));
        assert_eq!(arity("result.error(code, *parts)\n"), Some(2));
    }

    #[test]
    fn test_trailing_comma_does_not_match() {
        assert_eq!(arity("result.error('x',)\n"), None);
        assert_eq!(arity("result.error(1, 'x',)\n"), None);
    }

    #[test]
    fn test_formatting_is_ignored() {
        let source = "result . error (  # why\n    7 ,\n    'x'\n)\n";
        assert_eq!(arity(source), Some(2));
        assert_eq!(arity("self.logger \\\n    .error('x')\n"), Some(1));
    }

    #[test]
    fn test_bindings() {
        let found = matches("result.error(12, 'boom')\n");
        let MatchedArgs::Two { arg_1, arg_2 } = &found[0].args else {
            panic!("expected two arguments");
        };
        assert_eq!(arg_1.kind(), PySyntaxKind::Literal);
        assert_eq!(arg_2.kind(), PySyntaxKind::StringLiteral);
        assert_eq!(found[0].target.to_string(), "result.error(12, 'boom')");
    }

    #[test]
    fn test_nested_calls_match_separately() {
        let found = matches("f(result.error('a'), self.logger.error(result.error()))\n");
        let arities: Vec<_> = found.iter().map(|m| m.args.len()).collect();
        assert_eq!(arities, vec![1, 1, 0]);
    }
}
