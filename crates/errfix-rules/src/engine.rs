//! Whole-file rewriting

use errfix_core::cst::{PySyntaxNode, parse_python};
use errfix_core::{ErrfixError, Result};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::matcher::match_error_call;
use crate::rewrite::{AppliedFix, apply_error_code};
use crate::series::ErrorSeries;

/// Options for [`ErrorNumberFixer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixerOptions {
    /// Strip a margin of indentation shared by every non-blank line
    pub dedent: bool,
}

impl Default for FixerOptions {
    fn default() -> Self {
        Self { dedent: true }
    }
}

/// Result of rewriting one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Text as it was read
    pub original: String,
    /// Rewritten text
    pub output: String,
    /// One record per rewritten call, in traversal order
    pub fixes: Vec<AppliedFix>,
}

impl FixOutcome {
    pub fn is_changed(&self) -> bool {
        self.original != self.output
    }
}

/// Renumbers every recognized error call in a source text
#[derive(Debug, Clone, Default)]
pub struct ErrorNumberFixer {
    options: FixerOptions,
}

impl ErrorNumberFixer {
    pub fn new(options: FixerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> FixerOptions {
        self.options
    }

    /// Rewrite `source`, drawing codes from `series`
    ///
    /// Any lexer or parser error aborts the rewrite before anything changes.
    pub fn fix_source(&self, source: &str, series: &mut dyn ErrorSeries) -> Result<FixOutcome> {
        let text = if self.options.dedent {
            dedent(source)
        } else {
            Cow::Borrowed(source)
        };

        let tree = parse_python(&text).into_result(&text)?.clone_for_update();
        let fixes = rewrite_tree(&tree, series)?;

        Ok(FixOutcome {
            original: source.to_string(),
            output: tree.to_string(),
            fixes,
        })
    }

    /// Read `path` and rewrite it. Parse errors name the file.
    pub fn fix_file(&self, path: &Path, series: &mut dyn ErrorSeries) -> Result<FixOutcome> {
        let source =
            fs::read_to_string(path).map_err(|e| ErrfixError::io_error("read", path, e))?;
        let outcome = self
            .fix_source(&source, series)
            .map_err(|e| e.with_origin(path))?;
        info!(
            "{}: {} call(s) renumbered",
            path.display(),
            outcome.fixes.len()
        );
        Ok(outcome)
    }
}

/// Pre-order walk that rewrites each match before descending into it
fn rewrite_tree(root: &PySyntaxNode, series: &mut dyn ErrorSeries) -> Result<Vec<AppliedFix>> {
    let mut fixes = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if let Some(found) = match_error_call(&node) {
            fixes.push(apply_error_code(found, series)?);
        }
        let children: Vec<PySyntaxNode> = node.children().collect();
        stack.extend(children.into_iter().rev());
    }

    debug!("Rewrote {} call(s)", fixes.len());
    Ok(fixes)
}

/// Remove the leading whitespace shared by every non-blank line
///
/// Whitespace-only lines are emptied when a margin is removed. Without a
/// margin the text is returned untouched.
fn dedent(text: &str) -> Cow<'_, str> {
    let mut margin: Option<&str> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }

    let margin = margin.unwrap_or_default();
    if margin.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut dedented = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            let body = line.trim_end_matches(['\r', '\n']);
            dedented.push_str(&line[body.len()..]);
        } else {
            dedented.push_str(line.strip_prefix(margin).unwrap_or(line));
        }
    }
    Cow::Owned(dedented)
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::LocalSeries;

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("    a\n      b\n"), "a\n  b\n");
        assert_eq!(dedent("    a\n  \n    b\n"), "a\n\nb\n");
        assert_eq!(dedent("\ta\n  b\n"), "\ta\n  b\n");
    }

    #[test]
    fn test_dedent_without_margin_is_identity() {
        let source = "a\n   \n    b\n";
        assert!(matches!(dedent(source), Cow::Borrowed(s) if s == source));
        assert!(matches!(dedent(""), Cow::Borrowed("")));
    }

    #[test]
    fn test_dedent_option() {
        let source = "  result.error('x')\n";
        let mut series = LocalSeries::new(0);
        let outcome = ErrorNumberFixer::default()
            .fix_source(source, &mut series)
            .unwrap();
        assert_eq!(outcome.output, "result.error(1, 'x')\n");

        // an indented first line is a syntax error without dedenting
        let fixer = ErrorNumberFixer::new(FixerOptions { dedent: false });
        let err = fixer.fix_source(source, &mut series).unwrap_err();
        assert_eq!(err.kind(), errfix_core::ErrorKind::Parse);
    }

    #[test]
    fn test_parse_error_leaves_counter_alone() {
        let mut series = LocalSeries::new(7);
        let err = ErrorNumberFixer::default()
            .fix_source("result.error('x')\nresult.error(\n", &mut series)
            .unwrap_err();
        assert_eq!(err.kind(), errfix_core::ErrorKind::Parse);
        assert_eq!(series.current(), 7);
    }
}
