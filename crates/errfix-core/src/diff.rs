//! Review diffs for rewritten sources
//!
//! The diff is meant for a human skimming many files: no context lines, and
//! every emitted line has its whitespace runs collapsed so indentation noise
//! does not hide the edited call.

use similar::{ChangeTag, TextDiff};

const BEFORE_HEADER: &str = "--- Before Fix";
const AFTER_HEADER: &str = "+++ After Fix";

/// Zero-context unified diff between `original` and `modified`
///
/// Returns an empty string when the inputs are identical.
pub fn review_diff(original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }

    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();
    output.push_str(BEFORE_HEADER);
    output.push('\n');
    output.push_str(AFTER_HEADER);
    output.push('\n');

    for group in diff.grouped_ops(0) {
        let Some(first) = group.first() else {
            continue;
        };
        let old_line = first.old_range().start;
        let new_line = first.new_range().start;
        let old_len = group.iter().map(|op| op.old_range().len()).sum::<usize>();
        let new_len = group.iter().map(|op| op.new_range().len()).sum::<usize>();

        output.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            old_line + 1,
            old_len,
            new_line + 1,
            new_len
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => continue,
                };
                output.push_str(&collapse_whitespace(&format!("{sign}{}", change.value())));
                output.push('\n');
            }
        }
    }

    output
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_inputs() {
        assert_eq!(review_diff("a\nb\n", "a\nb\n"), "");
    }

    #[test]
    fn test_single_line_change() {
        let original = "a = 1\nresult.error('x')\nb = 2\n";
        let modified = "a = 1\nresult.error(101, 'x')\nb = 2\n";
        insta::assert_snapshot!(review_diff(original, modified), @r"
        --- Before Fix
        +++ After Fix
        @@ -2,1 +2,1 @@
        -result.error('x')
        +result.error(101, 'x')
        ");
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let original = "if x:\n    result.error(  'x')\n";
        let modified = "if x:\n    result.error(7,   'x')\n";
        let diff = review_diff(original, modified);
        assert!(diff.contains("\n- result.error( 'x')\n"), "{diff}");
        assert!(diff.contains("\n+ result.error(7, 'x')\n"), "{diff}");
    }

    #[test]
    fn test_separate_hunks() {
        let original = "f()\nx\ny\nf()\n";
        let modified = "f(1)\nx\ny\nf(2)\n";
        let diff = review_diff(original, modified);
        assert_eq!(diff.matches("@@ -").count(), 2, "{diff}");
        assert!(diff.contains("@@ -4,1 +4,1 @@"));
    }
}
