//! Positional leaves (`M1`, `M2`, ...) and the text rewrites over them.
//!
//! Stored algebra is never parsed back into a tree: splicing a saved event
//! in only needs the largest leaf index it uses and a one-pass renumbering.

use crate::Result;

use regex::{Captures, Regex};

pub const LEAF_PREFIX: char = 'M';

/// Symbolic roots for "operand 1" and "operand 2" in constraints and projections.
pub const OP1_ROOT: &str = "M1";
pub const OP2_ROOT: &str = "M2";

/// Largest leaf index stored algebra may use. Anything above is treated as
/// malformed rather than allocated.
pub const MAX_LEAF_INDEX: usize = 1 << 20;

// A filter literal (`arg1="M9"`) is matched first and left alone. Leaves are
// whole tokens only: `ROM12` and `M1x` are not leaves.
const LEAF_RE: &str = r#"="[^"]*"|\bM(\d+)\b"#;

pub fn leaf(index: usize) -> String {
    format!("{}{}", LEAF_PREFIX, index)
}

/// Finds and renumbers the leaves of stored algebra.
#[derive(Debug, Clone)]
pub struct LeafPattern {
    re: Regex,
}

impl LeafPattern {
    pub fn new() -> Result<Self> {
        let re = Regex::new(LEAF_RE)?;
        Ok(Self { re })
    }

    /// Largest leaf index in `text`, or `None` when it has no leaves.
    /// Indices too long for `usize` count as `usize::MAX`.
    pub fn max_leaf(&self, text: &str) -> Option<usize> {
        self.re
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX))
            .max()
    }

    /// Add `shift` to every leaf index. Each replacement is computed from the
    /// index captured in the original text, so a rewritten `M3` is never
    /// shifted again. A leaf whose new index would not fit is left as it was.
    pub fn shift(&self, text: &str, shift: usize) -> String {
        if shift == 0 {
            return text.to_string();
        }
        self.re
            .replace_all(text, |caps: &Captures| {
                let shifted = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse::<usize>().ok())
                    .and_then(|n| n.checked_add(shift));
                match shifted {
                    Some(n) => leaf(n),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Rewrite a symbolic variable onto global leaf indices.
///
/// `M1` / `M1.field` move to operand 1's start, `M2` / `M2.field` to operand
/// 2's. Anything else (`M10.arg1`, `"M1.arg1"`, `GivesKeys.who`) is returned
/// unchanged.
pub fn remap_var(var: &str, op1_start: usize, op2_start: usize) -> String {
    let (root, rest) = match var.find('.') {
        Some(dot) => var.split_at(dot),
        None => (var, ""),
    };
    let start = match root {
        OP1_ROOT => op1_start,
        OP2_ROOT => op2_start,
        _ => return var.to_string(),
    };
    format!("{}{}", leaf(start), rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaves() -> LeafPattern {
        LeafPattern::new().unwrap()
    }

    #[test]
    fn max_leaf_ignores_partial_tokens() {
        let l = leaves();
        assert_eq!(l.max_leaf("σ_{ pred=\"x\" }(M1) Bef_{δ=d} (M12)"), Some(12));
        assert_eq!(l.max_leaf("ROM99 and M7x"), None);
        assert_eq!(l.max_leaf("True"), None);
    }

    #[test]
    fn filter_literals_are_not_leaves() {
        let l = leaves();
        let text = "σ_{ pred=\"M4\" ∧ arg1=\"M9\" }(M1)";
        assert_eq!(l.max_leaf(text), Some(1));
        assert_eq!(l.shift(text, 2), "σ_{ pred=\"M4\" ∧ arg1=\"M9\" }(M3)");
    }

    #[test]
    fn quoted_aliases_are_still_renumbered() {
        let l = leaves();
        assert_eq!(
            l.shift("π_{ M1.arg1 AS \"M1.arg1\" } (M1)", 1),
            "π_{ M2.arg1 AS \"M2.arg1\" } (M2)"
        );
    }

    #[test]
    fn shift_does_not_cascade() {
        // A naive replace-one-then-the-next would turn M1 into M3 into M5.
        let l = leaves();
        let text = "(M1) X (M2) Y (M3) M1.sf";
        assert_eq!(l.shift(text, 2), "(M3) X (M4) Y (M5) M3.sf");
        assert_eq!(l.shift(text, 0), text);
    }

    #[test]
    fn huge_indices_do_not_overflow() {
        let l = leaves();
        let max = format!("(M{})", usize::MAX);
        assert_eq!(l.max_leaf(&max), Some(usize::MAX));
        assert_eq!(l.shift(&max, 1), max);

        let beyond = "(M99999999999999999999999999) (M1)";
        assert_eq!(l.max_leaf(beyond), Some(usize::MAX));
        assert_eq!(l.shift(beyond, 1), "(M99999999999999999999999999) (M2)");
    }

    #[test]
    fn remap_bare_and_dotted() {
        assert_eq!(remap_var("M1", 1, 4), "M1");
        assert_eq!(remap_var("M2", 1, 4), "M4");
        assert_eq!(remap_var("M2.arg1", 1, 4), "M4.arg1");
        assert_eq!(remap_var("M1.sf", 3, 4), "M3.sf");
    }

    #[test]
    fn remap_leaves_other_names_alone() {
        assert_eq!(remap_var("M21.arg1", 1, 4), "M21.arg1");
        assert_eq!(remap_var("M2x", 1, 4), "M2x");
        assert_eq!(remap_var("\"M2.arg1\"", 1, 4), "\"M2.arg1\"");
        assert_eq!(remap_var("GivesKeys.who", 1, 4), "GivesKeys.who");
        assert_eq!(remap_var("", 1, 4), "");
    }
}
