//! The two expression shapes.
//!
//! Operand fragments may span several lines (spliced saved events); they are
//! inserted as-is. Several lines end in a space, and golden output depends on
//! it, so the layouts are spelled out with explicit `\n`.

/// `π_{ cols } ( σ_{ predicate } ( op1 OPERATOR op2 ) )`
pub fn render_relational(
    projection: &str,
    predicate: &str,
    op1: &str,
    operator: &str,
    op2: &str,
) -> String {
    format!(
        "π_{{ {projection} }} (\n  σ_{{ {predicate} }} (\n    {op1} \n    {operator} \n    {op2}\n  ) \n)"
    )
}

/// `π_{ cols } ( (op1) MINUS (op2) WHERE predicate )`
pub fn render_exclusion(projection: &str, predicate: &str, op1: &str, op2: &str) -> String {
    format!(
        "π_{{ {projection} }} (\n  ( \n    {op1} \n  ) \n  MINUS \n  ( \n    {op2} \n  ) \n  WHERE {predicate}\n)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relational_layout() {
        let text = render_relational("M1.sf AS sf", "True", "σ_{ pred=\"a\" }(M1)", "Bef_{δ=d}", "σ_{ pred=\"b\" }(M2)");
        assert_eq!(
            text,
            "π_{ M1.sf AS sf } (\n  σ_{ True } (\n    σ_{ pred=\"a\" }(M1) \n    Bef_{δ=d} \n    σ_{ pred=\"b\" }(M2)\n  ) \n)"
        );
    }

    #[test]
    fn exclusion_layout() {
        let text = render_exclusion("M1.sf AS sf", "M1.arg1 = M2.arg1", "A(M1)", "B(M2)");
        assert_eq!(
            text,
            "π_{ M1.sf AS sf } (\n  ( \n    A(M1) \n  ) \n  MINUS \n  ( \n    B(M2) \n  ) \n  WHERE M1.arg1 = M2.arg1\n)"
        );
    }
}
