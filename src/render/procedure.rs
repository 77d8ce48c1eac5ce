/// Wrap a compiled expression into a plpgsql function definition.
///
/// Plain placeholder replacement rather than `format!()`: the body is mostly
/// literal text and the expression itself is full of `{}`.
pub fn render_procedure(name: &str, signature: &str, expression: &str) -> String {
    // Line by line, trailing spaces included. The expression starts on a
    // line of its own after an indented blank one.
    const TEMPLATE: &str = concat!(
        "-- ISEQL Definition for __NAME__\n",
        "CREATE OR REPLACE FUNCTION __NAME__ (source VARCHAR) \n",
        "RETURNS TABLE (__SIGNATURE__) AS $$\n",
        "BEGIN\n",
        "    RETURN QUERY \n",
        "    SELECT * FROM \n",
        "    \n",
        "__EXPRESSION__;\n",
        "END;\n",
        "$$ LANGUAGE plpgsql;",
    );

    // Expression last, so nothing inside it is mistaken for a placeholder.
    TEMPLATE
        .replace("__NAME__", name)
        .replace("__SIGNATURE__", signature)
        .replace("__EXPRESSION__", expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_expression() {
        let text = render_procedure("E", "sf integer, ef integer", "X(M1)");
        assert_eq!(
            text,
            "-- ISEQL Definition for E\n\
             CREATE OR REPLACE FUNCTION E (source VARCHAR) \n\
             RETURNS TABLE (sf integer, ef integer) AS $$\n\
             BEGIN\n    RETURN QUERY \n    SELECT * FROM \n    \nX(M1);\n\
             END;\n$$ LANGUAGE plpgsql;"
        );
    }
}
