//! Shared formatting for user-facing errors and warnings.

use std::fmt::Display;

/// Prefix a message so errors read the same from every layer.
pub fn error_message(msg: impl Display) -> String {
    format!("iseql: {}", msg)
}

/// Report a recovered condition. Compilation carries on.
pub fn warn(msg: impl Display) {
    tracing::warn!("{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_prefixed() {
        assert_eq!(error_message("missing name"), "iseql: missing name");
        assert_eq!(error_message(format!("bad {}", 3)), "iseql: bad 3");
    }
}
