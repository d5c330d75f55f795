//! Whole-string regex matching for parameter names.

use modelforge_core::ConfigError;
use regex::Regex;

/// Compile `pattern` so that it must match an entire string.
///
/// Configuration patterns are written as whole-string matches, so an
/// unanchored `abc` does not match `xabcx`.
pub fn full_match(pattern: &str) -> crate::Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|err| ConfigError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", "abc", true)]
    #[case("abc", "xabcx", false)]
    #[case("a|b", "b", true)]
    #[case("a|b", "ab", false)]
    #[case("rule\\d+", "rule12", true)]
    fn anchors_both_ends(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
        assert_eq!(full_match(pattern).unwrap().is_match(input), expected);
    }

    #[test]
    fn rejects_invalid_pattern() {
        let err = full_match("(unclosed").unwrap_err();
        assert_eq!(err.code(), "CFG_PATTERN_INVALID");
    }
}
