//! Test case classname formatting

use regex::Regex;
use std::sync::LazyLock;

static LETTERS_THEN_DIGITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)(\d+)").expect("classname pattern is a valid regex")
});

/// Format a classname as `"<LETTERS> <digits>"`.
///
/// Only a leading run of letters followed by a run of digits is recognised;
/// anything after the digits is dropped. Classnames that do not start that
/// way are upper-cased whole.
pub fn format_classname(classname: &str) -> String {
    match LETTERS_THEN_DIGITS.captures(classname) {
        Some(caps) => format!("{} {}", caps[1].to_uppercase(), &caps[2]),
        None => classname.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("LOGIN123", "LOGIN 123")]
    #[case("login123", "LOGIN 123")]
    #[case("abc", "ABC")]
    #[case("AB12CD34", "AB 12")]
    #[case("123abc", "123ABC")]
    #[case("Get users", "GET USERS")]
    #[case("", "")]
    fn test_format_classname(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_classname(input), expected);
    }
}
