//! Team-name normalization for cross-dataset joins.
//!
//! Every supplemental dataset spells team names slightly differently
//! ("Penn St." vs "Penn State", "Texas A&M" vs "texas a&m"). The normalized
//! key is the only thing the fusion engine joins on.
//!
//! There is no alias table: semantically identical teams with different
//! spellings (abbreviations in particular) do not match.

/// Canonicalize a team name into a join key.
///
/// Rules, applied in order:
/// 1. absent or empty input yields an empty key
/// 2. lower-case
/// 3. replace every `&` with the letters `and` (plain substitution, so
///    `"Texas A&M"` becomes `"texas aandm"`)
/// 4. remove every `.`
/// 5. trim leading and trailing whitespace
///
/// The function is idempotent.
pub fn normalize<S: AsRef<str>>(name: Option<S>) -> String {
    match name {
        Some(name) => normalize_str(name.as_ref()),
        None => String::new(),
    }
}

/// Canonicalize a present team name. See [`normalize`].
pub fn normalize_str(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    name.to_lowercase()
        .replace('&', "and")
        .replace('.', "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ohio State", "ohio state")]
    #[case("Penn St.", "penn st")]
    #[case("Texas A&M", "texas aandm")]
    #[case("  Miami (OH) ", "miami (oh)")]
    #[case("U.T.S.A.", "utsa")]
    #[case("", "")]
    #[case(" . ", "")]
    fn test_normalize_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(Some(input)), expected);
    }

    #[test]
    fn test_ampersand_is_plain_substitution() {
        // Lower-case first, then substitute in place: no spaces are inserted.
        assert_eq!(normalize(Some("Texas A&M")), "texas aandm");
        assert_ne!(normalize(Some("Texas A&M")), "texas a and m");
    }

    #[test]
    fn test_absent_name() {
        assert_eq!(normalize::<&str>(None), "");
    }

    #[rstest]
    #[case("Texas A&M")]
    #[case("Penn St.")]
    #[case("  Hawai'i  ")]
    #[case("ÉCOLE St. & Co.")]
    #[case("")]
    #[case("   ")]
    #[case("a . &")]
    fn test_idempotent(#[case] input: &str) {
        let once = normalize_str(input);
        assert_eq!(normalize_str(&once), once);
    }

    #[test]
    fn test_abbreviations_do_not_match() {
        assert_ne!(normalize(Some("Penn St.")), normalize(Some("Penn State")));
    }
}
