//! User input sanitization.
//!
//! Every user-supplied string is stripped of characters that carry meaning in
//! document-store query syntax before it reaches a query.

/// Characters removed from user input.
pub const BLOCKLIST: [char; 7] = ['\'', '"', '\\', ';', '{', '}', '$'];

/// Remove every blocklisted character from `input`.
pub fn sanitize(input: &str) -> String {
    tracing::debug!(input = %input, "Escaping user input string");
    input.chars().filter(|c| !BLOCKLIST.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_blocklist() {
        assert_eq!(sanitize(r#"{"$where": "1;"}"#), "where: 1");
        assert_eq!(sanitize(r"a\b'c"), "abc");
        assert_eq!(sanitize("vanilla"), "vanilla");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_idempotent_and_total() {
        let samples = [
            "",
            "plain",
            "$$$",
            r#"'";\{}$"#,
            "mixed $ content; with {braces} and \"quotes\"",
            "unicode — ünïcödé $",
        ];
        for s in samples {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once);
            assert!(!once.chars().any(|c| BLOCKLIST.contains(&c)));
        }
    }

    #[test]
    fn test_exhaustive_ascii() {
        let all: String = (0u8..128).map(char::from).collect();
        let clean = sanitize(&all);
        assert_eq!(clean.chars().count(), 128 - BLOCKLIST.len());
        assert_eq!(sanitize(&clean), clean);
    }
}
