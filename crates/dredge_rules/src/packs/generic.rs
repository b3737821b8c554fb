//! Generic heuristic rules: context-keyword proximity and entropy windows.

crate::declare_pack!(
    GenericPack,
    id: "generic",
    name: "Generic Secrets",
    rules: [
        crate::rule! {
            id: "generic/password-assignment",
            description: "Hardcoded password assigned near a password-like variable name.",
            kind: RuleKindDef::KeywordProximity {
                regex: r#"['"`]([^\s'"`]{8,120})['"`]"#,
                near: &["password", "passwd", "pwd"],
                max_distance: 32,
            },
            keywords: &["password", "passwd", "pwd"],
            min_entropy: Some(3.5),
            tags: &["generic"],
            severity: Severity::Medium,
        },
        crate::rule! {
            id: "generic/api-key-assignment",
            description: "Hardcoded token assigned near an api-key-like variable name.",
            kind: RuleKindDef::KeywordProximity {
                regex: r#"['"`]([A-Za-z0-9_\-/+=.]{16,120})['"`]"#,
                near: &["api_key", "apikey", "api-key", "secret_key", "access_token"],
                max_distance: 32,
            },
            keywords: &["api_key", "apikey", "api-key", "secret_key", "access_token"],
            min_entropy: Some(3.5),
            tags: &["generic"],
            severity: Severity::Medium,
        },
        crate::rule! {
            id: "generic/high-entropy-string",
            description: "High-entropy span caught by sliding-window analysis; format unrecognized.",
            kind: RuleKindDef::Entropy,
            keywords: &[],
            min_entropy: Some(4.5),
            tags: &["generic", "entropy"],
            severity: Severity::Low,
        },
    ],
);

#[cfg(test)]
mod extra_tests {
    use regex::Regex;

    #[test]
    fn password_token_regex_captures_quoted_value() {
        let re = Regex::new(r#"['"`]([^\s'"`]{8,120})['"`]"#).unwrap();
        let m = re.captures(r#"db_password = "a8Kj2mNx9pQ4rT7v""#).unwrap();
        assert_eq!(m.get(1).unwrap().as_str(), "a8Kj2mNx9pQ4rT7v");
    }

    #[test]
    fn password_token_regex_rejects_short_values() {
        let re = Regex::new(r#"['"`]([^\s'"`]{8,120})['"`]"#).unwrap();
        assert!(!re.is_match(r#"pwd = "short""#));
    }
}
