//! Google Cloud secret rules.

crate::declare_pack!(
    GooglePack,
    id: "google",
    name: "Google Cloud",
    rules: [
        crate::rule! {
            id: "google/api-key",
            description: "Google API key; scope depends on the enabled services.",
            kind: RuleKindDef::Regex { regex: r"\b(AIza[0-9A-Za-z_\-]{35})\b" },
            keywords: &["AIza"],
            min_entropy: Some(3.0),
            tags: &["cloud", "google"],
            severity: Severity::High,
        },
        crate::rule! {
            id: "google/oauth-client-secret",
            description: "Google OAuth client secret.",
            kind: RuleKindDef::Regex { regex: r"\b(GOCSPX-[0-9A-Za-z_\-]{28})\b" },
            keywords: &["GOCSPX-"],
            min_entropy: Some(3.0),
            tags: &["cloud", "google"],
            severity: Severity::High,
        },
    ],
);
