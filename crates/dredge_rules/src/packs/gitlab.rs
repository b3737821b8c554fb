//! GitLab secret rules.

crate::declare_pack!(
    GitlabPack,
    id: "gitlab",
    name: "GitLab",
    rules: [
        crate::rule! {
            id: "gitlab/personal-access-token",
            description: "GitLab personal access token granting API and repository access.",
            kind: RuleKindDef::Regex { regex: r"\b(glpat-[A-Za-z0-9_\-]{20,22})\b" },
            keywords: &["glpat-"],
            min_entropy: Some(3.0),
            tags: &["vcs", "gitlab"],
            severity: Severity::Critical,
        },
        crate::rule! {
            id: "gitlab/pipeline-trigger-token",
            description: "GitLab pipeline trigger token.",
            kind: RuleKindDef::Regex { regex: r"\b(glptt-[0-9a-f]{40})\b" },
            keywords: &["glptt-"],
            min_entropy: Some(3.0),
            tags: &["vcs", "gitlab"],
            severity: Severity::Medium,
        },
        crate::rule! {
            id: "gitlab/runner-registration-token",
            description: "GitLab runner registration token.",
            kind: RuleKindDef::Regex { regex: r"\b(GR1348941[A-Za-z0-9_\-]{20})\b" },
            keywords: &["GR1348941"],
            min_entropy: Some(3.0),
            tags: &["vcs", "gitlab"],
            severity: Severity::Medium,
        },
    ],
);
