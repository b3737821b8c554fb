//! Stripe secret rules.

crate::declare_pack!(
    StripePack,
    id: "stripe",
    name: "Stripe",
    rules: [
        crate::rule! {
            id: "stripe/live-secret-key",
            description: "Stripe live-mode secret key with full charge and refund access.",
            kind: RuleKindDef::Regex { regex: r"\b(sk_live_[A-Za-z0-9]{24,99})\b" },
            keywords: &["sk_live_"],
            min_entropy: Some(3.0),
            tags: &["payments", "stripe"],
            severity: Severity::Critical,
        },
        crate::rule! {
            id: "stripe/test-secret-key",
            description: "Stripe test-mode secret key; harmless to money but still an API credential.",
            kind: RuleKindDef::Regex { regex: r"\b(sk_test_[A-Za-z0-9]{24,99})\b" },
            keywords: &["sk_test_"],
            min_entropy: Some(3.0),
            tags: &["payments", "stripe"],
            severity: Severity::Low,
        },
        crate::rule! {
            id: "stripe/restricted-key",
            description: "Stripe restricted API key.",
            kind: RuleKindDef::Regex { regex: r"\b(rk_live_[A-Za-z0-9]{24,99})\b" },
            keywords: &["rk_live_"],
            min_entropy: Some(3.0),
            tags: &["payments", "stripe"],
            severity: Severity::High,
        },
    ],
);
