//! Slack secret rules.

crate::declare_pack!(
    SlackPack,
    id: "slack",
    name: "Slack",
    rules: [
        crate::rule! {
            id: "slack/token",
            description: "Slack bot, user, app, or legacy workspace token.",
            kind: RuleKindDef::Regex { regex: r"\b(xox[baprs]-[A-Za-z0-9\-]{10,48})\b" },
            keywords: &["xoxb-", "xoxa-", "xoxp-", "xoxr-", "xoxs-"],
            min_entropy: Some(3.0),
            tags: &["messaging", "slack"],
            severity: Severity::High,
        },
        crate::rule! {
            id: "slack/webhook-url",
            description: "Slack incoming webhook URL allowing message posting to a channel.",
            kind: RuleKindDef::Regex {
                regex: r"(https://hooks\.slack\.com/services/T[A-Za-z0-9]{8,12}/B[A-Za-z0-9]{8,12}/[A-Za-z0-9]{24})",
            },
            keywords: &["hooks.slack.com"],
            min_entropy: None,
            tags: &["messaging", "slack"],
            severity: Severity::Medium,
        },
    ],
);
