//! Output formatters for scan results and rule listings.

use serde::Serialize;

use dredge_core::prelude::*;

/// Serialized shape of one finding in JSON output.
#[derive(Serialize)]
struct JsonFinding<'a> {
    id: &'a str,
    unit: &'a str,
    line: u32,
    column: u32,
    rule_id: &'a str,
    severity: String,
    confidence: Confidence,
    secret: &'a str,
    entropy: Option<f64>,
    tags: &'a [Box<str>],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    findings: Vec<JsonFinding<'a>>,
    unit_errors: Vec<JsonUnitError<'a>>,
    status: &'static str,
}

#[derive(Serialize)]
struct JsonUnitError<'a> {
    unit: &'a str,
    error: String,
}

/// Renders a report as pretty-printed JSON.
pub fn render_json(report: &ScanReport) -> anyhow::Result<String> {
    let json = JsonReport {
        findings: report
            .findings
            .iter()
            .map(|f| JsonFinding {
                id: f.id.as_str(),
                unit: &f.unit_id,
                line: f.span.line,
                column: f.span.column,
                rule_id: &f.rule_id,
                severity: f.severity.to_string(),
                confidence: f.confidence,
                secret: f.secret.redacted(),
                entropy: f.entropy,
                tags: &f.tags,
            })
            .collect(),
        unit_errors: report
            .unit_errors
            .iter()
            .map(|(unit, error)| JsonUnitError {
                unit,
                error: error.to_string(),
            })
            .collect(),
        status: status_label(report.status),
    };

    let mut rendered = serde_json::to_string_pretty(&json)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Renders a report as human-readable text, one finding per line.
#[must_use]
pub fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();

    for finding in &report.findings {
        out.push_str(&finding.to_string());
        out.push('\n');
    }

    for (unit, error) in &report.unit_errors {
        out.push_str(&format!("warning: {unit}: {error}\n"));
    }

    match report.status {
        ScanStatus::Cancelled => out.push_str("scan cancelled; results are partial\n"),
        ScanStatus::Completed => {
            if report.findings.is_empty() {
                out.push_str("no secrets found\n");
            } else {
                out.push_str(&format!("{} secret(s) found\n", report.findings.len()));
            }
        }
    }

    out
}

/// Prints the message shown when file collection produced nothing.
pub fn print_no_files() {
    println!("no files to scan");
}

/// Prints the builtin rule listing, optionally filtered by pack prefix.
pub fn print_rules(pack: Option<&str>, verbose: bool) -> anyhow::Result<()> {
    let rules = RuleSet::builtin()?;

    for rule in rules.rules() {
        let pack_id = rule.id.split('/').next().unwrap_or_default();
        if pack.is_some_and(|p| p != pack_id) {
            continue;
        }

        if verbose {
            let tags = rule.tags.join(", ");
            println!("{}  [{}]  {}  ({})", rule.id, rule.severity, rule.description, tags);
        } else {
            println!("{}", rule.id);
        }
    }

    Ok(())
}

const fn status_label(status: ScanStatus) -> &'static str {
    match status {
        ScanStatus::Completed => "completed",
        ScanStatus::Cancelled => "cancelled",
    }
}
