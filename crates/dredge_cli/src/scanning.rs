//! The `scan` command: engine construction and batch driving.

use std::path::PathBuf;

use anyhow::Context as _;
use dredge_core::prelude::*;

use crate::files::{collect_files, read_file_bytes};
use crate::{OutputFormat, ScanArgs, output};

/// Exit code when the scan completes without findings.
const EXIT_CLEAN: i32 = 0;
/// Exit code when secrets were found.
const EXIT_FINDINGS: i32 = 1;

/// Runs a scan end to end and returns the process exit code.
pub fn run(args: &ScanArgs) -> anyhow::Result<i32> {
    let engine = build_engine(args)?;

    let files = collect_files(&args.paths, &args.exclude, !args.skip_gitignore)?;
    if files.is_empty() {
        output::print_no_files();
        return Ok(EXIT_CLEAN);
    }

    let contents: Vec<(PathBuf, Vec<u8>)> = files
        .into_iter()
        .filter_map(|path| {
            let bytes = read_file_bytes(&path, args.max_file_size)?;
            Some((path, bytes))
        })
        .collect();

    // Walker entries under "." come back "./"-prefixed; strip that so unit
    // ids line up with user-written allowlist globs.
    let ids: Vec<String> = contents
        .iter()
        .map(|(path, _)| {
            let id = path.display().to_string();
            match id.strip_prefix("./") {
                Some(stripped) => stripped.to_string(),
                None => id,
            }
        })
        .collect();
    let units: Vec<ContentUnit<'_>> = ids
        .iter()
        .zip(&contents)
        .map(|(id, (_, bytes))| ContentUnit::new(id, bytes))
        .collect();

    let mut report = engine.scan(&units);
    if let Some(threshold) = args.severity {
        report.findings.retain(|f| f.severity >= threshold);
    }

    write_output(args, &report)?;

    if !report.findings.is_empty() && !args.exit_zero {
        return Ok(EXIT_FINDINGS);
    }
    Ok(EXIT_CLEAN)
}

/// Loads builtin rules, merges a user corpus if given, and compiles the
/// allowlist. All load errors are fatal before any unit is scanned.
fn build_engine(args: &ScanArgs) -> anyhow::Result<Engine> {
    let mut rules = RuleSet::builtin().context("compiling builtin rules")?;

    if let Some(path) = &args.rules {
        let doc = std::fs::read_to_string(path)
            .with_context(|| format!("reading rules file {}", path.display()))?;
        let extra = RuleSet::from_toml(&doc)
            .with_context(|| format!("loading rules from {}", path.display()))?;
        rules = rules.merge(extra);
    }

    let allowlist = match &args.allowlist {
        Some(path) => {
            let doc = std::fs::read_to_string(path)
                .with_context(|| format!("reading allowlist file {}", path.display()))?;
            Allowlist::from_toml(&doc)
                .with_context(|| format!("loading allowlist from {}", path.display()))?
        }
        None => Allowlist::empty(),
    };

    let mut config = ScanConfig::new().with_redaction(args.redaction.into());
    if let Some(concurrency) = args.concurrency {
        config = config.with_worker_count(concurrency);
    }

    Ok(Engine::new(rules, allowlist, config))
}

fn write_output(args: &ScanArgs, report: &ScanReport) -> anyhow::Result<()> {
    let rendered = match args.format {
        OutputFormat::Text => output::render_text(report),
        OutputFormat::Json => output::render_json(report)?,
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing output to {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
