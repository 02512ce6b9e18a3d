//! Command backends: find, unused, kind
//!
//! Each target is resolved against the project root and handed to the
//! finder factory. Targets without a finder are warned about and skipped.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};

use crate::backends::scan::ScanOptions;
use crate::core::layout::ProjectLayout;
use crate::core::model::UsageReport;
use crate::core::paths::{make_relative, normalize_path};
use crate::core::render::{RenderConfig, Renderer, TargetRecord};
use crate::finders::{factory, generate};

/// Label printed for targets no finder handles
pub const UNSUPPORTED: &str = "unsupported";

/// Target path as shown to the user: relative to root when inside it
pub fn display_target(project: &ProjectLayout, target: &Path) -> String {
    let full = project.absolutize(target);
    make_relative(&full, project.root()).unwrap_or_else(|| normalize_path(&full))
}

/// Usage reports for every supported target, in argument order
pub fn find_usages(
    project: &ProjectLayout,
    targets: &[PathBuf],
    scan: ScanOptions,
) -> Vec<UsageReport> {
    let mut reports = Vec::new();
    for target in targets {
        let shown = display_target(project, target);
        let Some(finder) = generate(project, target) else {
            warn!(target_file = %shown, "unsupported file type, skipping");
            continue;
        };
        if !finder.full_target_path().exists() {
            warn!(target_file = %shown, "target does not exist, searching anyway");
        }
        let finder = finder.with_scan_options(scan);
        debug!(target_file = %shown, kind = %finder.kind(), "finding usages");
        reports.push(UsageReport::new(shown, finder.usages().to_vec()));
    }
    reports
}

/// Print usages; returns whether any target had at least one
pub fn run_find(
    project: &ProjectLayout,
    targets: &[PathBuf],
    scan: ScanOptions,
    config: RenderConfig,
) -> Result<bool> {
    let scan = scan.with_capture_text(config.format.shows_line_text());
    let reports = find_usages(project, targets, scan);
    let found = reports.iter().any(|report| !report.is_empty());

    let renderer = Renderer::with_config(config, project.root());
    let output = renderer.render(&reports);
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(found)
}

/// Supported targets that have no usage at all
pub fn unused_targets(
    project: &ProjectLayout,
    targets: &[PathBuf],
    scan: ScanOptions,
) -> Vec<TargetRecord> {
    find_usages(project, targets, scan.with_capture_text(false))
        .into_iter()
        .filter(UsageReport::is_empty)
        .map(|report| TargetRecord {
            target: report.target,
            kind: None,
        })
        .collect()
}

pub fn run_unused(
    project: &ProjectLayout,
    targets: &[PathBuf],
    scan: ScanOptions,
    config: RenderConfig,
) -> Result<()> {
    let unused = unused_targets(project, targets, scan);
    let output = Renderer::with_config(config, project.root()).render_targets(&unused);
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Finder kind the factory picks for each target
pub fn target_kinds(project: &ProjectLayout, targets: &[PathBuf]) -> Vec<TargetRecord> {
    targets
        .iter()
        .map(|target| {
            let kind = factory::kind_for(project, &project.absolutize(target));
            TargetRecord {
                target: display_target(project, target),
                kind: Some(kind.map_or(UNSUPPORTED, |k| k.as_str()).to_string()),
            }
        })
        .collect()
}

pub fn run_kind(project: &ProjectLayout, targets: &[PathBuf], config: RenderConfig) -> Result<()> {
    let kinds = target_kinds(project, targets);
    let output = Renderer::with_config(config, project.root()).render_targets(&kinds);
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
