//! Renderer module
//!
//! Renders usage reports as lines, files, count, total, jsonl, json or md.
//! Paths are shown relative to the project root.

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::core::model::{UsageRecord, UsageReport};
use crate::core::paths::{make_relative, normalize_path};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `<file>:<line>:<text>`
    #[default]
    Lines,
    /// Referencing files only
    Files,
    /// `<file>:<n>` per referencing file
    Count,
    /// Total number of usages
    Total,
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" => Ok(OutputFormat::Lines),
            "files" => Ok(OutputFormat::Files),
            "count" => Ok(OutputFormat::Count),
            "total" => Ok(OutputFormat::Total),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl OutputFormat {
    /// Whether the format prints the text of each usage line
    pub fn shows_line_text(&self) -> bool {
        matches!(
            self,
            OutputFormat::Lines | OutputFormat::Jsonl | OutputFormat::Json | OutputFormat::Markdown
        )
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: false,
        }
    }

    pub fn with_color(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }
}

/// A target with no usages, or the finder kind chosen for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetRecord {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Renderer for usage reports
pub struct Renderer<'a> {
    config: RenderConfig,
    root: &'a Path,
}

impl<'a> Renderer<'a> {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat, root: &'a Path) -> Self {
        Self::with_config(RenderConfig::new(format), root)
    }

    pub fn with_config(config: RenderConfig, root: &'a Path) -> Self {
        Self { config, root }
    }

    fn relative(&self, path: &Path) -> String {
        make_relative(path, self.root).unwrap_or_else(|| normalize_path(path))
    }

    fn records(&self, reports: &[UsageReport]) -> Vec<UsageRecord> {
        reports
            .iter()
            .flat_map(|report| {
                report
                    .usages
                    .iter()
                    .map(|usage| usage.record(&report.target, self.root))
            })
            .collect()
    }

    /// Render the usages of every report
    pub fn render(&self, reports: &[UsageReport]) -> String {
        match self.config.format {
            OutputFormat::Lines => self.render_lines(reports),
            OutputFormat::Files => self.render_files(reports),
            OutputFormat::Count => self.render_count(reports),
            OutputFormat::Total => reports
                .iter()
                .map(|r| r.usages.len())
                .sum::<usize>()
                .to_string(),
            OutputFormat::Jsonl => render_jsonl(&self.records(reports)),
            OutputFormat::Json => render_json(&self.records(reports)),
            OutputFormat::Markdown => self.render_markdown(reports),
        }
    }

    /// Render a list of targets, with their kind when known
    pub fn render_targets(&self, targets: &[TargetRecord]) -> String {
        match self.config.format {
            OutputFormat::Jsonl => render_jsonl(targets),
            OutputFormat::Json => render_json(targets),
            OutputFormat::Total => targets.len().to_string(),
            OutputFormat::Markdown => {
                let mut output = String::new();
                for target in targets {
                    output.push_str(&format!("- `{}`", target.target));
                    if let Some(kind) = &target.kind {
                        output.push_str(&format!(": {}", kind));
                    }
                    output.push('\n');
                }
                output
            }
            _ => targets
                .iter()
                .map(|target| match &target.kind {
                    Some(kind) => format!("{}: {}", self.paint_path(&target.target), kind),
                    None => self.paint_path(&target.target),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn paint_path(&self, path: &str) -> String {
        if self.config.color {
            path.magenta().to_string()
        } else {
            path.to_string()
        }
    }

    fn render_lines(&self, reports: &[UsageReport]) -> String {
        reports
            .iter()
            .flat_map(|report| report.usages.iter())
            .map(|usage| {
                let path = self.paint_path(&self.relative(usage.file()));
                let line = if self.config.color {
                    usage.line_number().to_string().green().to_string()
                } else {
                    usage.line_number().to_string()
                };
                format!("{}:{}:{}", path, line, usage.line_text())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Referencing files in first-seen order, each once
    fn referencing_files(&self, reports: &[UsageReport]) -> Vec<(String, usize)> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for usage in reports.iter().flat_map(|r| r.usages.iter()) {
            let path = self.relative(usage.file());
            let count = counts.entry(path.clone()).or_insert(0);
            if *count == 0 {
                order.push(path);
            }
            *count += 1;
        }
        order
            .into_iter()
            .map(|path| {
                let n = counts.get(&path).copied().unwrap_or_default();
                (path, n)
            })
            .collect()
    }

    fn render_files(&self, reports: &[UsageReport]) -> String {
        self.referencing_files(reports)
            .into_iter()
            .map(|(path, _)| self.paint_path(&path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_count(&self, reports: &[UsageReport]) -> String {
        self.referencing_files(reports)
            .into_iter()
            .map(|(path, n)| format!("{}:{}", self.paint_path(&path), n))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_markdown(&self, reports: &[UsageReport]) -> String {
        let mut output = String::new();
        for report in reports {
            output.push_str(&format!("## `{}`\n\n", report.target));
            if report.is_empty() {
                output.push_str("_No usages found._\n\n");
                continue;
            }
            for usage in &report.usages {
                output.push_str(&format!(
                    "- `{}:{}`: `{}`\n",
                    self.relative(usage.file()),
                    usage.line_number(),
                    usage.line_text().trim()
                ));
            }
            output.push('\n');
        }
        output
    }
}

/// Render as JSON Lines (one JSON object per line)
fn render_jsonl<T: Serialize>(items: &[T]) -> String {
    items
        .iter()
        .filter_map(|item| serde_json::to_string(item).ok())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render as a single JSON array
fn render_json<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
}
