//! CLI module - Command-line interface definitions and handlers

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::backends::scan::ScanOptions;
use crate::core::layout::{ProjectLayout, LAYOUTS_SUBDIR};
use crate::core::render::{OutputFormat, RenderConfig};

/// assetref - find every file that references a stylesheet, script, image,
/// template or layout in a Rails-style project.
#[derive(Parser, Debug)]
#[command(name = "assetref")]
#[command(
    author,
    version,
    about,
    long_about = r#"assetref reports where an asset is used.

Give it one or more target files (stylesheets, scripts, images, templates,
partials, layouts or any other file under public/) and it scans the project
for helper calls, HTML tags, CSS imports and render calls that reference them.

Output formats:
- lines: <file>:<line>:<text> per usage (default)
- files: referencing files only
- count: <file>:<n> per referencing file
- total: the total number of usages
- jsonl: one JSON record per usage
- json: a single JSON array
- md: human-friendly Markdown

Examples:
    assetref find public/stylesheets/main.css
    assetref --format files find app/views/layouts/application.html.erb
    assetref unused public/images/*.png
    assetref kind app/views/users/_form.html.erb
"#
)]
pub struct Cli {
    /// Project root directory.
    #[arg(
        long,
        global = true,
        env = "ASSETREF_ROOT",
        default_value = ".",
        value_name = "ROOT",
        long_help = "Project root directory (defaults to the current directory).\n\n\
Target paths are interpreted relative to this root unless absolute, and all\n\
paths in the output are shown relative to it."
    )]
    pub root: PathBuf,

    /// Output format (lines/files/count/total/jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "lines",
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- lines (default)\n\
- files\n\
- count\n\
- total\n\
- jsonl\n\
- json\n\
- md (markdown)\n\n\
Tip: Prefer jsonl when you want stable, line-oriented output for piping."
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. Color is only used when stdout is a terminal;\n\
this flag turns it off there too."
    )]
    pub no_color: bool,

    /// Disable .gitignore and other ignore rules.
    #[arg(
        long,
        global = true,
        long_help = "Disable respect for ignore files (.gitignore, .ignore, global ignores).\n\n\
Version-control directories (.git, .svn, .hg) are skipped regardless."
    )]
    pub no_ignore: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        long_help = "Only log errors to stderr. Results are still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr: candidates scanned, files skipped and why.\n\n\
RUST_LOG overrides both --quiet and --verbose."
    )]
    pub verbose: bool,

    /// Views directory (default: app/views).
    #[arg(long, global = true, value_name = "DIR")]
    pub views_dir: Option<PathBuf>,

    /// Layouts directory (default: <views-dir>/layouts).
    #[arg(long, global = true, value_name = "DIR")]
    pub layouts_dir: Option<PathBuf>,

    /// Controllers directory (default: app/controllers).
    #[arg(long, global = true, value_name = "DIR")]
    pub controllers_dir: Option<PathBuf>,

    /// Public (document root) directory (default: public).
    #[arg(long, global = true, value_name = "DIR")]
    pub public_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every usage of the given files.
    #[command(
        long_about = "Scan the project under ROOT and print every line that references one of\n\
the given target files.\n\n\
Exits with status 1 when no target has any usage, like grep.\n\n\
Examples:\n\
  assetref find public/stylesheets/main.css\n\
  assetref find app/views/hello/_greeting.html.erb --format jsonl\n"
    )]
    Find {
        /// Target files (relative to ROOT unless absolute).
        #[arg(value_name = "FILE", required = true)]
        targets: Vec<PathBuf>,
    },

    /// Print the given files that have no usage.
    #[command(
        long_about = "Print each target file that is not referenced anywhere in the project.\n\n\
Targets of an unsupported type are reported on stderr and skipped.\n\n\
Examples:\n\
  assetref unused public/images/*.png public/images/*.gif\n"
    )]
    Unused {
        /// Target files (relative to ROOT unless absolute).
        #[arg(value_name = "FILE", required = true)]
        targets: Vec<PathBuf>,
    },

    /// Print which finder would handle each file.
    Kind {
        /// Target files (relative to ROOT unless absolute).
        #[arg(value_name = "FILE", required = true)]
        targets: Vec<PathBuf>,
    },
}

/// Process exit status
///
/// - `Success` (0): command completed
/// - `NotFound` (1): `find` found no usage for any target
/// - `Error` (2): command failed (missing root, bad arguments)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    NotFound,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::NotFound => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

impl Cli {
    /// Default log filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "assetref=debug"
        } else if self.quiet {
            "assetref=error"
        } else {
            "assetref=warn"
        }
    }

    /// Open ROOT and apply the directory overrides
    pub fn project(&self) -> Result<ProjectLayout> {
        let mut project = ProjectLayout::open(&self.root)
            .with_context(|| format!("cannot open project at {}", self.root.display()))?;
        if let Some(dir) = &self.views_dir {
            project = project.with_views_dir(dir);
            if self.layouts_dir.is_none() {
                project = project.with_layouts_dir(&dir.join(LAYOUTS_SUBDIR));
            }
        }
        if let Some(dir) = &self.layouts_dir {
            project = project.with_layouts_dir(dir);
        }
        if let Some(dir) = &self.controllers_dir {
            project = project.with_controllers_dir(dir);
        }
        if let Some(dir) = &self.public_dir {
            project = project.with_public_dir(dir);
        }
        Ok(project)
    }

    pub fn render_config(&self) -> Result<RenderConfig> {
        let format: OutputFormat = self.format.parse().map_err(anyhow::Error::msg)?;
        let color = !self.no_color && std::io::stdout().is_terminal();
        Ok(RenderConfig::with_color(format, color))
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::default().with_respect_ignore(!self.no_ignore)
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<ExitStatus> {
    let render_config = cli.render_config()?;
    let project = cli.project()?;
    let scan = cli.scan_options();

    match &cli.command {
        Commands::Find { targets } => {
            let found =
                crate::backends::find::run_find(&project, targets, scan, render_config)?;
            Ok(if found {
                ExitStatus::Success
            } else {
                ExitStatus::NotFound
            })
        }
        Commands::Unused { targets } => {
            crate::backends::find::run_unused(&project, targets, scan, render_config)?;
            Ok(ExitStatus::Success)
        }
        Commands::Kind { targets } => {
            crate::backends::find::run_kind(&project, targets, render_config)?;
            Ok(ExitStatus::Success)
        }
    }
}
