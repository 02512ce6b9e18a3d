//! Usage collection
//!
//! Runs one finder over every candidate file: enumerate, read, build the
//! per-file context, then test each line against the matcher table.

use tracing::{debug, info, warn};

use crate::backends::scan::candidate_files;
use crate::core::file_reader::read_file_with_config;
use crate::core::model::Usage;
use crate::finders::Finder;

/// Every usage of the finder's target, ordered by file then line.
///
/// A line yields at most one usage however many matchers accept it, and
/// the target never counts as a usage of itself. Unreadable and binary
/// files are skipped.
pub fn each_usage(finder: &Finder<'_>) -> Vec<Usage> {
    let project = finder.project();
    let opts = finder.scan_options();
    let candidates = candidate_files(project.root(), finder.kind().file_types(), opts);
    debug!(
        kind = %finder.kind(),
        asset = %finder.full_target_path().display(),
        candidates = candidates.len(),
        "scanning candidates"
    );

    let mut usages = Vec::new();
    for path in candidates {
        if finder.is_target(&path) {
            continue;
        }
        let read = read_file_with_config(&path, &opts.read);
        let content = match read.content {
            Ok(content) => content,
            Err(reason) => {
                debug!(file = %path.display(), %reason, "skipping candidate");
                continue;
            }
        };
        if read.lossy_conversion {
            warn!(file = %path.display(), "file is not valid UTF-8, matched lossily");
        }

        let context = finder.context_for(&path, &content);
        for (index, line) in content.lines().enumerate() {
            if !finder.matches_line(&context, line) {
                continue;
            }
            let line_number = index as u32 + 1;
            let usage = if opts.capture_text {
                Usage::new(path.clone(), line_number, line)
            } else {
                Usage::deferred(path.clone(), line_number)
            };
            usages.push(usage);
        }
    }

    info!(
        asset = %finder.full_target_path().display(),
        usages = usages.len(),
        "scan complete"
    );
    usages
}
