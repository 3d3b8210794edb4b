use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::TagRunManifest;
use crate::util::sha256_file;

pub fn run(args: StatusArgs) -> Result<()> {
    let raw = fs::read(&args.manifest_path)
        .with_context(|| format!("failed to read {}", args.manifest_path.display()))?;
    let manifest: TagRunManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", args.manifest_path.display()))?;

    info!(
        run_id = %manifest.run_id,
        status = %manifest.status,
        started_at = %manifest.started_at,
        completed_at = %manifest.completed_at,
        output = %manifest.paths.output_path,
        fuzzy_threshold = manifest.settings.fuzzy_threshold,
        min_fuzzy_chars = manifest.settings.min_fuzzy_chars,
        length_tolerance = manifest.settings.length_tolerance,
        "loaded tag run manifest"
    );

    let counts = &manifest.counts;
    info!(
        questions_analyzed = counts.questions_analyzed,
        respondents = counts.respondents,
        respondents_skipped = counts.respondents_skipped,
        answers_seen = counts.answers_seen,
        answers_without_analysis = counts.answers_without_analysis,
        answers_tagged = counts.answers_tagged,
        segments = counts.segments,
        exact_matches = counts.exact_matches,
        fuzzy_matches = counts.fuzzy_matches,
        "tagging counts"
    );
    info!(
        malformed_pair = counts.dropped_malformed_pair,
        index_out_of_range = counts.dropped_index_out_of_range,
        null_code = counts.dropped_null_code,
        empty_code = counts.dropped_empty_code,
        empty_quote = counts.dropped_empty_quote,
        unlocatable = counts.dropped_unlocatable,
        "dropped pairings"
    );

    for input in &manifest.inputs {
        let path = std::path::Path::new(&input.path);
        if !path.exists() {
            warn!(path = %input.path, "input file missing");
            continue;
        }
        match sha256_file(path) {
            Ok(current) if current == input.sha256 => {
                info!(path = %input.path, "input unchanged since run")
            }
            Ok(_) => warn!(path = %input.path, "input changed since run; output is stale"),
            Err(err) => warn!(path = %input.path, error = %err, "failed to hash input"),
        }
    }

    for warning in &manifest.warnings {
        warn!(warning = %warning, "recorded during run");
    }

    Ok(())
}
