use super::*;

pub fn run(args: TagArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("tag-{}", utc_compact_string(started_ts));

    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        let mut name = args.output.as_os_str().to_owned();
        name.push(".manifest.json");
        name.into()
    });

    info!(
        run_id = %run_id,
        analysis = %args.analysis_path.display(),
        interviews = %args.interviews_path.display(),
        "starting tag run"
    );

    let config = MatchConfig {
        fuzzy_threshold: args.fuzzy_threshold,
        min_fuzzy_chars: args.min_fuzzy_chars,
        length_tolerance: args.length_tolerance,
    };
    if config.fuzzy_threshold > 100 {
        bail!("--fuzzy-threshold must be within 0..=100");
    }
    if !(0.0..1.0).contains(&config.length_tolerance) {
        bail!("--length-tolerance must be within 0.0..1.0");
    }

    let parser = RespondentIdParser::new()?;
    let analysis = load_analysis(&args.analysis_path)?;
    let (table, table_warnings) =
        load_interviews(&args.interviews_path, args.respondent_id_column.as_deref())?;

    let debug_target = DebugTarget::new(
        args.debug_respondent.as_deref(),
        args.debug_question.as_deref(),
        &parser,
    );

    let build = build_document(&analysis, &table, &parser, &config, &debug_target);
    if build.document.is_empty() {
        bail!("no respondents could be tagged; nothing written");
    }

    write_text(&args.output, &build.document)?;
    info!(path = %args.output.display(), "wrote tagged document");

    let mut warnings = analysis.warnings.clone();
    warnings.extend(table_warnings);
    warnings.extend(build.warnings);

    let manifest = TagRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        status: "completed".to_string(),
        started_at,
        completed_at: now_utc_string(),
        paths: TagPaths {
            analysis_path: args.analysis_path.display().to_string(),
            interviews_path: args.interviews_path.display().to_string(),
            output_path: args.output.display().to_string(),
        },
        inputs: vec![
            fingerprint(&args.analysis_path)?,
            fingerprint(&args.interviews_path)?,
        ],
        settings: MatchSettings {
            fuzzy_threshold: config.fuzzy_threshold,
            min_fuzzy_chars: config.min_fuzzy_chars,
            length_tolerance: config.length_tolerance,
        },
        counts: build.counts,
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote tag run manifest");
    info!(
        respondents = manifest.counts.respondents,
        answers_tagged = manifest.counts.answers_tagged,
        segments = manifest.counts.segments,
        fuzzy_matches = manifest.counts.fuzzy_matches,
        dropped_unlocatable = manifest.counts.dropped_unlocatable,
        "tag run completed"
    );

    Ok(())
}

fn fingerprint(path: &Path) -> Result<InputFingerprint> {
    Ok(InputFingerprint {
        path: path.display().to_string(),
        sha256: sha256_file(path)?,
    })
}
