use super::*;

pub(super) const RESPONDENT_HEADER: &str = "#TEXT";

#[derive(Debug, Clone, Default)]
pub(super) struct DebugTarget {
    respondent: Option<String>,
    question: Option<String>,
}

impl DebugTarget {
    pub(super) fn new(
        respondent: Option<&str>,
        question: Option<&str>,
        parser: &RespondentIdParser,
    ) -> Self {
        Self {
            respondent: respondent.and_then(|raw| parser.normalize(raw)),
            question: question
                .map(normalize_label)
                .filter(|label| !label.is_empty()),
        }
    }

    pub(super) fn matches(&self, respondent_id: &str, question_label: &str) -> bool {
        if self.respondent.is_none() && self.question.is_none() {
            return false;
        }

        self.respondent
            .as_deref()
            .is_none_or(|target| target == respondent_id)
            && self
                .question
                .as_deref()
                .is_none_or(|target| target == question_label)
    }
}

#[derive(Debug, Default)]
pub(super) struct DocumentBuild {
    pub(super) document: String,
    pub(super) counts: TagCounts,
    pub(super) warnings: Vec<String>,
}

struct QuestionPlan<'a> {
    themes: ThemeIndex,
    entries_by_respondent: HashMap<String, Vec<&'a InitialCodeEntry>>,
}

pub(super) fn build_document(
    analysis: &AnalysisIndex,
    table: &InterviewTable,
    parser: &RespondentIdParser,
    config: &MatchConfig,
    debug_target: &DebugTarget,
) -> DocumentBuild {
    let mut build = DocumentBuild::default();
    build.counts.questions_analyzed = analysis.questions.len();

    let plans = plan_questions(analysis, parser, &mut build.warnings);
    let column_labels = table
        .headers
        .iter()
        .map(|header| normalize_label(header))
        .collect::<Vec<String>>();

    for row in &table.rows {
        let Some(respondent_id) = parser.normalize(&row[table.id_column]) else {
            warn!(raw_id = %row[table.id_column], "respondent id has no digits; skipped");
            build.counts.respondents_skipped += 1;
            continue;
        };
        build.counts.respondents += 1;
        build
            .document
            .push_str(&format!("{RESPONDENT_HEADER} {respondent_id}\n\n"));

        for (column, question_label) in column_labels.iter().enumerate() {
            if column == table.id_column {
                continue;
            }

            let answer = normalize_answer(row.get(column).map(String::as_str).unwrap_or_default());
            if answer.is_empty() {
                continue;
            }
            build.counts.answers_seen += 1;

            let Some(plan) = plans.get(question_label.as_str()) else {
                build.counts.answers_without_analysis += 1;
                continue;
            };
            let entries = plan
                .entries_by_respondent
                .get(&respondent_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if entries.is_empty() {
                continue;
            }

            let tagged = tag_answer(&answer, question_label, entries, &plan.themes, config);
            let verbose = debug_target.matches(&respondent_id, question_label);
            record_diagnostics(
                &mut build.counts,
                &tagged.diagnostics,
                &respondent_id,
                question_label,
                verbose,
            );

            if !tagged.segments.is_empty() {
                build.counts.answers_tagged += 1;
                build.counts.segments += tagged.segments.len();
                build.document.push_str(&tagged.text);
                build.document.push_str("\n\n");
            }
        }

        build.document.push('\n');
    }

    build
}

fn plan_questions<'a>(
    analysis: &'a AnalysisIndex,
    parser: &RespondentIdParser,
    warnings: &mut Vec<String>,
) -> HashMap<&'a str, QuestionPlan<'a>> {
    let mut keys = analysis.questions.keys().collect::<Vec<&String>>();
    keys.sort();

    let mut plans = HashMap::with_capacity(keys.len());
    for key in keys {
        let question = &analysis.questions[key];
        let themes = ThemeIndex::build(&question.themes);
        for conflict in themes.conflicts() {
            let message = format!(
                "question '{}': code '{}' is listed under themes '{}' and '{}'; using '{}'",
                question.question_text,
                conflict.code_name,
                conflict.kept_theme,
                conflict.ignored_theme,
                conflict.kept_theme
            );
            warn!("{message}");
            warnings.push(message);
        }

        let mut entries_by_respondent = HashMap::<String, Vec<&InitialCodeEntry>>::new();
        for entry in &question.initial_codes {
            match parser.normalize(&entry.respondent_id) {
                Some(id) => entries_by_respondent.entry(id).or_default().push(entry),
                None => debug!(
                    question = %question.question_text,
                    raw_id = %entry.respondent_id,
                    "code entry respondent id has no digits; ignored"
                ),
            }
        }

        plans.insert(
            key.as_str(),
            QuestionPlan {
                themes,
                entries_by_respondent,
            },
        );
    }

    plans
}

fn record_diagnostics(
    counts: &mut TagCounts,
    diagnostics: &[Diagnostic],
    respondent_id: &str,
    question_label: &str,
    verbose: bool,
) {
    for diagnostic in diagnostics {
        match diagnostic.kind {
            DiagnosticKind::Dropped(reason) => {
                let counter = match reason {
                    DropReason::MalformedPair => &mut counts.dropped_malformed_pair,
                    DropReason::IndexOutOfRange => &mut counts.dropped_index_out_of_range,
                    DropReason::NullCode => &mut counts.dropped_null_code,
                    DropReason::EmptyCode => &mut counts.dropped_empty_code,
                    DropReason::EmptyQuote => &mut counts.dropped_empty_quote,
                    DropReason::Unlocatable => &mut counts.dropped_unlocatable,
                };
                *counter += 1;

                if verbose {
                    info!(
                        respondent = %respondent_id,
                        question = %question_label,
                        entry = diagnostic.entry_index,
                        pair = %diagnostic.pair,
                        reason = reason.as_str(),
                        "pairing dropped"
                    );
                } else {
                    debug!(
                        respondent = %respondent_id,
                        question = %question_label,
                        entry = diagnostic.entry_index,
                        pair = %diagnostic.pair,
                        reason = reason.as_str(),
                        "pairing dropped"
                    );
                }
            }
            DiagnosticKind::Located {
                match_type,
                score,
                occurrences,
            } => {
                match match_type {
                    MatchType::Exact => counts.exact_matches += 1,
                    MatchType::Fuzzy => counts.fuzzy_matches += 1,
                }

                if verbose {
                    info!(
                        respondent = %respondent_id,
                        question = %question_label,
                        entry = diagnostic.entry_index,
                        pair = %diagnostic.pair,
                        match_type = match_type.as_str(),
                        score = score.unwrap_or(100),
                        occurrences,
                        "quote located"
                    );
                } else if match_type == MatchType::Fuzzy {
                    debug!(
                        respondent = %respondent_id,
                        question = %question_label,
                        pair = %diagnostic.pair,
                        score = score.unwrap_or_default(),
                        "quote located by approximate match"
                    );
                }
            }
        }
    }
}
