use super::*;

#[derive(Debug, Default)]
pub(super) struct AnalysisIndex {
    pub(super) questions: HashMap<String, QuestionAnalysis>,
    pub(super) warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawQuestionAnalysis {
    #[serde(default)]
    question_text: Option<String>,
    #[serde(default)]
    initial_codes: Vec<Value>,
    #[serde(default)]
    themes: Vec<Value>,
    #[serde(default)]
    codes: Vec<Value>,
}

#[derive(Debug)]
pub(super) struct InterviewTable {
    pub(super) headers: Vec<String>,
    pub(super) id_column: usize,
    pub(super) rows: Vec<Vec<String>>,
}

pub(super) fn load_analysis(path: &Path) -> Result<AnalysisIndex> {
    if !path.exists() {
        bail!("analysis file not found: {}", path.display());
    }

    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let Value::Array(items) = value else {
        bail!("analysis root must be an array: {}", path.display());
    };

    let index = parse_analysis(items);
    info!(
        path = %path.display(),
        questions = index.questions.len(),
        warnings = index.warnings.len(),
        "loaded analysis"
    );
    Ok(index)
}

pub(super) fn parse_analysis(items: Vec<Value>) -> AnalysisIndex {
    let mut index = AnalysisIndex::default();

    for (position, item) in items.into_iter().enumerate() {
        let raw = match serde_json::from_value::<RawQuestionAnalysis>(item) {
            Ok(raw) => raw,
            Err(err) => {
                index.warn(format!("question analysis #{} is malformed: {err}", position + 1));
                continue;
            }
        };

        let question_text = raw.question_text.unwrap_or_default();
        let key = normalize_label(&question_text);
        if key.is_empty() {
            index.warn(format!(
                "question analysis #{} has no question_text; skipped",
                position + 1
            ));
            continue;
        }

        let initial_codes = keep_valid::<InitialCodeEntry>(raw.initial_codes, |entry| {
            entry.pairs_well_formed()
        });
        let themes = keep_valid::<ThemeEntry>(raw.themes, |_| true);
        let code_definitions = keep_valid::<CodeDefinition>(raw.codes, |_| true);

        for (label, dropped) in [
            ("initial code entries", initial_codes.dropped),
            ("theme entries", themes.dropped),
            ("code definitions", code_definitions.dropped),
        ] {
            if dropped > 0 {
                index.warn(format!(
                    "question '{question_text}': {dropped} invalid {label} dropped"
                ));
            }
        }

        if index.questions.contains_key(&key) {
            index.warn(format!(
                "question '{question_text}' appears more than once; merged"
            ));
        }

        match index.questions.get_mut(&key) {
            Some(existing) => merge_question(
                existing,
                initial_codes.kept,
                themes.kept,
                code_definitions.kept,
            ),
            None => {
                debug!(
                    question = %question_text,
                    initial_codes = initial_codes.kept.len(),
                    themes = themes.kept.len(),
                    code_definitions = code_definitions.kept.len(),
                    "question analysis loaded"
                );
                index.questions.insert(
                    key,
                    QuestionAnalysis {
                        question_text,
                        initial_codes: initial_codes.kept,
                        themes: themes.kept,
                        code_definitions: code_definitions.kept,
                    },
                );
            }
        }
    }

    index
}

impl AnalysisIndex {
    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }
}

struct Validated<T> {
    kept: Vec<T>,
    dropped: usize,
}

fn keep_valid<T>(values: Vec<Value>, accept: impl Fn(&T) -> bool) -> Validated<T>
where
    T: DeserializeOwned,
{
    let total = values.len();
    let kept = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<T>(value).ok())
        .filter(|parsed| accept(parsed))
        .collect::<Vec<T>>();

    Validated {
        dropped: total - kept.len(),
        kept,
    }
}

fn merge_question(
    existing: &mut QuestionAnalysis,
    initial_codes: Vec<InitialCodeEntry>,
    themes: Vec<ThemeEntry>,
    code_definitions: Vec<CodeDefinition>,
) {
    for theme in themes {
        if !existing
            .themes
            .iter()
            .any(|known| known.theme_name == theme.theme_name)
        {
            existing.themes.push(theme);
        }
    }

    for entry in initial_codes {
        if !existing.initial_codes.iter().any(|known| {
            known.respondent_id == entry.respondent_id
                && known.original_answer_segment == entry.original_answer_segment
        }) {
            existing.initial_codes.push(entry);
        }
    }

    for definition in code_definitions {
        if !existing
            .code_definitions
            .iter()
            .any(|known| known.code_name == definition.code_name)
        {
            existing.code_definitions.push(definition);
        }
    }
}

pub(super) fn load_interviews(
    path: &Path,
    requested_id_column: Option<&str>,
) -> Result<(InterviewTable, Vec<String>)> {
    if !path.exists() {
        bail!("interview table not found: {}", path.display());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (table, warnings) = parse_interviews(&content, requested_id_column)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    info!(
        path = %path.display(),
        id_column = %table.headers[table.id_column],
        columns = table.headers.len(),
        respondents = table.rows.len(),
        "loaded interview table"
    );
    Ok((table, warnings))
}

pub(super) fn parse_interviews(
    content: &str,
    requested_id_column: Option<&str>,
) -> Result<(InterviewTable, Vec<String>)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .context("failed to read header row")?
        .iter()
        .map(ToOwned::to_owned)
        .collect::<Vec<String>>();
    if headers.is_empty() || headers.iter().all(|header| header.trim().is_empty()) {
        bail!("interview table header is empty");
    }

    let mut warnings = Vec::new();
    let id_column = 0usize;
    if let Some(requested) = requested_id_column.filter(|name| *name != headers[id_column]) {
        let message = format!(
            "requested id column '{requested}' differs from first column '{}'; using the first column",
            headers[id_column]
        );
        warn!("{message}");
        warnings.push(message);
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read data row {}", line + 1))?;
        let mut row = record.iter().map(ToOwned::to_owned).collect::<Vec<String>>();
        if row.iter().all(|cell| cell.trim().is_empty()) {
            debug!(row = line + 1, "skipping empty row");
            continue;
        }
        if row[id_column].trim().is_empty() {
            debug!(row = line + 1, "skipping row without respondent id");
            continue;
        }
        row.resize(headers.len().max(row.len()), String::new());
        rows.push(row);
    }

    Ok((
        InterviewTable {
            headers,
            id_column,
            rows,
        },
        warnings,
    ))
}
