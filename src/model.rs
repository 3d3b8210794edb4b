use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialCodeEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub respondent_id: String,
    pub original_answer_segment: String,
    pub code_name: Vec<String>,
    pub supporting_quote: Vec<String>,
    pub pairs: Vec<String>,
}

impl InitialCodeEntry {
    pub fn pairs_well_formed(&self) -> bool {
        self.pairs.iter().all(|pair| pair.contains('-'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub theme_name: String,
    pub theme_definition: String,
    pub included_initial_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeDefinition {
    pub code_name: String,
    pub code_definition: String,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionAnalysis {
    pub question_text: String,
    pub initial_codes: Vec<InitialCodeEntry>,
    pub themes: Vec<ThemeEntry>,
    pub code_definitions: Vec<CodeDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFingerprint {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagPaths {
    pub analysis_path: String,
    pub interviews_path: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagCounts {
    pub questions_analyzed: usize,
    pub respondents: usize,
    pub respondents_skipped: usize,
    pub answers_seen: usize,
    pub answers_without_analysis: usize,
    pub answers_tagged: usize,
    pub segments: usize,
    pub exact_matches: usize,
    pub fuzzy_matches: usize,
    pub dropped_malformed_pair: usize,
    pub dropped_index_out_of_range: usize,
    pub dropped_null_code: usize,
    pub dropped_empty_code: usize,
    pub dropped_empty_quote: usize,
    pub dropped_unlocatable: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSettings {
    pub fuzzy_threshold: u8,
    pub min_fuzzy_chars: usize,
    pub length_tolerance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: String,
    pub paths: TagPaths,
    pub inputs: Vec<InputFingerprint>,
    pub settings: MatchSettings,
    pub counts: TagCounts,
    pub warnings: Vec<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(value) => value,
        StringOrNumber::Number(value) => value.to_string(),
    })
}
