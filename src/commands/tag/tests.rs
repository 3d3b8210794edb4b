use std::path::PathBuf;

use super::*;

const ANALYSIS_JSON: &str = r#"
[
  {
    "question_text": "What do you enjoy most？",
    "initial_codes": [
      {
        "respondent_id": "P1",
        "original_answer_segment": "I love team fights a lot",
        "code_name": ["Team fights", "Frequency", "NULL"],
        "supporting_quote": ["team fights", "a lot", "I love"],
        "pairs": ["1-1", "2-2", "3-3", "4-1"]
      },
      {
        "respondent_id": 2,
        "original_answer_segment": "Ranked mode every night",
        "code_name": ["Ranked play"],
        "supporting_quote": ["ranked mod every night"],
        "pairs": ["1-1"]
      },
      {
        "respondent_id": "3",
        "code_name": ["missing segment"],
        "supporting_quote": ["x"],
        "pairs": ["1-1"]
      }
    ],
    "themes": [
      {
        "theme_name": "Social play",
        "theme_definition": "Playing with others",
        "included_initial_codes": ["Team fights"]
      },
      { "theme_name": "No codes list" }
    ],
    "codes": [
      { "code_name": "Team fights", "code_definition": "Group combat" }
    ]
  },
  {
    "initial_codes": []
  },
  {
    "question_text": "What do you enjoy most?",
    "initial_codes": [
      {
        "respondent_id": "1",
        "original_answer_segment": "second batch",
        "code_name": ["Excitement"],
        "supporting_quote": ["love team"],
        "pairs": ["1-1"]
      }
    ],
    "themes": [
      {
        "theme_name": "Social play",
        "theme_definition": "duplicate, ignored",
        "included_initial_codes": ["Excitement"]
      }
    ],
    "codes": []
  }
]
"#;

const INTERVIEWS_CSV: &str = "\u{feff}ID,What do you enjoy most？,Anything else?\n\
P1,\"I love team\nfights a lot\",no\n\
被访者2,We played ranked mode every night,\n\
,,\n\
anonymous,something,else\n";

fn analysis() -> AnalysisIndex {
    let items: Vec<Value> = serde_json::from_str(ANALYSIS_JSON).expect("analysis json");
    parse_analysis(items)
}

#[test]
fn respondent_ids_reduce_to_first_number() {
    let parser = RespondentIdParser::new().expect("parser");
    assert_eq!(parser.normalize("1").as_deref(), Some("1"));
    assert_eq!(parser.normalize(" P12 ").as_deref(), Some("12"));
    assert_eq!(parser.normalize("被访者7号3").as_deref(), Some("7"));
    assert_eq!(parser.normalize("anonymous"), None);
    assert_eq!(parser.normalize(""), None);
}

#[test]
fn parse_analysis_validates_and_merges_duplicate_questions() {
    let index = analysis();

    assert_eq!(index.questions.len(), 1);
    let question = &index.questions["What do you enjoy most"];
    assert_eq!(question.question_text, "What do you enjoy most？");
    assert_eq!(question.initial_codes.len(), 3);
    assert_eq!(question.initial_codes[1].respondent_id, "2");
    assert_eq!(question.themes.len(), 1);
    assert_eq!(question.code_definitions.len(), 1);

    assert!(
        index
            .warnings
            .iter()
            .any(|warning| warning.contains("no question_text"))
    );
    assert!(
        index
            .warnings
            .iter()
            .any(|warning| warning.contains("1 invalid initial code entries"))
    );
    assert!(
        index
            .warnings
            .iter()
            .any(|warning| warning.contains("appears more than once"))
    );
}

#[test]
fn parse_interviews_strips_bom_and_skips_unusable_rows() {
    let (table, warnings) = parse_interviews(INTERVIEWS_CSV, Some("Respondent")).expect("csv");

    assert_eq!(table.headers[0], "ID");
    assert_eq!(table.id_column, 0);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0][1], "I love team\nfights a lot");
    assert_eq!(table.rows[1][2], "");
    assert_eq!(warnings.len(), 1);
}

#[test]
fn parse_interviews_rejects_empty_header() {
    assert!(parse_interviews("", None).is_err());
}

#[test]
fn build_document_tags_answers_per_respondent() {
    let index = analysis();
    let (table, _) = parse_interviews(INTERVIEWS_CSV, None).expect("csv");
    let parser = RespondentIdParser::new().expect("parser");

    let build = build_document(
        &index,
        &table,
        &parser,
        &MatchConfig::default(),
        &DebugTarget::default(),
    );

    let expected = concat!(
        "#TEXT 1\n\n",
        "I #CODE What do you enjoy most\\Excitement&&What do you enjoy most\\Social play\\Team fights",
        "#love teamfights#ENDCODE#",
        " #CODE What do you enjoy most\\Frequency#a lot#ENDCODE#\n\n",
        "\n",
        "#TEXT 2\n\n",
        "We played #CODE What do you enjoy most\\Ranked play#ranked mode every night#ENDCODE#\n\n",
        "\n",
    );
    assert_eq!(build.document, expected);

    assert_eq!(build.counts.respondents, 2);
    assert_eq!(build.counts.respondents_skipped, 1);
    assert_eq!(build.counts.answers_seen, 3);
    assert_eq!(build.counts.answers_without_analysis, 1);
    assert_eq!(build.counts.answers_tagged, 2);
    assert_eq!(build.counts.fuzzy_matches, 2);
    assert_eq!(build.counts.exact_matches, 2);
    assert_eq!(build.counts.dropped_null_code, 1);
    assert_eq!(build.counts.dropped_index_out_of_range, 1);
}

#[test]
fn debug_target_requires_an_explicit_selection() {
    let parser = RespondentIdParser::new().expect("parser");

    let none = DebugTarget::new(None, None, &parser);
    assert!(!none.matches("1", "Q"));

    let respondent = DebugTarget::new(Some("P1"), None, &parser);
    assert!(respondent.matches("1", "Q"));
    assert!(!respondent.matches("2", "Q"));

    let both = DebugTarget::new(Some("1"), Some("Q？"), &parser);
    assert!(both.matches("1", "Q"));
    assert!(!both.matches("1", "Other"));
}

#[test]
fn run_writes_document_and_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let analysis_path = dir.path().join("analysis.json");
    let interviews_path = dir.path().join("interviews.csv");
    let output: PathBuf = dir.path().join("out").join("maxqda.txt");
    fs::write(&analysis_path, ANALYSIS_JSON).expect("write analysis");
    fs::write(&interviews_path, INTERVIEWS_CSV).expect("write interviews");

    run(TagArgs {
        analysis_path: analysis_path.clone(),
        interviews_path,
        output: output.clone(),
        manifest_path: None,
        respondent_id_column: None,
        fuzzy_threshold: 85,
        min_fuzzy_chars: 3,
        length_tolerance: 0.3,
        debug_respondent: Some("1".to_string()),
        debug_question: None,
    })
    .expect("tag run");

    let document = fs::read_to_string(&output).expect("document");
    assert!(document.starts_with("#TEXT 1\n\n"));

    let manifest_path = dir.path().join("out").join("maxqda.txt.manifest.json");
    let raw = fs::read(&manifest_path).expect("manifest");
    let manifest: TagRunManifest = serde_json::from_slice(&raw).expect("manifest json");
    assert_eq!(manifest.status, "completed");
    assert!(manifest.run_id.starts_with("tag-"));
    assert_eq!(manifest.inputs.len(), 2);
    assert_eq!(manifest.inputs[0].sha256.len(), 64);
    assert_eq!(manifest.counts.answers_tagged, 2);
}

#[test]
fn run_fails_for_missing_analysis() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = run(TagArgs {
        analysis_path: dir.path().join("missing.json"),
        interviews_path: dir.path().join("missing.csv"),
        output: dir.path().join("out.txt"),
        manifest_path: None,
        respondent_id_column: None,
        fuzzy_threshold: 85,
        min_fuzzy_chars: 3,
        length_tolerance: 0.3,
        debug_respondent: None,
        debug_question: None,
    });

    assert!(result.is_err());
}
