use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::MergeArgs;
use crate::util::write_json_pretty;

pub fn run(args: MergeArgs) -> Result<()> {
    let mut paths = args.inputs.clone();
    if let Some(input_dir) = args.input_dir.as_deref() {
        paths.extend(discover_json_files(input_dir)?);
    }

    if paths.is_empty() {
        bail!("no analysis files given; pass paths or --input-dir");
    }

    info!(files = paths.len(), output = %args.output.display(), "merging analysis files");

    let merged = merge_analysis_files(&paths);
    if merged.is_empty() {
        bail!("none of the {} analysis files could be loaded", paths.len());
    }

    write_json_pretty(&args.output, &merged)?;
    info!(
        questions = merged.len(),
        path = %args.output.display(),
        "wrote merged analysis"
    );

    Ok(())
}

pub fn merge_analysis_files(paths: &[PathBuf]) -> Vec<Value> {
    let mut merged = Vec::with_capacity(paths.len());

    for path in paths {
        match load_question_object(path) {
            Ok(Some(object)) => merged.push(object),
            Ok(None) => {
                warn!(path = %path.display(), "file is neither an object nor an array of objects; skipped");
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load analysis file; skipped");
            }
        }
    }

    merged
}

fn load_question_object(path: &Path) -> Result<Option<Value>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    Ok(match value {
        Value::Object(_) => Some(value),
        Value::Array(mut items) if matches!(items.first(), Some(Value::Object(_))) => {
            if items.len() > 1 {
                warn!(
                    path = %path.display(),
                    objects = items.len(),
                    "array holds several question objects; only the first is used"
                );
            }
            Some(items.swap_remove(0))
        }
        _ => None,
    })
}

fn discover_json_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_takes_objects_and_first_array_element() {
        let dir = tempfile::tempdir().expect("tempdir");
        let object_path = dir.path().join("q1.json");
        let array_path = dir.path().join("q2.json");
        let broken_path = dir.path().join("q3.json");
        let scalar_path = dir.path().join("q4.json");
        fs::write(&object_path, r#"{"question_text": "Q1"}"#).expect("write q1");
        fs::write(
            &array_path,
            r#"[{"question_text": "Q2"}, {"question_text": "ignored"}]"#,
        )
        .expect("write q2");
        fs::write(&broken_path, "{not json").expect("write q3");
        fs::write(&scalar_path, "42").expect("write q4");

        let merged = merge_analysis_files(&[
            object_path,
            array_path,
            broken_path,
            scalar_path,
            dir.path().join("missing.json"),
        ]);

        let questions = merged
            .iter()
            .map(|value| value["question_text"].as_str().unwrap_or_default())
            .collect::<Vec<&str>>();
        assert_eq!(questions, vec!["Q1", "Q2"]);
    }

    #[test]
    fn discover_json_files_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("b.json"), "{}").expect("write b");
        fs::write(dir.path().join("a.JSON"), "{}").expect("write a");
        fs::write(dir.path().join("notes.txt"), "skip").expect("write notes");
        fs::create_dir(dir.path().join("nested.json")).expect("mkdir");

        let files = discover_json_files(dir.path()).expect("discover");
        let names = files
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect::<Vec<&str>>();
        assert_eq!(names, vec!["a.JSON", "b.json"]);
    }
}
