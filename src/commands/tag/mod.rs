use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cli::TagArgs;
use crate::engine::{
    Diagnostic, DiagnosticKind, DropReason, MatchConfig, MatchType, ThemeIndex, normalize_answer,
    normalize_label, tag_answer,
};
use crate::model::{
    CodeDefinition, InitialCodeEntry, InputFingerprint, MatchSettings, QuestionAnalysis,
    TagCounts, TagPaths, TagRunManifest, ThemeEntry,
};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty, write_text};

const MANIFEST_VERSION: u32 = 1;

mod document;
mod load;
mod respondent;
mod run;
#[cfg(test)]
mod tests;

pub use run::run;

use document::*;
use load::*;
use respondent::*;
