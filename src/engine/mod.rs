use crate::model::InitialCodeEntry;

mod aggregate;
mod locate;
mod merge;
mod normalize;
mod render;
mod resolve;

use aggregate::aggregate;
use merge::merge;
use render::render;

pub use locate::MatchType;
pub use merge::MergedSegment;
pub use normalize::{normalize_answer, normalize_label};
pub use resolve::ThemeIndex;

pub const DEFAULT_FUZZY_THRESHOLD: u8 = 85;
pub const DEFAULT_MIN_FUZZY_CHARS: usize = 3;
pub const DEFAULT_LENGTH_TOLERANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    pub fuzzy_threshold: u8,
    pub min_fuzzy_chars: usize,
    pub length_tolerance: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            min_fuzzy_chars: DEFAULT_MIN_FUZZY_CHARS,
            length_tolerance: DEFAULT_LENGTH_TOLERANCE,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DropReason {
    MalformedPair,
    IndexOutOfRange,
    NullCode,
    EmptyCode,
    EmptyQuote,
    Unlocatable,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedPair => "malformed_pair",
            Self::IndexOutOfRange => "index_out_of_range",
            Self::NullCode => "null_code",
            Self::EmptyCode => "empty_code",
            Self::EmptyQuote => "empty_quote",
            Self::Unlocatable => "unlocatable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    Dropped(DropReason),
    Located {
        match_type: MatchType,
        score: Option<u8>,
        occurrences: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub entry_index: usize,
    pub pair: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, Default)]
pub struct TaggedAnswer {
    pub text: String,
    pub segments: Vec<MergedSegment>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tags one answer. `answer` and `question_label` must already be the output
/// of [`normalize_answer`] and [`normalize_label`].
pub fn tag_answer(
    answer: &str,
    question_label: &str,
    entries: &[&InitialCodeEntry],
    themes: &ThemeIndex,
    config: &MatchConfig,
) -> TaggedAnswer {
    if answer.is_empty() {
        return TaggedAnswer::default();
    }

    let mut diagnostics = Vec::new();
    let spans = aggregate(
        answer,
        entries,
        themes,
        question_label,
        config,
        &mut diagnostics,
    );
    let segments = merge(&spans, answer);
    let text = render(answer, &segments);

    TaggedAnswer {
        text,
        segments,
        diagnostics,
    }
}
