use std::collections::BTreeSet;

use super::aggregate::LocatedSpan;

pub const CODE_SEPARATOR: &str = "&&";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSegment {
    pub start: usize,
    pub end: usize,
    pub text_to_code: String,
    pub final_combined_codes: String,
}

struct OpenSegment {
    start: usize,
    end: usize,
    codes: BTreeSet<String>,
}

impl OpenSegment {
    fn from_span(span: &LocatedSpan) -> Self {
        Self {
            start: span.start,
            end: span.end,
            codes: span.codes.clone(),
        }
    }

    fn close(self, answer: &str) -> MergedSegment {
        MergedSegment {
            start: self.start,
            end: self.end,
            text_to_code: answer
                .get(self.start..self.end)
                .unwrap_or_default()
                .to_string(),
            final_combined_codes: join_codes(&self.codes),
        }
    }
}

pub fn merge(sorted_spans: &[LocatedSpan], answer: &str) -> Vec<MergedSegment> {
    let mut merged = Vec::<MergedSegment>::new();
    let mut current: Option<OpenSegment> = None;

    for span in sorted_spans {
        current = Some(match current.take() {
            None => OpenSegment::from_span(span),
            Some(mut open) if span.start < open.end => {
                open.end = open.end.max(span.end);
                open.codes.extend(span.codes.iter().cloned());
                open
            }
            Some(open) => {
                merged.push(open.close(answer));
                OpenSegment::from_span(span)
            }
        });
    }

    if let Some(open) = current {
        merged.push(open.close(answer));
    }

    merged
}

pub fn join_codes(codes: &BTreeSet<String>) -> String {
    codes
        .iter()
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join(CODE_SEPARATOR)
}
