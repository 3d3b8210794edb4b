use std::collections::{BTreeSet, HashMap};

use crate::model::InitialCodeEntry;

use super::locate::locate;
use super::normalize::{normalize_label, normalize_quote};
use super::resolve::{ThemeIndex, resolve};
use super::{Diagnostic, DiagnosticKind, DropReason, MatchConfig};

const NULL_CODE: &str = "NULL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSpan {
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    pub codes: BTreeSet<String>,
}

pub fn aggregate(
    answer: &str,
    entries: &[&InitialCodeEntry],
    themes: &ThemeIndex,
    question_label: &str,
    config: &MatchConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<LocatedSpan> {
    let mut spans = Vec::<LocatedSpan>::new();
    let mut span_lookup = HashMap::<(usize, usize), usize>::new();

    for (entry_index, entry) in entries.iter().enumerate() {
        for pair in &entry.pairs {
            let mut skip = |reason: DropReason| {
                diagnostics.push(Diagnostic {
                    entry_index,
                    pair: pair.clone(),
                    kind: DiagnosticKind::Dropped(reason),
                });
            };

            let (code_index, quote_index) = match parse_pair(pair) {
                Some(indices) => indices,
                None => {
                    skip(DropReason::MalformedPair);
                    continue;
                }
            };
            let (Some(raw_code), Some(raw_quote)) = (
                index_one_based(&entry.code_name, code_index),
                index_one_based(&entry.supporting_quote, quote_index),
            ) else {
                skip(DropReason::IndexOutOfRange);
                continue;
            };

            if raw_code.eq_ignore_ascii_case(NULL_CODE) {
                skip(DropReason::NullCode);
                continue;
            }
            if raw_quote.trim().is_empty() {
                skip(DropReason::EmptyQuote);
                continue;
            }

            let code_name = normalize_label(raw_code);
            if code_name.is_empty() {
                skip(DropReason::EmptyCode);
                continue;
            }
            let quote = normalize_quote(raw_quote);
            if quote.is_empty() {
                skip(DropReason::EmptyQuote);
                continue;
            }

            let matches = locate(answer, &quote, config);
            if matches.is_empty() {
                skip(DropReason::Unlocatable);
                continue;
            }

            diagnostics.push(Diagnostic {
                entry_index,
                pair: pair.clone(),
                kind: DiagnosticKind::Located {
                    match_type: matches[0].match_type,
                    score: matches[0].score,
                    occurrences: matches.len(),
                },
            });

            let hierarchical_code = resolve(question_label, &code_name, themes);
            for found in matches {
                let slot = *span_lookup
                    .entry((found.start, found.end))
                    .or_insert_with(|| {
                        spans.push(LocatedSpan {
                            start: found.start,
                            end: found.end,
                            matched_text: found.matched_text.clone(),
                            codes: BTreeSet::new(),
                        });
                        spans.len() - 1
                    });
                spans[slot].codes.insert(hierarchical_code.clone());
            }
        }
    }

    spans.retain(|span| !span.codes.is_empty());
    spans.sort_by_key(|span| span.start);
    spans
}

pub fn parse_pair(pair: &str) -> Option<(i64, i64)> {
    let mut parts = pair.split('-');
    let (Some(code), Some(quote), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };

    let code = code.trim().parse::<i64>().ok()?;
    let quote = quote.trim().parse::<i64>().ok()?;
    Some((code, quote))
}

fn index_one_based(values: &[String], index: i64) -> Option<&str> {
    let zero_based = usize::try_from(index.checked_sub(1)?).ok()?;
    values.get(zero_based).map(String::as_str)
}
