use super::MatchConfig;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatchType {
    Exact,
    Fuzzy,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteMatch {
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    pub match_type: MatchType,
    pub score: Option<u8>,
}

pub fn locate(haystack: &str, needle: &str, config: &MatchConfig) -> Vec<QuoteMatch> {
    if needle.is_empty() {
        return Vec::new();
    }

    let exact = haystack
        .match_indices(needle)
        .map(|(start, matched)| QuoteMatch {
            start,
            end: start + matched.len(),
            matched_text: matched.to_string(),
            match_type: MatchType::Exact,
            score: None,
        })
        .collect::<Vec<QuoteMatch>>();
    if !exact.is_empty() {
        return exact;
    }

    locate_fuzzy(haystack, needle, config).into_iter().collect()
}

fn locate_fuzzy(haystack: &str, needle: &str, config: &MatchConfig) -> Option<QuoteMatch> {
    let needle_len = needle.chars().count();
    if needle_len < config.min_fuzzy_chars {
        return None;
    }

    let folded_needle = fold_for_scoring(needle);
    if folded_needle.is_empty() {
        return None;
    }
    let folded_len = folded_needle.len();

    let slack = (needle_len as f64 * config.length_tolerance) as usize;
    let min_len = needle_len.saturating_sub(slack).max(config.min_fuzzy_chars);
    let max_len = needle_len + slack;

    let folded_haystack = haystack.chars().map(fold_char).collect::<Vec<char>>();
    let boundaries = haystack
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(haystack.len()))
        .collect::<Vec<usize>>();

    let mut best: Option<(u8, usize, usize)> = None;
    let mut previous = vec![0usize; folded_len + 1];
    let mut current = vec![0usize; folded_len + 1];

    for start in 0..folded_haystack.len() {
        let limit = (start + max_len).min(folded_haystack.len());
        if limit - start < min_len {
            break;
        }

        let Some(first) = (start..limit).find(|&index| folded_haystack[index] != ' ') else {
            continue;
        };

        // Scored text is the window with folded blanks trimmed from both ends.
        previous.fill(0);
        let mut trimmed = (0usize, first);
        for end in first..limit {
            let hay_char = folded_haystack[end];
            current[0] = 0;
            for (j, &needle_char) in folded_needle.iter().enumerate() {
                current[j + 1] = if hay_char == needle_char {
                    previous[j] + 1
                } else {
                    previous[j + 1].max(current[j])
                };
            }
            std::mem::swap(&mut previous, &mut current);

            if hay_char != ' ' {
                trimmed = (previous[folded_len], end + 1);
            }
            if end + 1 - start < min_len {
                continue;
            }

            let (lcs, trimmed_end) = trimmed;
            let score = similarity_score(lcs, trimmed_end - first, folded_len);
            if score < config.fuzzy_threshold {
                continue;
            }
            if best.is_none_or(|(best_score, _, _)| score > best_score) {
                best = Some((score, first, trimmed_end));
            }
        }
    }

    best.map(|(score, start_char, end_char)| {
        let start = boundaries[start_char];
        let end = boundaries[end_char];
        QuoteMatch {
            start,
            end,
            matched_text: haystack[start..end].to_string(),
            match_type: MatchType::Fuzzy,
            score: Some(score),
        }
    })
}

fn fold_char(ch: char) -> char {
    if !ch.is_alphanumeric() && ch != '_' {
        return ' ';
    }

    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

fn fold_for_scoring(text: &str) -> Vec<char> {
    let folded = text.chars().map(fold_char).collect::<Vec<char>>();
    let Some(first) = folded.iter().position(|&ch| ch != ' ') else {
        return Vec::new();
    };
    let last = folded.iter().rposition(|&ch| ch != ' ').unwrap_or(first);
    folded[first..=last].to_vec()
}

pub(super) fn similarity_score(lcs: usize, left_len: usize, right_len: usize) -> u8 {
    let total = left_len + right_len;
    if total == 0 {
        return 100;
    }
    ((200 * lcs) as f64 / total as f64).round_ties_even() as u8
}

#[cfg(test)]
pub(super) fn similarity(left: &str, right: &str) -> u8 {
    let left = fold_for_scoring(left);
    let right = fold_for_scoring(right);
    let mut table = vec![vec![0usize; right.len() + 1]; left.len() + 1];
    for (i, l) in left.iter().enumerate() {
        for (j, r) in right.iter().enumerate() {
            table[i + 1][j + 1] = if l == r {
                table[i][j] + 1
            } else {
                table[i][j + 1].max(table[i + 1][j])
            };
        }
    }
    similarity_score(table[left.len()][right.len()], left.len(), right.len())
}
