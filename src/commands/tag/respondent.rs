use super::*;

#[derive(Debug, Clone)]
pub(super) struct RespondentIdParser {
    digits: Regex,
}

impl RespondentIdParser {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            digits: Regex::new(r"[0-9]+").context("failed to compile respondent id regex")?,
        })
    }

    pub(super) fn normalize(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return Some(trimmed.to_string());
        }

        self.digits
            .find(trimmed)
            .map(|found| found.as_str().to_string())
    }
}
