use super::merge::MergedSegment;
use super::normalize::condense_whitespace;

pub const OPEN_MARKER: &str = "#CODE ";
pub const CODE_TEXT_SEPARATOR: &str = "#";
pub const CLOSE_MARKER: &str = "#ENDCODE#";

pub fn render(answer: &str, segments: &[MergedSegment]) -> String {
    if segments.is_empty() {
        return answer.to_string();
    }

    let mut rendered = String::with_capacity(answer.len() + segments.len() * 64);
    let mut cursor = 0usize;

    for segment in segments {
        if segment.start > cursor {
            rendered.push_str(answer.get(cursor..segment.start).unwrap_or_default());
        }
        rendered.push_str(&tag_block(
            &segment.final_combined_codes,
            &segment.text_to_code,
        ));
        cursor = cursor.max(segment.end);
    }

    if cursor < answer.len() {
        rendered.push_str(answer.get(cursor..).unwrap_or_default());
    }

    rendered
}

pub fn tag_block(combined_codes: &str, covered_text: &str) -> String {
    format!(
        "{OPEN_MARKER}{combined_codes}{CODE_TEXT_SEPARATOR}{}{CLOSE_MARKER}",
        condense_whitespace(covered_text)
    )
}
