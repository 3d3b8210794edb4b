const LINE_BREAKS: &[&str] = &["\r\n", "\n", "\r", "\\n", "\\r"];
const TABS: &[&str] = &["\t", "\\t"];

const TAG_MARKER: char = '#';

const LABEL_PUNCTUATION: &[(char, &str)] = &[
    ('？', "?"),
    ('！', "!"),
    ('：', ":"),
    ('；', ";"),
    ('，', ","),
    ('。', "."),
    ('（', "("),
    ('）', ")"),
    ('【', "["),
    ('】', "]"),
    ('《', "<"),
    ('》', ">"),
    ('…', "..."),
    ('—', "-"),
    ('～', "~"),
    ('·', "."),
];

const LABEL_QUOTES: &[char] = &['"', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'];

const TRAILING_LABEL_PUNCTUATION: &[char] = &['.', '!', '?', ':', ';', ','];

pub fn normalize_answer(text: &str) -> String {
    normalize_with_line_breaks(text, "")
}

pub fn normalize_quote(text: &str) -> String {
    normalize_with_line_breaks(text, " ")
}

pub fn normalize_label(text: &str) -> String {
    let base = normalize_quote(text);

    let mut folded = String::with_capacity(base.len());
    for ch in base.chars() {
        if ch == '\\' {
            folded.push('/');
        } else if LABEL_QUOTES.contains(&ch) {
            folded.push('\'');
        } else if let Some((_, halfwidth)) = LABEL_PUNCTUATION.iter().find(|(full, _)| *full == ch)
        {
            folded.push_str(halfwidth);
        } else {
            folded.push(ch);
        }
    }

    condense_whitespace(&folded)
        .trim_end_matches(|ch: char| ch.is_whitespace() || TRAILING_LABEL_PUNCTUATION.contains(&ch))
        .to_string()
}

pub fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn normalize_with_line_breaks(text: &str, line_break: &str) -> String {
    let mut cleaned = text.to_string();
    cleaned.retain(|ch| ch != TAG_MARKER);
    loop {
        let mut replaced = cleaned.clone();
        for pattern in LINE_BREAKS {
            replaced = replaced.replace(pattern, line_break);
        }
        if replaced == cleaned {
            break;
        }
        cleaned = replaced;
    }
    for pattern in TABS {
        cleaned = cleaned.replace(pattern, " ");
    }

    condense_whitespace(&cleaned)
}
