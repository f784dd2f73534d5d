use std::sync::LazyLock;
use regex::Regex;
use crate::models::CONTENT_NOT_AVAILABLE;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<]+?>").expect("tag pattern"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

const ENTITIES: [(&str, &str); 4] = [("&nbsp;", " "), ("&amp;", "&"), ("&lt;", "<"), ("&gt;", ">")];

fn strip_once(text: &str) -> String {
    let mut out = TAG_RE.replace_all(text, "").into_owned();
    for (entity, plain) in ENTITIES {
        out = out.replace(entity, plain);
    }
    SPACE_RE.replace_all(&out, " ").trim().to_string()
}

/// Plain text for the slide deck: tags removed, common entities decoded,
/// whitespace collapsed. Repeated until stable, so applying it twice is a no-op.
pub fn strip_markup(text: &str) -> String {
    let mut current = strip_once(text);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

pub fn clean_narrative(text: Option<&str>) -> String {
    let cleaned = text.map(strip_markup).unwrap_or_default();
    if cleaned.is_empty() {
        CONTENT_NOT_AVAILABLE.to_string()
    } else {
        cleaned
    }
}

/// Non-blank lines with leading bullet markers removed.
pub fn insight_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['•', '-', '*']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
