use serde_json::Value;

/// Lowercase prefixes of lines that echo the prompt or wrap the answer.
///
/// English only; other prompt templates will leak through.
const BOILERPLATE_PREFIXES: &[&str] = &[
    "translate this",
    "translate the following",
    "translation:",
    "translated text:",
    "the translation",
    "here is",
    "here's",
    "sure,",
    "sure!",
    "certainly",
    "of course",
    "note:",
    "explanation:",
    "output:",
];

const MAX_LABEL_CHARS: usize = 24;

/// Recover the translated string from the accumulated model output.
///
/// A JSON object with a `translation` string wins outright. Otherwise the text
/// after the last `<target_language>:` label is used, and failing that the last
/// line that does not look like prompt boilerplate.
pub fn extract_translation(output: &str, target_language: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(translation) = structured_translation(trimmed) {
        return translation;
    }

    let label = format!("{target_language}:");
    if let Some(rest) = text_after_last_label(trimmed, &label) {
        let rest = rest.trim();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_boilerplate(line))
        .filter(|line| !is_short_label(line))
        .last()
        .unwrap_or(trimmed)
        .to_string()
}

fn structured_translation(text: &str) -> Option<String> {
    translation_field(text).or_else(|| {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if start < end {
            translation_field(&text[start..=end])
        } else {
            None
        }
    })
}

fn translation_field(candidate: &str) -> Option<String> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    value
        .get("translation")?
        .as_str()
        .map(|s| s.trim().to_string())
}

/// Slice following the last case-insensitive occurrence of `label`
fn text_after_last_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let needle = label.to_lowercase();
    let len = label.len();

    text.char_indices().rev().find_map(|(i, _)| {
        let window = text.get(i..i + len)?;
        if window.to_lowercase() == needle {
            Some(&text[i + len..])
        } else {
            None
        }
    })
}

fn is_boilerplate(line: &str) -> bool {
    let lower = line.to_lowercase();
    BOILERPLATE_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// `French:`, `Target language:` and similar lines carrying no content
fn is_short_label(line: &str) -> bool {
    let Some(head) = line.strip_suffix(':') else {
        return false;
    };
    let count = head.chars().count();
    (1..=MAX_LABEL_CHARS).contains(&count)
        && head.chars().all(|c| c.is_alphabetic() || c.is_whitespace())
}
