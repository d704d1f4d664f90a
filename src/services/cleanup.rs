/// Remove a Markdown code fence wrapped around model output.
///
/// Handles a leading ```` ``` ```` with an optional language tag and a
/// trailing ```` ``` ````. The tag is whatever follows the opening fence on
/// its line, unless that line already starts the JSON payload. Text without
/// fences is only trimmed.
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.split_once('\n') {
            Some((tag, body)) if !tag.trim_start().starts_with(|ch: char| ch == '{' || ch == '[') => body,
            _ => rest,
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim().to_string()
}
