//! Pulling a JSON payload out of free-form model output.

/// Extract JSON from a response that might have markdown code blocks or extra text.
///
/// Tries a ```json fence, then a plain ``` fence, then the outermost `{...}` or
/// `[...]`. Returns the trimmed input when nothing better is found.
pub fn extract_json(response: &str) -> &str {
    if let Some(start) = response.find("```json") {
        let body = &response[start + 7..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }

    if let Some(start) = response.find("```") {
        let body = &response[start + 3..];
        if let Some(end) = body.find("```") {
            let content = body[..end].trim();
            // Skip a language identifier line such as "JSON"
            if let Some(newline_pos) = content.find('\n') {
                let first_line = &content[..newline_pos];
                if !first_line.starts_with(['{', '[']) {
                    return content[newline_pos + 1..].trim();
                }
            }
            return content;
        }
    }

    let object = span(response, '{', '}');
    let array = span(response, '[', ']');
    match (object, array) {
        (Some(o), Some(a)) => {
            // Whichever opens first encloses the other
            if o.0 <= a.0 {
                &response[o.0..=o.1]
            } else {
                &response[a.0..=a.1]
            }
        }
        (Some(o), None) => &response[o.0..=o.1],
        (None, Some(a)) => &response[a.0..=a.1],
        (None, None) => response.trim(),
    }
}

fn span(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then_some((start, end))
}
