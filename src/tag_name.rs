/// Split the user identifier off the start of a tag's text.
///
/// Returns the identifier and the remaining text. Handles the optional
/// parameter syntax `[name=default]`, backtick quoted names, and a `-`
/// separator between the name and its description.
pub fn extract_tag_name(text: &str) -> (String, String) {
    let rest = text.trim_start();

    let (name, end) = if rest.starts_with('[') {
        let mut depth = 0usize;
        let mut close = rest.len();
        for (i, c) in rest.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        close = i;
                        break;
                    }
                }
                _ => (),
            }
        }

        let inner = &rest[1..close];
        let name = inner.split_once('=').map_or(inner, |(name, _)| name);
        (name.trim(), (close + 1).min(rest.len()))
    } else if let Some((name, _)) = rest.strip_prefix('`').and_then(|q| q.split_once('`')) {
        (name, name.len() + 2)
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], end)
    };

    let remaining = rest[end..].trim_start();
    let remaining = match remaining.strip_prefix('-') {
        Some(r) if r.is_empty() || r.starts_with(char::is_whitespace) => r.trim_start(),
        _ => remaining,
    };

    (name.to_owned(), remaining.to_owned())
}
