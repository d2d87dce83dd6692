// Mon Feb 02 2026 - Alex

pub mod logging;

/// Makes `name` usable as a file stem: anything outside `[A-Za-z0-9_.-]`
/// becomes `_`, and the result is capped at `max_len` characters.
pub fn sanitize_file_stem(name: &str, max_len: usize) -> String {
    let mut stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' { c } else { '_' })
        .take(max_len)
        .collect();

    while stem.starts_with('.') {
        stem.remove(0);
    }

    if stem.is_empty() {
        "record".to_string()
    } else {
        stem
    }
}

pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
