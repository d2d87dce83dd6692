// Mon Feb 02 2026 - Alex

//! Low-level field extractors shared by the tokenizer.
//!
//! None of these fail. A field that does not parse comes back as `None`, `0`
//! or an empty string and the caller moves on.

pub const POINTER_PREFIX: &str = "0x";
pub const INDENT_WIDTH: usize = 3;

/// `<count> (<human size>)` at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SizePrefix {
    pub count: Option<u64>,
    pub human_size: String,
    /// Byte offset just past the closing parenthesis, or 0 when there is none.
    pub end: usize,
}

pub fn size_prefix(line: &str) -> SizePrefix {
    let count = line
        .split_whitespace()
        .next()
        .and_then(|tok| tok.parse::<u64>().ok());

    let mut prefix = SizePrefix {
        count,
        ..SizePrefix::default()
    };

    if let Some(open) = line.find('(') {
        if let Some(close) = matching_close(line, open, '(', ')') {
            prefix.human_size = line[open + 1..close].trim().to_string();
            prefix.end = close + 1;
        }
    }

    prefix
}

/// Index of the bracket closing the one at `open`, tracking nesting depth.
pub fn matching_close(s: &str, open: usize, open_ch: char, close_ch: char) -> Option<usize> {
    let mut depth = 0usize;

    for (i, c) in s[open..].char_indices() {
        if c == open_ch {
            depth += 1;
        } else if c == close_ch {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(open + i);
            }
        }
    }

    None
}

/// Contents of the first outermost `<...>` span, brackets excluded.
///
/// Type names can be parameterized (`Outer<Inner<T>>`), so the span ends at
/// the `>` that brings the depth back to zero rather than the first one.
pub fn angle_span(s: &str) -> Option<&str> {
    let open = s.find('<')?;
    let close = matching_close(s, open, '<', '>')?;
    Some(&s[open + 1..close])
}

/// Splits the inside of an angle span into `(type_name, address)`.
pub fn split_type_and_address(inner: &str) -> (String, String) {
    let spans = word_spans(inner);

    match spans.iter().rposition(|(_, word)| word.starts_with(POINTER_PREFIX)) {
        Some(idx) => {
            let (start, address) = spans[idx];
            (inner[..start].trim().to_string(), address.to_string())
        }
        None => (inner.trim().to_string(), String::new()),
    }
}

/// `(type_name, address)` from the first angle span in `s`, or empty strings.
pub fn type_and_address(s: &str) -> (String, String) {
    angle_span(s)
        .map(split_type_and_address)
        .unwrap_or_default()
}

/// Integer inside the last `[...]` pair on the line, 0 otherwise.
pub fn instance_size(line: &str) -> u64 {
    let Some(open) = line.rfind('[') else {
        return 0;
    };

    line[open + 1..]
        .find(']')
        .and_then(|len| line[open + 1..open + 1 + len].trim().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Splits `name + 16` into the field name and its offset.
pub fn split_field(segment: &str) -> (String, Option<u64>) {
    match segment.split_once('+') {
        Some((name, rest)) => {
            let offset = rest
                .split_whitespace()
                .next()
                .and_then(|tok| tok.parse::<u64>().ok());
            (name.trim().to_string(), offset)
        }
        None => (segment.trim().to_string(), None),
    }
}

pub fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

pub fn depth(line: &str) -> usize {
    leading_spaces(line) / INDENT_WIDTH
}

/// First whitespace-delimited word that looks like a pointer.
pub fn find_address(s: &str) -> Option<&str> {
    s.split_whitespace().find(|word| word.starts_with(POINTER_PREFIX))
}

fn word_spans(s: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut start = None;

    for (i, c) in s.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(st)) => {
                spans.push((st, &s[st..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }

    if let Some(st) = start {
        spans.push((st, &s[st..]));
    }

    spans
}
