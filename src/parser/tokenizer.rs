// Mon Feb 02 2026 - Alex

use crate::parser::extract::{self, SizePrefix};
use crate::parser::token::Token;
use crate::report::LeakKind;
use once_cell::sync::Lazy;
use regex::Regex;

pub const ROOT_LEAK_MARKER: &str = "ROOT LEAK:";
pub const ROOT_CYCLE_MARKER: &str = "ROOT CYCLE:";
pub const TOTAL_MARKER: &str = "<< TOTAL >>";
pub const OWNERSHIP_ARROW: &str = "-->";

static BARE_CHILD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\s+\(.+\).*\s0x[0-9A-Fa-f]+.*\[.*\]").expect("bare child pattern")
});

static PROCESS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Process\s+\d+|leaks Report Version)").expect("process header pattern")
});

/// Classifies every non-blank line of `raw`, in order.
pub fn tokenize(raw: &str) -> Vec<Token> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(classify)
        .collect()
}

/// Classifies a single line. First matching rule wins.
pub fn classify(line: &str) -> Token {
    let trimmed = line.trim();
    let raw = line.to_string();

    if let Some(pos) = trimmed.find(ROOT_LEAK_MARKER) {
        return root_entry(trimmed, pos, ROOT_LEAK_MARKER, LeakKind::Leak, raw);
    }
    if let Some(pos) = trimmed.find(ROOT_CYCLE_MARKER) {
        return root_entry(trimmed, pos, ROOT_CYCLE_MARKER, LeakKind::Cycle, raw);
    }
    if trimmed.contains(TOTAL_MARKER) {
        let prefix = extract::size_prefix(trimmed);
        return Token::TotalLine {
            count: prefix.count.unwrap_or(0),
            human_size: prefix.human_size,
            raw,
        };
    }
    if let Some(arrow) = trimmed.find(OWNERSHIP_ARROW) {
        return named_child(line, trimmed, arrow, raw);
    }
    if BARE_CHILD.is_match(trimmed) {
        return bare_child(line, trimmed, raw);
    }
    if PROCESS_HEADER.is_match(trimmed) {
        return Token::Header { raw };
    }
    if let Some((key, value)) = trimmed.split_once(':') {
        return Token::Summary {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
            raw,
        };
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return Token::Frame { raw };
    }

    Token::Unknown { raw }
}

fn root_entry(trimmed: &str, marker_pos: usize, marker: &str, kind: LeakKind, raw: String) -> Token {
    let prefix = extract::size_prefix(&trimmed[..marker_pos]);
    let remainder = &trimmed[marker_pos + marker.len()..];
    let (type_name, address) = extract::type_and_address(remainder);

    Token::RootEntry {
        kind,
        count: prefix.count,
        human_size: prefix.human_size,
        type_name,
        address,
        instance_size_bytes: extract::instance_size(trimmed),
        raw,
    }
}

fn named_child(line: &str, trimmed: &str, arrow: usize, raw: String) -> Token {
    let head = &trimmed[..arrow];
    let prefix = extract::size_prefix(head);
    let field_start = field_start(head, &prefix);
    let (field_name, field_offset) = extract::split_field(&head[field_start..]);
    let (type_name, address) = extract::type_and_address(&trimmed[arrow + OWNERSHIP_ARROW.len()..]);

    Token::ChildEntry {
        depth: extract::depth(line),
        count: prefix.count.unwrap_or(0),
        human_size: prefix.human_size,
        field_name,
        field_offset,
        type_name,
        address,
        instance_size_bytes: extract::instance_size(trimmed),
        raw,
    }
}

fn bare_child(line: &str, trimmed: &str, raw: String) -> Token {
    let prefix = extract::size_prefix(trimmed);
    let remainder = &trimmed[prefix.end..];

    let (type_name, address) = if remainder.contains('<') {
        extract::type_and_address(remainder)
    } else {
        let address = extract::find_address(remainder).unwrap_or_default();
        (String::new(), address.to_string())
    };

    Token::ChildEntry {
        depth: extract::depth(line),
        count: prefix.count.unwrap_or(0),
        human_size: prefix.human_size,
        field_name: String::new(),
        field_offset: None,
        type_name,
        address,
        instance_size_bytes: extract::instance_size(trimmed),
        raw,
    }
}

// Without a size parenthesis the field text starts after the count, if any.
fn field_start(head: &str, prefix: &SizePrefix) -> usize {
    if prefix.end > 0 || prefix.count.is_none() {
        return prefix.end;
    }

    let lead = head.len() - head.trim_start().len();
    head[lead..]
        .find(char::is_whitespace)
        .map(|i| lead + i)
        .unwrap_or(head.len())
}
