// Mon Feb 02 2026 - Alex

use crate::report::LeakKind;

/// One classified line of `leaks` output.
///
/// Every variant keeps the line exactly as it appeared in the input so the
/// builder can carry it into a record's audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Header {
        raw: String,
    },
    Summary {
        key: String,
        value: String,
        raw: String,
    },
    RootEntry {
        kind: LeakKind,
        count: Option<u64>,
        human_size: String,
        type_name: String,
        address: String,
        instance_size_bytes: u64,
        raw: String,
    },
    ChildEntry {
        depth: usize,
        count: u64,
        human_size: String,
        field_name: String,
        field_offset: Option<u64>,
        type_name: String,
        address: String,
        instance_size_bytes: u64,
        raw: String,
    },
    TotalLine {
        count: u64,
        human_size: String,
        raw: String,
    },
    /// Digit-led line in the older stack-frame style. Carries no fields.
    Frame {
        raw: String,
    },
    Unknown {
        raw: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Header,
    Summary,
    RootEntry,
    ChildEntry,
    TotalLine,
    Frame,
    Unknown,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Header { .. } => TokenKind::Header,
            Token::Summary { .. } => TokenKind::Summary,
            Token::RootEntry { .. } => TokenKind::RootEntry,
            Token::ChildEntry { .. } => TokenKind::ChildEntry,
            Token::TotalLine { .. } => TokenKind::TotalLine,
            Token::Frame { .. } => TokenKind::Frame,
            Token::Unknown { .. } => TokenKind::Unknown,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Token::Header { raw }
            | Token::Summary { raw, .. }
            | Token::RootEntry { raw, .. }
            | Token::ChildEntry { raw, .. }
            | Token::TotalLine { raw, .. }
            | Token::Frame { raw }
            | Token::Unknown { raw } => raw,
        }
    }
}
