// Mon Feb 02 2026 - Alex

//! Turns `leaks` text output into a [`Report`].
//!
//! Parsing happens in two steps. The tokenizer classifies each line on its
//! own, then the [`HierarchyBuilder`] walks the tokens once and groups child
//! lines under the root entry above them. Neither step fails: lines that do
//! not fit are kept as raw text or skipped, and an empty report is a normal
//! result.

pub mod builder;
pub mod extract;
pub mod token;
pub mod tokenizer;

pub use builder::{build, BuildOutput, HierarchyBuilder};
pub use token::{Token, TokenKind};
pub use tokenizer::{classify, tokenize};

use crate::report::{InvocationParams, Report};
use crate::utils::logging::scoped_timer;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct LeakParser {
    test_name: Option<String>,
}

impl LeakParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every record of each parse with `name`, e.g. the test case that
    /// triggered the capture.
    pub fn with_test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    pub fn parse(&self, raw: &str, params: InvocationParams, invoked_at: DateTime<Utc>) -> Report {
        let _timer = scoped_timer("parse");

        let tokens = tokenize(raw);
        log::debug!("Tokenized {} non-blank line(s)", tokens.len());

        let out = build(tokens, self.test_name.as_deref());
        log::debug!(
            "Reconstructed {} record(s) and {} summary entr(ies)",
            out.leaks.len(),
            out.summary.len()
        );

        Report::new(params, invoked_at, out.leaks, out.summary, raw.to_string())
    }
}

/// Parses `raw` with no test name, stamped with the current time.
pub fn parse(raw: &str, params: InvocationParams) -> Report {
    LeakParser::new().parse(raw, params, Utc::now())
}
