// Mon Feb 02 2026 - Alex

use crate::parser::token::Token;
use crate::report::{ChildInfo, LeakKind, LeakRecord};
use indexmap::IndexMap;

/// Records and summary entries reconstructed from one token stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    pub leaks: Vec<LeakRecord>,
    pub summary: IndexMap<String, String>,
}

#[derive(Debug, Clone)]
struct RootFields {
    kind: LeakKind,
    count: Option<u64>,
    human_size: String,
    type_name: String,
    instance_size_bytes: u64,
}

/// The record under construction. A header seeds one without a root so its
/// raw line ends up in the next record's audit trail.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    root: Option<RootFields>,
    children: Vec<ChildInfo>,
    raw_lines: Vec<String>,
}

impl Accumulator {
    fn preamble(raw: String) -> Self {
        Self {
            raw_lines: vec![raw],
            ..Self::default()
        }
    }
}

/// Single forward pass over tokens, one open record at a time.
///
/// All state lives in the builder value, so every parse call gets its own.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    open: Option<Accumulator>,
    leaks: Vec<LeakRecord>,
    summary: IndexMap<String, String>,
    test_name: Option<String>,
    dropped: usize,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_name(mut self, test_name: Option<String>) -> Self {
        self.test_name = test_name;
        self
    }

    pub fn push(&mut self, token: Token) {
        log::trace!("{:?}: {}", token.kind(), token.raw().trim());

        match token {
            Token::Header { raw } => {
                self.flush();
                self.open = Some(Accumulator::preamble(raw));
            }
            Token::Summary { key, value, .. } => {
                self.flush();
                self.summary.insert(key, value);
            }
            Token::TotalLine { .. } => {
                self.flush();
            }
            Token::RootEntry { kind, count, human_size, type_name, instance_size_bytes, raw, .. } => {
                let mut raw_lines = match self.open.take() {
                    Some(acc) if acc.root.is_none() => acc.raw_lines,
                    other => {
                        self.open = other;
                        self.flush();
                        Vec::new()
                    }
                };
                raw_lines.push(raw);

                self.open = Some(Accumulator {
                    root: Some(RootFields {
                        kind,
                        count,
                        human_size,
                        type_name,
                        instance_size_bytes,
                    }),
                    children: Vec::new(),
                    raw_lines,
                });
            }
            Token::ChildEntry { count, human_size, field_name, type_name, instance_size_bytes, raw, .. } => {
                match self.open.as_mut().filter(|acc| acc.root.is_some()) {
                    Some(acc) => {
                        acc.children.push(ChildInfo {
                            count,
                            human_size,
                            field_name,
                            type_name,
                            instance_size_bytes,
                        });
                        acc.raw_lines.push(raw);
                    }
                    None => log::trace!("Dropping orphan child line: {}", raw.trim()),
                }
            }
            Token::Frame { raw } | Token::Unknown { raw } => {
                if let Some(acc) = self.open.as_mut() {
                    acc.raw_lines.push(raw);
                }
            }
        }
    }

    pub fn finish(mut self) -> BuildOutput {
        self.flush();

        if self.dropped > 0 {
            log::debug!("Discarded {} incomplete record(s)", self.dropped);
        }

        BuildOutput {
            leaks: self.leaks,
            summary: self.summary,
        }
    }

    fn flush(&mut self) {
        let Some(acc) = self.open.take() else {
            return;
        };

        let Some(root) = acc.root else {
            return;
        };

        match root.count {
            Some(count) if !root.type_name.is_empty() => {
                self.leaks.push(LeakRecord {
                    kind: root.kind,
                    root_count: count,
                    root_human_size: root.human_size,
                    root_type_name: root.type_name,
                    root_instance_size_bytes: root.instance_size_bytes,
                    children: acc.children,
                    raw_lines: acc.raw_lines,
                    test_name: self.test_name.clone(),
                });
            }
            _ => {
                self.dropped += 1;
                log::trace!("Dropping root without count or type name: {:?}", acc.raw_lines.last());
            }
        }
    }
}

pub fn build<I>(tokens: I, test_name: Option<&str>) -> BuildOutput
where
    I: IntoIterator<Item = Token>,
{
    tokens
        .into_iter()
        .fold(
            HierarchyBuilder::new().with_test_name(test_name.map(str::to_string)),
            |mut builder, token| {
                builder.push(token);
                builder
            },
        )
        .finish()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::parser::tokenizer::{tokenize, ROOT_CYCLE_MARKER, ROOT_LEAK_MARKER};
    use proptest::prelude::*;

    fn line_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[0-9]{1,3} \\([0-9.]{1,4}K\\) ROOT LEAK: <[A-Za-z<>,]{0,12} 0x[0-9a-f]{1,8}> \\[[0-9]{1,3}\\]",
            "[0-9]{1,3} \\([0-9]{1,3} bytes\\) ROOT CYCLE: <[A-Za-z]{0,8} 0x[0-9a-f]{1,8}> \\[[0-9]{1,3}\\]",
            "( {3}){1,3}[0-9]{1,3} \\([0-9]{1,3} bytes\\) [a-z_]{0,8} --> <[A-Za-z]{1,8} 0x[0-9a-f]{1,4}> \\[[0-9]{1,3}\\]",
            "( {3}){1,3}[0-9]{1,3} \\([0-9]{1,3} bytes\\) 0x[0-9a-f]{1,8} \\[[0-9]{1,3}\\]",
            "[0-9]{1,4} \\([0-9]{1,3}K\\) << TOTAL >>",
            "[A-Za-z ]{1,12}: [A-Za-z0-9 ]{0,12}",
            "\\PC{0,40}",
        ]
    }

    proptest! {
        #[test]
        fn records_never_exceed_root_lines(lines in prop::collection::vec(line_strategy(), 0..40)) {
            let text = lines.join("\n");
            let roots = text
                .lines()
                .filter(|l| l.contains(ROOT_LEAK_MARKER) || l.contains(ROOT_CYCLE_MARKER))
                .count();

            let out = build(tokenize(&text), None);

            prop_assert!(out.leaks.len() <= roots);
            prop_assert!(out.leaks.iter().all(|r| !r.root_type_name.is_empty()));
        }

        #[test]
        fn total_lines_never_reach_records(lines in prop::collection::vec(line_strategy(), 0..40)) {
            let text = lines.join("\n");
            let out = build(tokenize(&text), None);

            for record in &out.leaks {
                prop_assert!(record.raw_lines.iter().all(|l| !l.contains("<< TOTAL >>")));
            }
        }

        #[test]
        fn depth_is_indent_over_three(indent in 0usize..30, count in 1u32..500) {
            let line = format!("{}{} (1K) field --> <T 0x1> [8]", " ".repeat(indent), count);
            match crate::parser::tokenizer::classify(&line) {
                Token::ChildEntry { depth, .. } => prop_assert_eq!(depth, indent / 3),
                other => prop_assert!(false, "expected child entry, got {:?}", other),
            }
        }
    }
}
