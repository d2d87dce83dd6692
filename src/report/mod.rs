// Mon Feb 02 2026 - Alex

pub mod json;

use crate::error::LeakError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeakKind {
    #[serde(rename = "ROOT_LEAK")]
    Leak,
    #[serde(rename = "ROOT_CYCLE")]
    Cycle,
}

impl LeakKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeakKind::Leak => "ROOT_LEAK",
            LeakKind::Cycle => "ROOT_CYCLE",
        }
    }
}

impl fmt::Display for LeakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeakKind::Leak => write!(f, "ROOT LEAK"),
            LeakKind::Cycle => write!(f, "ROOT CYCLE"),
        }
    }
}

/// An object retained by a root, in ownership-chain order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildInfo {
    pub count: u64,
    #[serde(rename = "sizeHumanReadable")]
    pub human_size: String,
    pub field_name: String,
    pub type_name: String,
    pub instance_size_bytes: u64,
}

/// One root leak or root cycle with everything it retains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeakRecord {
    #[serde(rename = "leakType")]
    pub kind: LeakKind,
    pub root_count: u64,
    #[serde(rename = "rootSizeHumanReadable")]
    pub root_human_size: String,
    pub root_type_name: String,
    pub root_instance_size_bytes: u64,
    pub children: Vec<ChildInfo>,
    /// Source lines of this record, verbatim. Written as a separate artifact,
    /// not part of the JSON document.
    #[serde(skip)]
    pub raw_lines: Vec<String>,
    pub test_name: Option<String>,
}

impl LeakRecord {
    pub fn is_cycle(&self) -> bool {
        self.kind == LeakKind::Cycle
    }

    pub fn raw_text(&self) -> String {
        self.raw_lines.join("\n")
    }
}

/// What the analysis tool was pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationParams {
    #[serde(rename = "targetProcess")]
    pub target: String,
    pub device_id: Option<String>,
    pub excluded_symbols: Vec<String>,
}

impl InvocationParams {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_excluded_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    pub fn validate(&self) -> Result<(), LeakError> {
        if self.target.trim().is_empty() {
            return Err(LeakError::InvalidParams("target process must not be empty".to_string()));
        }
        if self.device_id.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(LeakError::InvalidParams("device identifier must not be blank".to_string()));
        }
        if self.excluded_symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(LeakError::InvalidParams("excluded symbols must not be blank".to_string()));
        }
        Ok(())
    }
}

/// Parsed result of one tool invocation. Never mutated once built; the
/// filters hand back new reports that share the same records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    params: InvocationParams,
    invocation_time: DateTime<Utc>,
    leaks: Vec<Arc<LeakRecord>>,
    summary: IndexMap<String, String>,
    raw_output: String,
}

impl Report {
    pub fn new(
        params: InvocationParams,
        invocation_time: DateTime<Utc>,
        leaks: Vec<LeakRecord>,
        summary: IndexMap<String, String>,
        raw_output: String,
    ) -> Self {
        Self {
            params,
            invocation_time,
            leaks: leaks.into_iter().map(Arc::new).collect(),
            summary,
            raw_output,
        }
    }

    pub fn params(&self) -> &InvocationParams {
        &self.params
    }

    pub fn invocation_time(&self) -> DateTime<Utc> {
        self.invocation_time
    }

    pub fn leaks(&self) -> &[Arc<LeakRecord>] {
        &self.leaks
    }

    pub fn summary(&self) -> &IndexMap<String, String> {
        &self.summary
    }

    pub fn raw_output(&self) -> &str {
        &self.raw_output
    }

    pub fn is_empty(&self) -> bool {
        self.leaks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.leaks.len()
    }

    pub fn count_by_kind(&self, kind: LeakKind) -> usize {
        self.leaks.iter().filter(|r| r.kind == kind).count()
    }

    pub fn leak_count(&self) -> usize {
        self.count_by_kind(LeakKind::Leak)
    }

    pub fn cycle_count(&self) -> usize {
        self.count_by_kind(LeakKind::Cycle)
    }

    /// Sum of root instance counts across all records.
    pub fn total_root_instances(&self) -> u64 {
        self.leaks.iter().map(|r| r.root_count).sum()
    }

    pub fn filter_by_kind(&self, kind: LeakKind) -> Report {
        Report {
            params: self.params.clone(),
            invocation_time: self.invocation_time,
            leaks: self
                .leaks
                .iter()
                .filter(|r| r.kind == kind)
                .cloned()
                .collect(),
            summary: self.summary.clone(),
            raw_output: self.raw_output.clone(),
        }
    }

    pub fn filter_to_cycles(&self) -> Report {
        self.filter_by_kind(LeakKind::Cycle)
    }

    pub fn filter_to_leaks(&self) -> Report {
        self.filter_by_kind(LeakKind::Leak)
    }
}
