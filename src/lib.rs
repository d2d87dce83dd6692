// Mon Feb 02 2026 - Alex

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod report;
pub mod runner;
pub mod utils;

pub use config::Config;
pub use error::LeakError;
pub use output::{ArtifactWriter, HtmlRenderer};
pub use parser::{parse, LeakParser};
pub use report::{ChildInfo, InvocationParams, LeakKind, LeakRecord, Report};
pub use runner::{capture_report, LeakSource, LeaksCommand, ToolOutput};
