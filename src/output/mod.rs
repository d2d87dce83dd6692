// Mon Feb 02 2026 - Alex

pub mod artifacts;
pub mod html;

pub use artifacts::{ArtifactSummary, ArtifactWriter};
pub use html::HtmlRenderer;
