//! Shared DTOs (schemas-as-code) for the ngstory workspace.
//!
//! # Design constraints
//! - Types that end up in `angular.json` must serialize to the exact key names Angular builders read.
//! - Report types are written to disk by the CLI; prefer adding optional fields over changing semantics.

pub mod entry;
pub mod handoff;
pub mod project;
pub mod report;

pub use entry::{AddonEntry, TargetEntry, TargetOptions, Variant};
pub use handoff::{Handoff, PackageScript};
pub use project::{ProjectSummary, ProjectType};
pub use report::{FileChange, IntegrationReport, ToolInfo};

/// Schema identifiers.
pub mod schema {
    pub const NGSTORY_REPORT_V1: &str = "ngstory.report.v1";
}
