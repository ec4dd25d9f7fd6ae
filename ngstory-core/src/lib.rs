//! Embeddable core library for ngstory.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into an editor extension, a scaffolding tool, or the `ngstory` binary.
//!
//! # Port traits
//!
//! Everything the pipeline cannot decide on its own sits behind a trait:
//! - [`DependencySource`](ports::DependencySource) reads declared dependency versions
//! - [`ProjectPrompt`] picks a project when several are eligible
//!
//! The [`adapters`] module provides default filesystem-backed implementations.
//!
//! # Entry points
//!
//! - [`integrate`](pipeline::integrate) adds the add-on targets to one project
//! - [`retry_write`](pipeline::retry_write) re-attempts only the commit after a failed write

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-exported so embedders don't need ngstory-domain directly.
pub use ngstory_domain::{FixedPrompt, ProjectPrompt, VersionPair};
pub use ngstory_edit::{MutatedWorkspace, WorkspaceError};
