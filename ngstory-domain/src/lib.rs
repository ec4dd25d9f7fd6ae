//! Domain logic: decide *what* goes into the workspace and for which project.
//!
//! This crate owns variant selection, project selection, and the shape of the add-on targets. It does
//! not read or write files; loading and committing `angular.json` is the `ngstory-edit` crate.

mod entries;
mod handoff;
mod ports;
mod selection;
mod version;

pub use entries::{CONFIG_FOLDER_NAME, EntryRequest, config_folder_for, plan_addon_entry};
pub use handoff::{
    COMPODOC_PACKAGE, COMPODOC_PREVIEW_PREFIX, DEFAULT_COMPODOC_VERSION, HandoffRequest,
    plan_handoff,
};
pub use ports::{FixedPrompt, ProjectPrompt};
pub use selection::{SelectError, select_project_name};
pub use version::{
    VariantChoice, VersionError, VersionPair, WEBPACK5_THRESHOLD, coerce_version, resolve_version,
    select_variant,
};
