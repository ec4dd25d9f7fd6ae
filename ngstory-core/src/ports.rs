//! Port traits abstracting I/O away from the pipeline.

use ngstory_domain::VersionPair;

/// Source of declared dependency versions (usually `package.json`).
pub trait DependencySource {
    /// Declared `dependencies` and `devDependencies` entries for `package`.
    ///
    /// An undeclared package is an empty pair, not an error.
    fn versions(&self, package: &str) -> anyhow::Result<VersionPair>;
}
