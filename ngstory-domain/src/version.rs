use ngstory_types::Variant;
use semver::Version;
use thiserror::Error;

/// First framework release whose CLI builds on webpack 5.
pub const WEBPACK5_THRESHOLD: Version = Version::new(12, 0, 0);

/// Declared version strings for one dependency, as found in a package manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPair {
    pub regular: Option<String>,
    pub dev: Option<String>,
}

impl VersionPair {
    pub fn new(regular: Option<&str>, dev: Option<&str>) -> Self {
        Self {
            regular: regular.map(str::to_string),
            dev: dev.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.dev.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("missing dependency: no declared version could be read as major.minor.patch")]
    MissingDependency,
}

/// Resolved version plus the variant it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantChoice {
    pub version: Version,
    pub variant: Variant,
}

/// Loose coercion of a manifest version string into `major.minor.patch`.
///
/// Takes the first run of digits and up to two following `.digits` groups; missing parts are 0.
/// Range operators, prerelease tags and anything after the third component are ignored, so
/// `^13.2.0-rc.1` becomes `13.2.0` and `~12` becomes `12.0.0`. Never panics.
pub fn coerce_version(raw: &str) -> Option<Version> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let mut rest = &raw[start..];
    let mut parts = [0u64; 3];

    for (i, slot) in parts.iter_mut().enumerate() {
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        *slot = rest[..len].parse().ok()?;
        rest = &rest[len..];

        if i == 2 {
            break;
        }
        match rest.strip_prefix('.') {
            Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
            _ => break,
        }
    }

    Some(Version::new(parts[0], parts[1], parts[2]))
}

/// The regular declaration wins whenever it coerces; the dev declaration is the fallback.
pub fn resolve_version(pair: &VersionPair) -> Option<Version> {
    pair.regular
        .as_deref()
        .and_then(coerce_version)
        .or_else(|| pair.dev.as_deref().and_then(coerce_version))
}

/// `Webpack5` iff the resolved version is `>= threshold`.
pub fn select_variant(
    pair: &VersionPair,
    threshold: &Version,
) -> Result<VariantChoice, VersionError> {
    let version = resolve_version(pair).ok_or(VersionError::MissingDependency)?;
    let variant = if &version >= threshold {
        Variant::Webpack5
    } else {
        Variant::Webpack4
    };
    Ok(VariantChoice { version, variant })
}
