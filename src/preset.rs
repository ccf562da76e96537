use crate::manifest::{Manifest, ManifestError};

/// Manifest used when no manifest is named on the command line.
pub const DEFAULT_PRESET: &str = "service";

/// Manifests compiled into the binary, keyed by preset name.
const PRESETS: &[(&str, &str)] = &[
    ("service", include_str!("../presets/service.toml")),
    ("frontend", include_str!("../presets/frontend.toml")),
];

pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

/// Returns the parsed preset called `name`, or `None` if there is no such
/// preset.
pub fn load(name: &str) -> Option<Result<Manifest, ManifestError>> {
    PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(preset, content)| Manifest::from_toml_str(preset, content))
}

/// Every built-in preset, parsed, in declaration order.
pub fn all() -> Result<Vec<Manifest>, ManifestError> {
    PRESETS
        .iter()
        .map(|(preset, content)| Manifest::from_toml_str(preset, content))
        .collect()
}
