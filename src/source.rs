use crate::{
    manifest::{Manifest, ManifestError},
    preset,
};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error("no preset or manifest file named '{reference}'")]
    #[diagnostic(
        code(hinagata::source::unknown),
        help("Available presets: {available}. Paths to manifest files must end in .toml")
    )]
    Unknown {
        reference: String,
        available: String,
    },
}

/// Where a manifest comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Preset(String),
    File(PathBuf),
}
impl Source {
    fn is_manifest_file(reference: &str) -> bool {
        let path = Path::new(reference);

        path.extension().map(|ext| ext == "toml").unwrap_or(false) || path.is_file()
    }

    /// Classifies a command-line reference. Built-in preset names always win;
    /// otherwise anything that looks like a TOML file, or names an existing
    /// file, is a file, and the rest are (unknown) preset names.
    pub fn parse(reference: &str) -> Self {
        if preset::names().any(|name| name == reference) {
            Self::Preset(reference.to_string())
        } else if Source::is_manifest_file(reference) {
            Self::File(PathBuf::from(reference))
        } else {
            Self::Preset(reference.to_string())
        }
    }

    pub fn load(&self) -> Result<Manifest, SourceError> {
        match self {
            Self::Preset(name) => {
                log::debug!("loading built-in preset: {}", name);

                preset::load(name)
                    .ok_or_else(|| SourceError::Unknown {
                        reference: name.clone(),
                        available: preset::names().collect::<Vec<_>>().join(", "),
                    })?
                    .map_err(SourceError::from)
            }
            Self::File(path) => {
                log::debug!("loading manifest file: {}", path.display());

                Ok(Manifest::from_file(path)?)
            }
        }
    }
}
