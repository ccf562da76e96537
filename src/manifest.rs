use crate::{
    errors::{FileOperation, IoError, ParseError},
    utils::normalize_relative,
};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("I/O error within manifest domain")]
    #[diagnostic(code(hinagata::manifest::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid {kind} path '{path}' in manifest '{manifest}'")]
    #[diagnostic(
        code(hinagata::manifest::invalid_path),
        help("Manifest paths must be relative to the base directory and must not contain '..'")
    )]
    InvalidPath {
        manifest: String,
        kind: EntryKind,
        path: String,
    },
}

/// Whether an entry names a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}
impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }
}
impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single relative path the scaffold must guarantee exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}
impl PathEntry {
    pub fn directory<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }
}

/// A list section of a manifest file. Either a plain list, or a table of
/// named lists flattened in the order they appear in the document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Section {
    Flat(Vec<String>),
    Grouped(IndexMap<String, Vec<String>>),
}
impl Default for Section {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}
impl Section {
    fn into_paths(self) -> Vec<String> {
        match self {
            Self::Flat(paths) => paths,
            Self::Grouped(groups) => groups.into_values().flatten().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    name: Option<String>,
    description: Option<String>,
    base: Option<String>,
    #[serde(default)]
    notes: Vec<String>,
    #[serde(default)]
    directories: Section,
    #[serde(default)]
    files: Section,
}

/// The static description of a skeleton: which directories and which empty
/// files must exist below `base`.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub name: String,
    pub description: String,
    /// Default base directory, relative to the working directory.
    pub base: PathBuf,
    pub directories: Vec<PathEntry>,
    pub files: Vec<PathEntry>,
    /// Follow-up hints printed after a successful run.
    pub notes: Vec<String>,
}
impl Manifest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            base: PathBuf::from("."),
            directories: Vec::new(),
            files: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_directories<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.directories
            .extend(paths.into_iter().map(PathEntry::directory));
        self
    }

    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(PathEntry::file));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// All entries, directories first, in manifest order.
    pub fn entries(&self) -> impl Iterator<Item = &PathEntry> {
        self.directories.iter().chain(self.files.iter())
    }

    /// Parses a manifest from TOML. `origin` names the document in errors and
    /// doubles as the manifest name when the document has none.
    pub fn from_toml_str(origin: &str, content: &str) -> Result<Self, ManifestError> {
        let parsed: ManifestFile =
            toml::from_str(content).map_err(|error| ParseError::new(origin, content, error))?;

        let name = parsed.name.unwrap_or_else(|| origin.to_string());

        let directories = validate(&name, EntryKind::Directory, parsed.directories)?;
        let files = validate(&name, EntryKind::File, parsed.files)?;

        log::debug!(
            "parsed manifest '{}': {} directories, {} files",
            name,
            directories.len(),
            files.len()
        );

        Ok(Self {
            name,
            description: parsed.description.unwrap_or_default(),
            base: parsed
                .base
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            directories,
            files,
            notes: parsed.notes,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let origin = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_toml_str(&origin, &content)
    }
}

fn validate(
    manifest: &str,
    kind: EntryKind,
    section: Section,
) -> Result<Vec<PathEntry>, ManifestError> {
    section
        .into_paths()
        .into_iter()
        .map(|raw| match normalize_relative(&raw) {
            Some(path) => Ok(PathEntry { path, kind }),
            None => Err(ManifestError::InvalidPath {
                manifest: manifest.to_string(),
                kind,
                path: raw,
            }),
        })
        .collect()
}
