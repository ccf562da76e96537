use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("creating a file")]
    Create,
    #[error("creating a directory")]
    Mkdir,
    #[error("inspecting a path")]
    Stat,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{}'", .path.display())]
#[diagnostic(
    code(hinagata::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }

    pub fn kind(&self) -> std::io::ErrorKind {
        self.source.kind()
    }
}

/// A manifest that failed to deserialize, carrying the document so the
/// report can point at the offending line.
#[derive(Debug, Error, Diagnostic)]
#[error("unable to parse manifest '{origin}': {message}")]
#[diagnostic(
    code(hinagata::parse),
    help("Manifests take `directories` and `files` as lists or as tables of lists")
)]
pub struct ParseError {
    pub origin: String,
    pub message: String,
    #[source_code]
    pub document: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}
impl ParseError {
    pub fn new(origin: &str, content: &str, error: toml::de::Error) -> Self {
        Self {
            origin: origin.to_string(),
            message: error.message().to_string(),
            document: NamedSource::new(origin, content.to_string()),
            span: error.span().map(SourceSpan::from),
        }
    }
}
