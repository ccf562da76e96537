use crate::{
    manifest::ManifestError,
    preset,
    preview::preview_as_tree,
    prompt::{self, PromptError},
    report::{print_summary, ConsoleReporter},
    scaffold::{self, ScaffoldError, Summary},
    source::{Source, SourceError},
};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum HinagataError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scaffold(#[from] ScaffoldError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Write everything straight away.
    #[default]
    Apply,
    /// Show what would be created and stop.
    DryRun,
    /// Show what would be created and ask before writing.
    Interactive,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Preset name or path to a manifest file. Falls back to the default
    /// preset, or to a prompt in interactive mode.
    pub manifest: Option<String>,
    /// Overrides the manifest's own base directory.
    pub base: Option<PathBuf>,
    pub mode: Mode,
}

/// Runs a scaffold for the manifest named in `options`.
///
/// Returns `None` when nothing was written, either because of a dry run or
/// because the user declined in interactive mode.
///
/// # Errors
///
/// Returns a [`HinagataError`] if:
///
/// - The manifest cannot be found, read or parsed.
/// - A path conflicts with an existing path of the other type.
/// - A directory or file cannot be created.
/// - Interactive prompts fail or are canceled.
pub fn generate(options: GenerateOptions) -> Result<Option<Summary>, HinagataError> {
    let reference = match (&options.manifest, options.mode) {
        (Some(reference), _) => reference.clone(),
        (None, Mode::Interactive) => prompt::select_preset(&preset::all()?)?,
        (None, _) => preset::DEFAULT_PRESET.to_string(),
    };

    let manifest = Source::parse(&reference).load()?;

    let base = options.base.unwrap_or_else(|| manifest.base.clone());

    log::debug!(
        "manifest '{}' resolved to base {} ({:?})",
        manifest.name,
        base.display(),
        options.mode
    );

    if options.mode != Mode::Apply {
        let planned = scaffold::plan(&base, &manifest)?;

        preview_as_tree(&planned, &base);

        if options.mode == Mode::DryRun || !prompt::apply_changes()? {
            println!("{}", "nothing written".yellow());
            return Ok(None);
        }
    }

    let summary = scaffold::run(&base, &manifest, &mut ConsoleReporter)?;

    print_summary(&manifest, &summary);

    Ok(Some(summary))
}

/// Prints every built-in preset with its default base and size.
///
/// # Errors
///
/// Returns a [`HinagataError`] if a built-in preset fails to parse.
pub fn list_presets() -> Result<(), HinagataError> {
    for manifest in preset::all()? {
        let marker = if manifest.name == preset::DEFAULT_PRESET {
            " (default)"
        } else {
            ""
        };

        println!(
            "{}{} - {}",
            manifest.name.green().bold(),
            marker,
            manifest.description
        );
        println!(
            "    base: {}, {} directories, {} files",
            manifest.base.display(),
            manifest.directories.len(),
            manifest.files.len()
        );
    }

    Ok(())
}
