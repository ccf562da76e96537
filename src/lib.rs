pub mod api;
pub mod errors;
pub mod manifest;
pub mod preset;
pub mod report;
pub mod scaffold;
pub mod source;

mod preview;
mod prompt;
mod utils;

pub use api::{generate, list_presets, GenerateOptions, HinagataError, Mode};
pub use manifest::{EntryKind, Manifest, PathEntry};
pub use scaffold::{
    ensure_directories, ensure_files, CreatedCount, EntryReport, Observer, Outcome, SkipReason,
    Summary,
};
