use crate::manifest::Manifest;
use inquire::{Confirm, InquireError, Select};
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("prompt was canceled")]
    #[diagnostic(code(hinagata::prompt::canceled))]
    Canceled,

    #[error("unable to prompt: {0}")]
    #[diagnostic(
        code(hinagata::prompt::failed),
        help("Interactive mode needs a terminal; pass a manifest and drop --interactive")
    )]
    Failed(#[source] InquireError),
}
impl From<InquireError> for PromptError {
    fn from(error: InquireError) -> Self {
        match error {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => Self::Canceled,
            other => Self::Failed(other),
        }
    }
}

struct PresetChoice<'a>(&'a Manifest);
impl fmt::Display for PresetChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.name, self.0.description)
    }
}

/// Asks the user to pick one of `presets`, returning its name.
pub fn select_preset(presets: &[Manifest]) -> Result<String, PromptError> {
    let choices: Vec<PresetChoice> = presets.iter().map(PresetChoice).collect();

    let answer = Select::new("Select a layout:", choices).prompt()?;

    Ok(answer.0.name.clone())
}

pub fn apply_changes() -> Result<bool, PromptError> {
    let answer = Confirm::new("Create these paths?")
        .with_default(true)
        .prompt()?;

    Ok(answer)
}
