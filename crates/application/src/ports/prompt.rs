//! User confirmation port.

/// Synchronous boolean confirmation collaborator.
///
/// Backs the discard-changes, delete-request, and delete-folder prompts.
/// The workbench branches on the answer but does not own the presentation.
pub trait ConfirmPrompt {
    /// Presents `message` and returns the user's yes/no answer.
    fn confirm(&self, message: &str) -> bool;
}

/// Prompt that always answers yes, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}
