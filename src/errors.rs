//! Recoverable repository errors
//!
//! Every failure a user can provoke through a command is one of the variants below.
//! They are reported on stdout and the process exits normally; the snapshot is left
//! untouched because commands only persist it as their very last step.
//!
//! Anything else (disk errors, corrupted objects) travels as a plain `anyhow::Error`
//! and is treated as fatal by the binary.

use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitletError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error(transparent)]
    StateConflict(#[from] StateConflict),
    /// An abbreviated commit id matched more than one stored commit.
    #[error("Commit id {prefix} is ambiguous; candidates are: {}", format_candidates(candidates))]
    AmbiguousPrefix {
        prefix: String,
        candidates: Vec<ObjectId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("Please enter a commit message.")]
    EmptyCommitMessage,
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,
    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("File does not exist.")]
    File(String),
    #[error("No commit with that id exists.")]
    Commit(String),
    #[error("File does not exist in that commit.")]
    FileInCommit(String),
    #[error("No such branch exists.")]
    NoSuchBranch(String),
    #[error("A branch with that name does not exist.")]
    BranchDoesNotExist(String),
    #[error("Found no commit with that message.")]
    MessageNotFound(String),
    #[error("No object with id {0} exists.")]
    Object(ObjectId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateConflict {
    #[error("A gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("No reason to remove the file.")]
    NoReasonToRemove(String),
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay(Vec<String>),
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    MergeWithItself,
    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,
    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,
    #[error("A branch with that name already exists.")]
    BranchExists(String),
}

fn format_candidates(candidates: &[ObjectId]) -> String {
    candidates
        .iter()
        .map(|oid| oid.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extract the recoverable error carried by an `anyhow::Error`, if any.
pub fn as_gitlet_error(error: &anyhow::Error) -> Option<&GitletError> {
    error.downcast_ref::<GitletError>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_errors_display_their_own_message() {
        let error: GitletError = StateConflict::MergeWithItself.into();
        assert_eq!(error.to_string(), "Cannot merge a branch with itself.");

        let error: GitletError = NotFound::Commit("abc".to_string()).into();
        assert_eq!(error.to_string(), "No commit with that id exists.");
    }

    #[test]
    fn recoverable_errors_survive_anyhow_round_trip() {
        let error = anyhow::Error::from(GitletError::from(UsageError::IncorrectOperands));

        assert_eq!(
            as_gitlet_error(&error),
            Some(&GitletError::Usage(UsageError::IncorrectOperands))
        );
    }

    #[test]
    fn fatal_errors_are_not_recoverable() {
        let error = anyhow::anyhow!("disk on fire");

        assert!(as_gitlet_error(&error).is_none());
    }
}
