use thiserror::Error;

/// The kinds of remote operation the list controller performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Load,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Short message shown to the user when this operation fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load posts. Please try again.",
            Self::Create => "Failed to create post. Please try again.",
            Self::Update => "Failed to update post. Please try again.",
            Self::Delete => "Failed to delete post. Please try again.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and body cannot be empty.")]
    EmptyField,
}
