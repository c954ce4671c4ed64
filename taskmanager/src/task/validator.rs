use super::Task;

/// Maximum number of characters allowed in a task title.
pub const MAX_TITLE_LEN: usize = 255;
/// Maximum number of characters allowed in a task description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Error type for task field constraints that the caller can fix and retry.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The title is empty or contains only whitespace.
    #[error("Title must not be empty")]
    EmptyTitle,
    /// The title has more than [`MAX_TITLE_LEN`] characters.
    #[error("Title must not exceed {MAX_TITLE_LEN} characters (got {len})")]
    TitleTooLong { len: usize },
    /// No status was given.
    #[error("Status must be specified")]
    MissingStatus,
    /// The description has more than [`MAX_DESCRIPTION_LEN`] characters.
    #[error("Description must not exceed {MAX_DESCRIPTION_LEN} characters (got {len})")]
    DescriptionTooLong { len: usize },
}

/// Checks the field constraints of a task.
///
/// Lengths are counted in characters, not bytes.
pub fn validate(task: &Task) -> Result<(), ValidationError> {
    if task.title().trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let title_len = task.title().chars().count();
    if title_len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong { len: title_len });
    }

    if task.status().is_none() {
        return Err(ValidationError::MissingStatus);
    }

    if let Some(description) = task.description() {
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooLong { len });
        }
    }

    Ok(())
}
