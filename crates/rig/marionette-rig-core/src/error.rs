use thiserror::Error;

/// Errors raised while building or addressing a skeleton.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RigError {
    #[error("bone '{0}' not found")]
    BoneNotFound(String),

    #[error("bone '{0}' is already defined")]
    DuplicateBone(String),

    #[error("bone '{bone}' names parent '{parent}', which is not defined yet")]
    UnknownParent { bone: String, parent: String },

    #[error("bone '{bone}' has an invalid {field}")]
    InvalidBone { bone: String, field: &'static str },

    #[error("proportion '{0}' must be positive and finite")]
    InvalidProportion(&'static str),
}
