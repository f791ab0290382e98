use thiserror::Error;

/// Everything a store operation can fail with. Validation failures never
/// leave a partial write behind; the collections are untouched on error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User with this email already exists")]
    DuplicateUser,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No user logged in")]
    NoActiveSession,

    #[error("User not found")]
    UserNotFound,

    #[error("You have already applied to this job")]
    DuplicateApplication,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    #[error("storage error")]
    Storage(#[from] std::io::Error),

    #[error("corrupt snapshot under key '{key}'")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
