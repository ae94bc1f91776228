use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Process exit status for a run aborted by this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::Oracle(_) => 2,
            HarnessError::Config(_) => 3,
            HarnessError::Io(_) | HarnessError::Json(_) => 1,
        }
    }
}

impl From<rusqlite::Error> for HarnessError {
    fn from(e: rusqlite::Error) -> Self {
        HarnessError::Oracle(format!("sqlite: {}", e))
    }
}

impl From<sqlx::Error> for HarnessError {
    fn from(e: sqlx::Error) -> Self {
        HarnessError::Oracle(format!("postgres: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
