use aptfund_splitter::{DirectoryError, LedgerError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

impl From<ApiError> for DirectoryError {
    fn from(e: ApiError) -> Self {
        DirectoryError::Unavailable {
            reason: e.to_string(),
        }
    }
}

impl From<ApiError> for LedgerError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status { status, body } => LedgerError::Rejected { status, body },
            ApiError::Http(e) => LedgerError::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}
