use thiserror::Error;
use unfollow_common::Operation;
use unfollow_http::HttpError;

/// A failed remote call, labelled with the operation that issued it.
#[derive(Debug, Error)]
#[error("{op} failed")]
pub struct TwitterError {
    pub op: Operation,
    #[source]
    pub source: HttpError,
}

impl TwitterError {
    pub fn new(op: Operation, source: HttpError) -> Self {
        Self { op, source }
    }
}

pub type TwitterResult<T> = std::result::Result<T, TwitterError>;
