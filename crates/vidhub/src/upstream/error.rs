use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum UpstreamError {
    #[error("upstream {url} responded with status {status}")]
    HttpStatus { status: StatusCode, url: String },
    #[error("upstream returned error code {0}: {1}")]
    ErrorResponse(i64, String),
    #[error("invalid upstream payload: {0}")]
    InvalidPayload(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("all {0} endpoints failed, last error: {1}")]
    AllEndpointsFailed(usize, String),
}

pub(crate) trait ErrorForStatusExt {
    fn error_for_status_ext(self) -> Result<reqwest::Response, UpstreamError>;
}

impl ErrorForStatusExt for reqwest::Response {
    fn error_for_status_ext(self) -> Result<reqwest::Response, UpstreamError> {
        let status = self.status();
        if status.is_success() {
            return Ok(self);
        }
        Err(UpstreamError::HttpStatus {
            status,
            url: self.url().to_string(),
        })
    }
}
