use thiserror::Error;

#[derive(Error, Debug)]
pub enum InnerApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad gateway: {0}")]
    BadGateway(String),
}
