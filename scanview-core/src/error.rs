use thiserror::Error;

pub type ScanViewResult<T> = Result<T, ScanViewError>;

#[derive(Error, Debug)]
pub enum ScanViewError {
    /// Single failure kind for scanner-service calls. Network unreachability,
    /// non-2xx status, a malformed body, and a service-reported error status
    /// all collapse into this variant; only the message text differs.
    #[error("Scanner service request failed: {0}")]
    RequestFailed(String),
}
