use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Bad request: {0}")]
    BadRequest(#[from] RequestError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the environment.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::BadRequest(_) | Error::Json(_))
    }

    /// The HTTP status a request handler should answer with.
    pub fn status_code(&self) -> u16 {
        if self.is_bad_request() {
            400
        } else {
            500
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("No data")]
    EmptyChangeSet,
    #[error("column `{column}` for field `{field}` is not a plain identifier")]
    InvalidColumn { field: String, column: String },
    #[error("assignment clause has {placeholders} placeholder(s) for {values} value(s)")]
    MismatchedParameters { placeholders: usize, values: usize },
}
