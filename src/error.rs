//! Error types for the Anura client.
//!
//! Every fallible operation in this crate returns [`Result`], whose error type
//! distinguishes configuration problems, transport failures, non-success HTTP
//! statuses, decoding failures, and read failures in the middle of a stream.

use std::error;
use std::fmt;
use std::sync::Arc;

use crate::types::StreamResponse;

/// Maximum number of bytes of an error body kept on [`Error::HttpStatus`].
pub const MAX_ERROR_BODY_BYTES: usize = 4096;

/// The main error type for the Anura client.
#[derive(Clone, Debug)]
pub enum Error {
    /// Required configuration is missing or invalid.
    Config {
        /// Human-readable error message.
        message: String,
    },

    /// The server answered with a non-success status.
    HttpStatus {
        /// HTTP status code.
        status_code: u16,
        /// Raw response body, possibly truncated.
        body: String,
    },

    /// Connection error (DNS, connect, TLS).
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The request timed out.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A response document did not have the expected shape.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A request payload could not be encoded.
    Encoding {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Reading the response stream failed part way through.
    StreamRead {
        /// Human-readable error message.
        message: String,
        /// Everything reconstructed before the failure.
        partial: Box<StreamResponse>,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Error during validation of request parameters.
    Validation {
        /// Human-readable error message.
        message: String,
        /// Parameter that failed validation.
        param: Option<String>,
    },

    /// A URL parsing or manipulation error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new HTTP status error, truncating the body to
    /// [`MAX_ERROR_BODY_BYTES`].
    pub fn http_status(status_code: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > MAX_ERROR_BODY_BYTES {
            let mut end = MAX_ERROR_BODY_BYTES;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
            body.push_str("...");
        }
        Error::HttpStatus { status_code, body }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new encoding error.
    pub fn encoding(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Encoding {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new stream read error that keeps the partial response.
    pub fn stream_read(
        message: impl Into<String>,
        partial: StreamResponse,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::StreamRead {
            message: message.into(),
            partial: Box::new(partial),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Maps a reqwest failure onto the transport error kinds.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Option<f64>) -> Self {
        if err.is_timeout() {
            Error::timeout(format!("Request timed out: {err}"), timeout)
        } else if err.is_connect() {
            Error::connection(format!("Connection error: {err}"), Some(Box::new(err)))
        } else {
            Error::http_client(format!("Request failed: {err}"), Some(Box::new(err)))
        }
    }

    /// Returns true if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config { .. })
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. }
                | Error::Timeout { .. }
                | Error::HttpClient { .. }
                | Error::Url { .. }
        )
    }

    /// Returns true if the server answered with a non-success status.
    pub fn is_http_status(&self) -> bool {
        matches!(self, Error::HttpStatus { .. })
    }

    /// Returns true if a response document failed to decode.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Serialization { .. })
    }

    /// Returns true if the response stream failed part way through.
    pub fn is_stream_read(&self) -> bool {
        matches!(self, Error::StreamRead { .. })
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Returns the response body carried by a status error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns whatever was reconstructed before a stream read failure.
    pub fn partial_response(&self) -> Option<&StreamResponse> {
        match self {
            Error::StreamRead { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config { message } => {
                write!(f, "Configuration error: {message}")
            }
            Error::HttpStatus { status_code, body } => {
                if body.is_empty() {
                    write!(f, "Received status code {status_code}")
                } else {
                    write!(f, "Received status code {status_code}: {body}")
                }
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Encoding { message, .. } => {
                write!(f, "Encoding error: {message}")
            }
            Error::StreamRead { message, .. } => {
                write!(f, "Error reading response: {message}")
            }
            Error::Validation { message, param } => {
                if let Some(param) = param {
                    write!(f, "Validation error: {message} (parameter: {param})")
                } else {
                    write!(f, "Validation error: {message}")
                }
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. }
            | Error::HttpClient { source, .. }
            | Error::Serialization { source, .. }
            | Error::Encoding { source, .. }
            | Error::StreamRead { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for Anura operations.
pub type Result<T> = std::result::Result<T, Error>;
