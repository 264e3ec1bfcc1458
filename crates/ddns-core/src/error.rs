//! Error types for the DDNS provider layer
//!
//! Every adapter reports failures through the single closed [`Error`] enum.
//! Callers should branch on [`Error::kind`] rather than on message text.

use std::net::IpAddr;

use thiserror::Error;

use crate::traits::IpVersion;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS provider layer
#[derive(Error, Debug)]
pub enum Error {
    /// The vendor cannot serve records of this IP version
    #[error("{version} is not supported by {provider}")]
    UnsupportedIpVersion {
        /// Provider name
        provider: &'static str,
        /// Requested IP version
        version: IpVersion,
    },

    /// The configuration blob does not have the vendor's expected shape
    #[error("malformed configuration: {0}")]
    MalformedConfig(String),

    /// Bearer token is missing or empty
    #[error("token is empty")]
    EmptyToken,

    /// Password is missing or empty
    #[error("password is empty")]
    EmptyPassword,

    /// Password does not pass the vendor's shape check
    #[error("password is malformed")]
    MalformedPassword,

    /// No constructor is registered for the provider kind
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Settings document is invalid
    #[error("invalid settings: {0}")]
    Settings(String),

    /// Outbound request could not be built
    #[error("cannot build request: {0}")]
    RequestBuild(String),

    /// Client-level failure (network, DNS, TLS)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Caller cancelled the update
    #[error("update cancelled")]
    Cancelled,

    /// Vendor answered with a non-success HTTP status
    #[error("bad HTTP status: {status}: {body}")]
    BadHttpStatus {
        /// HTTP status code
        status: u16,
        /// Single-line snapshot of the response body
        body: String,
    },

    /// Response body cannot be decoded into the expected shape
    #[error("failed unmarshaling response: {0}")]
    UnmarshalResponse(String),

    /// Vendor reported an error in-band
    #[error("unsuccessful response: {0}")]
    UnsuccessfulResponse(String),

    /// Lookup returned no record
    #[error("record not found")]
    RecordNotFound,

    /// Lookup returned a record without a usable identifier
    #[error("record id not found")]
    RecordIdNotFound,

    /// Lookup returned several records for one name and type
    #[error("{count} records match, expected exactly one")]
    AmbiguousRecord {
        /// Number of matching records
        count: usize,
    },

    /// Outbound mutation body could not be serialized
    #[error("cannot encode request body: {0}")]
    RequestEncode(String),

    /// Vendor echoed something that is not an IP address
    #[error("IP address received is malformed: {0:?}")]
    IpReceivedMalformed(String),

    /// Vendor echoed a different IP than the one sent
    #[error("IP address received {received} does not match IP address sent {sent}")]
    IpReceivedMismatch {
        /// IP address sent for update
        sent: IpAddr,
        /// IP address the vendor reported
        received: IpAddr,
    },

    /// Error annotated with the stage that produced it
    #[error("{stage}: {source}")]
    Context {
        /// Stage description, e.g. "getting record id"
        stage: &'static str,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },
}

/// Tag identifying an [`Error`] variant independently of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedIpVersion,
    MalformedConfig,
    EmptyToken,
    EmptyPassword,
    MalformedPassword,
    UnknownProvider,
    Settings,
    RequestBuild,
    Transport,
    Cancelled,
    BadHttpStatus,
    UnmarshalResponse,
    UnsuccessfulResponse,
    RecordNotFound,
    RecordIdNotFound,
    AmbiguousRecord,
    RequestEncode,
    IpReceivedMalformed,
    IpReceivedMismatch,
}

impl ErrorKind {
    /// Whether this kind can only be raised while building an adapter.
    ///
    /// A scheduler can use this to refuse to start instead of retrying.
    pub fn is_configuration(self) -> bool {
        matches!(
            self,
            ErrorKind::UnsupportedIpVersion
                | ErrorKind::MalformedConfig
                | ErrorKind::EmptyToken
                | ErrorKind::EmptyPassword
                | ErrorKind::MalformedPassword
                | ErrorKind::UnknownProvider
                | ErrorKind::Settings
        )
    }
}

impl Error {
    /// Tag of this error, looking through any stage context
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedIpVersion { .. } => ErrorKind::UnsupportedIpVersion,
            Error::MalformedConfig(_) => ErrorKind::MalformedConfig,
            Error::EmptyToken => ErrorKind::EmptyToken,
            Error::EmptyPassword => ErrorKind::EmptyPassword,
            Error::MalformedPassword => ErrorKind::MalformedPassword,
            Error::UnknownProvider(_) => ErrorKind::UnknownProvider,
            Error::Settings(_) => ErrorKind::Settings,
            Error::RequestBuild(_) => ErrorKind::RequestBuild,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::BadHttpStatus { .. } => ErrorKind::BadHttpStatus,
            Error::UnmarshalResponse(_) => ErrorKind::UnmarshalResponse,
            Error::UnsuccessfulResponse(_) => ErrorKind::UnsuccessfulResponse,
            Error::RecordNotFound => ErrorKind::RecordNotFound,
            Error::RecordIdNotFound => ErrorKind::RecordIdNotFound,
            Error::AmbiguousRecord { .. } => ErrorKind::AmbiguousRecord,
            Error::RequestEncode(_) => ErrorKind::RequestEncode,
            Error::IpReceivedMalformed(_) => ErrorKind::IpReceivedMalformed,
            Error::IpReceivedMismatch { .. } => ErrorKind::IpReceivedMismatch,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Wrap this error with the stage that produced it
    pub fn context(self, stage: &'static str) -> Self {
        Self::Context {
            stage,
            source: Box::new(self),
        }
    }

    /// Create a malformed configuration error
    pub fn malformed_config(msg: impl Into<String>) -> Self {
        Self::MalformedConfig(msg.into())
    }

    /// Create a request construction error
    pub fn request_build(msg: impl Into<String>) -> Self {
        Self::RequestBuild(msg.into())
    }

    /// Create a settings error
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
