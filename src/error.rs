use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Connect / gRPC status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Code {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl Code {
    /// Name used in Connect JSON error bodies.
    pub fn wire_name(self) -> &'static str {
        match self {
            Code::Canceled           => "canceled",
            Code::Unknown            => "unknown",
            Code::InvalidArgument    => "invalid_argument",
            Code::DeadlineExceeded   => "deadline_exceeded",
            Code::NotFound           => "not_found",
            Code::AlreadyExists      => "already_exists",
            Code::PermissionDenied   => "permission_denied",
            Code::ResourceExhausted  => "resource_exhausted",
            Code::FailedPrecondition => "failed_precondition",
            Code::Aborted            => "aborted",
            Code::OutOfRange         => "out_of_range",
            Code::Unimplemented      => "unimplemented",
            Code::Internal           => "internal",
            Code::Unavailable        => "unavailable",
            Code::DataLoss           => "data_loss",
            Code::Unauthenticated    => "unauthenticated",
        }
    }

    // Connect's fallback when a non-200 response carries no usable error body
    pub fn from_http_status(status: u16) -> Code {
        match status {
            400 => Code::Internal,
            401 => Code::Unauthenticated,
            403 => Code::PermissionDenied,
            404 => Code::Unimplemented,
            429 | 502 | 503 | 504 => Code::Unavailable,
            _ => Code::Unknown,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Code {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s {
            "canceled" | "cancelled" => Code::Canceled,
            "unknown"             => Code::Unknown,
            "invalid_argument"    => Code::InvalidArgument,
            "deadline_exceeded"   => Code::DeadlineExceeded,
            "not_found"           => Code::NotFound,
            "already_exists"      => Code::AlreadyExists,
            "permission_denied"   => Code::PermissionDenied,
            "resource_exhausted"  => Code::ResourceExhausted,
            "failed_precondition" => Code::FailedPrecondition,
            "aborted"             => Code::Aborted,
            "out_of_range"        => Code::OutOfRange,
            "unimplemented"       => Code::Unimplemented,
            "internal"            => Code::Internal,
            "unavailable"         => Code::Unavailable,
            "data_loss"           => Code::DataLoss,
            "unauthenticated"     => Code::Unauthenticated,
            other => return Err(format!("unknown connect code `{other}`")),
        };
        Ok(code)
    }
}

/// Structured error returned by a Connect endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ConnectError {
    pub code:    Code,
    pub message: String,
}

// JSON body of a Connect unary error response
#[derive(Deserialize)]
pub(crate) struct WireError {
    pub code:    String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Request never produced a response (connect refused, timeout, broken body).
    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived but its body is not the expected message.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        RpcError::Transport(err.to_string())
    }
}

impl From<prost::DecodeError> for RpcError {
    fn from(err: prost::DecodeError) -> Self {
        RpcError::Decode(err.to_string())
    }
}

impl RpcError {
    /// Text shown in an error log entry.
    pub fn render(&self) -> String {
        let view = match self {
            RpcError::Connect(e) => json!({
                "name":    "ConnectError",
                "code":    e.code,
                "message": e.message,
            }),
            RpcError::Transport(msg) => json!({
                "name":    "TransportError",
                "message": msg,
            }),
            RpcError::Decode(msg) => json!({
                "name":    "DecodeError",
                "message": msg,
            }),
        };
        format!("{:#}", view)
    }

    pub fn code(&self) -> Option<Code> {
        match self {
            RpcError::Connect(e) => Some(e.code),
            _ => None,
        }
    }
}
