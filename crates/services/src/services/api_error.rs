//! Normalizes every failure the client can observe into one [`ApiError`].

use strum_macros::Display;
use thiserror::Error;
use tracing::debug;
use utils::response::ApiEnvelope;

use super::transport::TransportError;

pub const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";
pub const DECODE_ERROR_CODE: &str = "DECODE_ERROR";
pub const AUTH_EXPIRED_CODE: &str = "AUTH_EXPIRED";

const NETWORK_FALLBACK: &str = "네트워크 오류가 발생했습니다.";
const SERVER_FALLBACK: &str = "서버 오류가 발생했습니다.";
const AUTH_FALLBACK: &str = "인증이 만료되었습니다. 다시 로그인해 주세요.";
const NOT_FOUND_FALLBACK: &str = "요청한 데이터를 찾을 수 없습니다.";
const UNKNOWN_FALLBACK: &str = "알 수 없는 오류가 발생했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    Network,
    Validation,
    Auth,
    NotFound,
    Conflict,
    Server,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::Validation,
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            409 => Self::Conflict,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::Network => NETWORK_FALLBACK,
            Self::Server => SERVER_FALLBACK,
            Self::Auth => AUTH_FALLBACK,
            Self::NotFound => NOT_FOUND_FALLBACK,
            Self::Validation | Self::Conflict | Self::Unknown => UNKNOWN_FALLBACK,
        }
    }
}

/// The only error shape surfaced past the envelope client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub http_status: Option<u16>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            http_status: None,
        }
    }

    pub fn network() -> Self {
        Self::new(ErrorKind::Network, NETWORK_ERROR_CODE, NETWORK_FALLBACK)
    }

    pub fn auth_expired() -> Self {
        Self {
            http_status: Some(401),
            ..Self::new(ErrorKind::Auth, AUTH_EXPIRED_CODE, AUTH_FALLBACK)
        }
    }

    pub fn unknown(detail: impl std::fmt::Display) -> Self {
        debug!(%detail, "normalizing unclassified failure");
        Self::new(ErrorKind::Unknown, UNKNOWN_ERROR_CODE, UNKNOWN_FALLBACK)
    }

    /// Returns true if the error is transient and a read may be retried.
    pub fn should_retry(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::Server)
    }
}

/// Everything that can go wrong between issuing a request and holding `data`.
#[derive(Debug)]
pub enum Failure {
    /// No response was received.
    Transport(TransportError),
    /// A response arrived with a non-2xx status; the body may or may not be an envelope.
    Response { status: u16, body: String },
    /// An envelope that decoded fine but reported `success=false`.
    Envelope { status: u16, envelope: ApiEnvelope },
    /// A 2xx response whose body or payload did not decode.
    Decode { status: u16, reason: String },
    Other(String),
}

/// Maps a failure to exactly one [`ApiError`]. Never panics.
pub fn normalize(failure: Failure) -> ApiError {
    match failure {
        Failure::Transport(err) => {
            debug!(error = %err, "transport failure");
            ApiError::network()
        }
        Failure::Response { status, body } => match serde_json::from_str::<ApiEnvelope>(&body) {
            Ok(envelope) => from_envelope(status, &envelope),
            Err(_) => {
                let kind = ErrorKind::from_status(status);
                ApiError {
                    kind,
                    code: format!("HTTP_{status}"),
                    message: kind.fallback_message().to_string(),
                    http_status: Some(status),
                }
            }
        },
        Failure::Envelope { status, envelope } => from_envelope(status, &envelope),
        Failure::Decode { status, reason } => {
            debug!(status, %reason, "undecodable response body");
            ApiError {
                http_status: Some(status),
                ..ApiError::new(ErrorKind::Unknown, DECODE_ERROR_CODE, UNKNOWN_FALLBACK)
            }
        }
        Failure::Other(detail) => ApiError::unknown(detail),
    }
}

fn from_envelope(status: u16, envelope: &ApiEnvelope) -> ApiError {
    // Some endpoints answer 200 with success=false; the envelope code is the real status.
    let effective = if (200..300).contains(&status) {
        u16::try_from(envelope.code).unwrap_or(status)
    } else {
        status
    };
    let kind = ErrorKind::from_status(effective);
    let (code, message) = match envelope.first_error() {
        Some(detail) => (
            non_empty(&detail.code).unwrap_or_else(|| format!("HTTP_{effective}")),
            non_empty(&detail.message).unwrap_or_else(|| kind.fallback_message().to_string()),
        ),
        None => (
            format!("HTTP_{effective}"),
            kind.fallback_message().to_string(),
        ),
    };

    ApiError {
        kind,
        code,
        message,
        http_status: Some(effective),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}
