use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::{self, Debug, Display};
use std::net::AddrParseError;

pub const ENV_VAR: i32 = 1;
pub const INVALID_RECORD: i32 = 2;
pub const NETWORK: i32 = 3;
pub const UPSTREAM: i32 = 4;
pub const UNEXPECTED: i32 = 5;
pub const POLICY: i32 = 6;

pub const INVALID_STATE: i32 = 100;
pub const INVALID_INPUT: i32 = 101;
pub const INVALID_TRANSITION: i32 = 102;
pub const NOT_FOUND: i32 = 103;
pub const UNAUTHORIZED: i32 = 104;
pub const UNAUTHENTICATED: i32 = 105;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_invalid_transition(&self) -> bool {
        self.code == INVALID_TRANSITION
    }

    pub fn is_not_found(&self) -> bool {
        self.code == NOT_FOUND
    }

    /// Transient failures talking to the backend. Callers surface these and
    /// leave retrying to the user.
    pub fn is_network_failure(&self) -> bool {
        self.code == NETWORK || self.code == UPSTREAM
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<AddrParseError> for Error {
    fn from(err: AddrParseError) -> Self {
        Error {
            code: ENV_VAR,
            message: format!("invalid listen address: {}", err),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        network_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        invalid_record_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        policy_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self.code {
            NETWORK | UPSTREAM => StatusCode::BAD_GATEWAY,
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            INVALID_TRANSITION => StatusCode::CONFLICT,
            NOT_FOUND => StatusCode::NOT_FOUND,
            UNAUTHORIZED => StatusCode::FORBIDDEN,
            UNAUTHENTICATED => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        };

        let error_message = match self.code {
            1..=99 => "Internal Server Error",
            _ => self.message.as_str(),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: INVALID_STATE,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error(reason: impl Into<String>) -> Error {
    Error {
        code: INVALID_INPUT,
        message: reason.into(),
    }
}

pub fn invalid_transition_error(from: impl Display, to: impl Display) -> Error {
    Error {
        code: INVALID_TRANSITION,
        message: format!("cannot move ride request from {} to {}", from, to),
    }
}

pub fn not_found_error(collection: impl Display, id: &str) -> Error {
    Error {
        code: NOT_FOUND,
        message: format!("{} {} not found", collection, id),
    }
}

pub fn unauthorized_error() -> Error {
    Error {
        code: UNAUTHORIZED,
        message: "unauthorized".into(),
    }
}

pub fn unauthenticated_error() -> Error {
    Error {
        code: UNAUTHENTICATED,
        message: "invalid credentials".into(),
    }
}

pub fn invalid_record_error<T: Debug>(err: T) -> Error {
    tracing::warn!(?err, "backend returned a record that does not decode");

    Error {
        code: INVALID_RECORD,
        message: "invalid record".into(),
    }
}

pub fn network_error(err: reqwest::Error) -> Error {
    tracing::warn!(%err, "backend request failed");

    Error {
        code: NETWORK,
        message: "network failure".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: UPSTREAM,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: UNEXPECTED,
        message: "unexpected error".into(),
    }
}

pub fn policy_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "authorization policy failed");

    Error {
        code: POLICY,
        message: "policy error".into(),
    }
}
