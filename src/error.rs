use std::fmt::Debug;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is terminal for the call and means "deny".
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid validator configuration: {0}")]
    Configuration(String),
    #[error("Failed to fetch JWKS: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Malformed JWKS body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Key '{0}' of your provided JWT does not match in JWKs")]
    KeyNotFound(String),
    #[error("Failed to decode published key: {0}")]
    KeyDecode(String),
    #[error("The provided JWT is malformed: {0}")]
    MalformedToken(String),
    #[error("Only RS256, RS384 and RS512 are supported, got: {0:?}")]
    UnsupportedAlgorithm(String),
    #[error("Missing 'kid' in the header of the provided JWT")]
    MissingKeyId,
    #[error("The signature of the provided JWT does not verify")]
    InvalidSignature,
    #[error("The provided JWT has expired or carries no expiration. Expiration timestamp: {0:?}")]
    TokenExpired(Option<i64>),
    #[error("The provided JWT does not match the expected issuer. Provided issuer: {0:?}")]
    IssuerMismatch(Option<String>),
    #[error("The provided JWT does not match the expected audience. Provided {claim}: {found:?}")]
    AudienceMismatch {
        claim: &'static str,
        found: Option<String>,
    },
}

impl Error {
    /// Short label for diagnostics that never carries token or key contents.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration",
            Error::Fetch(_) => "fetch",
            Error::Parse(_) => "parse",
            Error::KeyNotFound(_) => "key_not_found",
            Error::KeyDecode(_) => "key_decode",
            Error::MalformedToken(_) => "malformed_token",
            Error::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            Error::MissingKeyId => "missing_key_id",
            Error::InvalidSignature => "invalid_signature",
            Error::TokenExpired(_) => "token_expired",
            Error::IssuerMismatch(_) => "issuer_mismatch",
            Error::AudienceMismatch { .. } => "audience_mismatch",
        }
    }
}

pub(crate) fn configuration_error(message: impl Into<String>) -> Error {
    Error::Configuration(message.into())
}

pub(crate) fn key_decode_error(field: &str, error: impl std::fmt::Display) -> Error {
    Error::KeyDecode(format!("invalid '{field}': {error}"))
}

pub(crate) fn malformed_token_error(error: impl std::fmt::Display) -> Error {
    Error::MalformedToken(error.to_string())
}

/// Signature failures are reported as such; anything structural about the
/// token body is malformed input.
pub(crate) fn jwt_error(error: jsonwebtoken::errors::Error) -> Error {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => malformed_token_error(error),
        ErrorKind::InvalidRsaKey(_) => key_decode_error("rsa key", error),
        _ => Error::InvalidSignature,
    }
}
