// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use thiserror::Error;

/// The error type for raisign operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required credential field is absent from the configuration.
    MissingCredentialField,

    /// The private key seed is not valid base64 or has the wrong length.
    InvalidPrivateKeyEncoding,

    /// The bearer token exchange failed: transport, status or payload.
    AuthExchangeFailed,

    /// Both an access key and a client id are configured.
    AmbiguousCredentials,

    /// Configuration has an invalid value.
    ConfigInvalid,

    /// Request cannot be signed (missing authority, bad header value, etc.)
    RequestInvalid,

    /// Unexpected errors (I/O, unconfigured context, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this error comes from the credential configuration.
    ///
    /// Such errors are raised before any network call and retrying won't help.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MissingCredentialField
                | ErrorKind::InvalidPrivateKeyEncoding
                | ErrorKind::AmbiguousCredentials
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a missing credential field error
    pub fn missing_credential_field(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCredentialField, message)
    }

    /// Create an invalid private key encoding error
    pub fn invalid_private_key_encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPrivateKeyEncoding, message)
    }

    /// Create an auth exchange failed error
    pub fn auth_exchange_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthExchangeFailed, message)
    }

    /// Create an ambiguous credentials error
    pub fn ambiguous_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AmbiguousCredentials, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingCredentialField => write!(f, "missing credential field"),
            ErrorKind::InvalidPrivateKeyEncoding => write!(f, "invalid private key encoding"),
            ErrorKind::AuthExchangeFailed => write!(f, "auth exchange failed"),
            ErrorKind::AmbiguousCredentials => write!(f, "ambiguous credentials"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
