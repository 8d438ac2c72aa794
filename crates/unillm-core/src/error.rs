//! Normalized error type returned by every unillm layer.
//!
//! Adapters never leak a backend- or transport-specific error: each failure
//! path is re-expressed as one of the variants below, tagged with the
//! provider that produced it.

use std::time::Duration;

use thiserror::Error;

use crate::types::ProviderKind;

/// Boxed underlying cause carried by some variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single error shape surfaced to callers.
#[derive(Debug, Error)]
pub enum LlmError {
    /// A required setting is missing or a provider tag is unknown.
    #[error("configuration error: {message}")]
    Configuration {
        provider: Option<ProviderKind>,
        message: String,
    },

    /// A managed credential could not be obtained.
    #[error("{provider}: authentication failed: {message}")]
    Authentication {
        provider: ProviderKind,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The call did not complete within its timeout.
    #[error("{provider}: request timed out after {}ms", .timeout.as_millis())]
    Timeout {
        provider: ProviderKind,
        timeout: Duration,
    },

    /// The backend answered with a non-success status.
    #[error("{provider}: HTTP {status}: {message}")]
    Http {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    /// Network, decoding, or any other failure.
    #[error("{provider}: {message}")]
    Unknown {
        provider: ProviderKind,
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

/// Discriminant of [`LlmError`], handy for matching in callers and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    Timeout,
    Http,
    Unknown,
}

impl LlmError {
    /// Configuration error tied to a known provider.
    pub fn config(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider: Some(provider),
            message: message.into(),
        }
    }

    /// Authentication error without an underlying cause.
    pub fn auth(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
            source: None,
        }
    }

    /// Authentication error wrapping the failure that caused it.
    pub fn auth_with_source(
        provider: ProviderKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Catch-all error wrapping an underlying cause.
    pub fn unknown(
        provider: ProviderKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Unknown {
            provider,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Catch-all error with no underlying cause (e.g. an unexpected envelope).
    pub fn malformed(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::Unknown {
            provider,
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Http { .. } => ErrorKind::Http,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// The provider the error is attributed to, if any.
    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            Self::Configuration { provider, .. } => *provider,
            Self::Authentication { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Http { provider, .. }
            | Self::Unknown { provider, .. } => Some(*provider),
        }
    }

    /// Transport status code, only set on [`LlmError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias used across unillm.
pub type Result<T> = std::result::Result<T, LlmError>;
