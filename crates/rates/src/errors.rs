//! Error types for the rates crate.
//!
//! Two layers of errors exist:
//! - [`ProviderError`]: what a single price source reports for one attempt
//! - [`ResolveError`]: what the resolver reports after exhausting its options
//!
//! Provider errors never cross the resolver boundary; the resolver consumes
//! them to drive fallback and cooldown decisions.

use thiserror::Error;

/// Errors a single price provider can report for one quote attempt.
///
/// The two variants drive different fallback behavior in the resolver,
/// exposed through [`cools_provider`](Self::cools_provider).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider's response says the symbol or pair does not exist on
    /// that venue. The provider itself is healthy, so it stays eligible
    /// for other pairs in the same resolution.
    #[error("pair not offered by provider")]
    PairUnsupported,

    /// Any other failure: network error, timeout, unexpected response
    /// schema, non-positive or non-finite price, rate limit or server
    /// error. The provider is presumed transiently unhealthy.
    #[error("upstream failure: {message}")]
    Upstream {
        /// Short description of what went wrong, for logging.
        message: String,
    },
}

impl ProviderError {
    /// Build an [`Upstream`](Self::Upstream) error from anything printable.
    pub fn upstream(message: impl ToString) -> Self {
        Self::Upstream {
            message: message.to_string(),
        }
    }

    /// Whether this failure should place the provider on cooldown.
    ///
    /// `PairUnsupported` must not cool the provider: the pair may simply
    /// not be listed on that venue while the provider is perfectly healthy.
    pub fn cools_provider(&self) -> bool {
        match self {
            Self::PairUnsupported => false,
            Self::Upstream { .. } => true,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream {
            message: err.to_string(),
        }
    }
}

/// Errors the resolver reports to its caller.
///
/// Only the aggregate outcome crosses this boundary; individual provider
/// failures are fully recovered inside the resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A ticker was empty after normalization. User input error.
    #[error("empty ticker symbol")]
    BadSymbol,

    /// Every provider and pivot strategy was exhausted without a usable
    /// rate. Transient: the caller may retry or reverse the pair.
    #[error("no provider could price the pair")]
    NoRoute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_unsupported_does_not_cool() {
        assert!(!ProviderError::PairUnsupported.cools_provider());
    }

    #[test]
    fn test_upstream_cools() {
        let err = ProviderError::upstream("HTTP 500");
        assert!(err.cools_provider());
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::upstream("connect timeout");
        assert_eq!(format!("{}", err), "upstream failure: connect timeout");
        assert_eq!(
            format!("{}", ProviderError::PairUnsupported),
            "pair not offered by provider"
        );
        assert_eq!(format!("{}", ResolveError::NoRoute), "no provider could price the pair");
    }
}
