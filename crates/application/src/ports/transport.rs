//! Transport port.

use std::future::Future;

use relay_domain::{RequestSpec, ResponseData, TransportFailure};

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, keeping the
/// application layer independent of specific libraries. Both branches of
/// the output mean "a result arrived": failures are data shown in the
/// response panel, never propagated as process errors.
pub trait Transport: Send + Sync {
    /// Executes an HTTP request and resolves with its outcome.
    ///
    /// Timeouts and retry policy belong to the implementation; the core
    /// only attributes whatever arrives to the tab that sent it.
    fn execute(
        &self,
        spec: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseData, TransportFailure>> + Send;
}
