//! Query seam for live-server lookups.
//!
//! The core never owns a connection. Driver code implements [`Queryer`]
//! so the few operations that may consult a live server (currently the
//! collation override used by verification tooling) stay driver-agnostic.

/// Runs a single-value query against a live server.
pub trait Queryer {
    /// Error type for query failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs `sql` and returns the first column of the first row, or
    /// `None` if there are no rows or the value is NULL.
    fn query_optional_string(&self, sql: &str) -> Result<Option<String>, Self::Error>;
}
