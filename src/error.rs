//! Recoverable failures reported by `LinkedHashMap`.

use thiserror::Error;

/// Error returned by strict lookups and by position/cursor stepping.
///
/// Neither variant is ever produced after a partial mutation: the map is
/// left exactly as it was before the failing call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum MapError {
    /// The requested key has no entry (`at`, `at_mut`, read-only indexing).
    #[error("key not found")]
    KeyNotFound,
    /// Stepping past `end()`, before `begin()`, or from a position whose
    /// entry has since been removed.
    #[error("invalid iterator operation")]
    InvalidIteratorOperation,
}
