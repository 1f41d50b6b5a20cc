//! Boundary layer consumed by request handlers.
//!
//! # Responsibility
//! - Wrap every core outcome into the `ApiResponse` envelope.
//! - Decide how much internal error detail reaches callers.
//!
//! # Invariants
//! - Status codes come only from `ErrorCode::http_status` (or 200/201 on
//!   success).
//! - `Production` exposure never leaks internal error text.

mod board;
mod response;

pub use board::TaskBoardApi;
pub use response::ApiResponse;

/// Controls whether internal error details are returned to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorExposure {
    /// Internal error messages are passed through verbatim.
    Development,
    /// Internal error messages are replaced by a generic text.
    #[default]
    Production,
}
