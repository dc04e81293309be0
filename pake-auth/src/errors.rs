//! Flow-level error taxonomy.

use thiserror::Error;

/// Errors surfaced by the registration, login and upgrade flows.
///
/// Every login failure (unknown user, expired or replayed session,
/// degenerate scramble, wrong proof) collapses into
/// [`AuthError::AuthenticationFailed`] so that nothing about the cause is
/// observable at the boundary. The finer-grained causes exist only in logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The single opaque outcome for every failed login.
    #[error("authentication failed")]
    AuthenticationFailed,
    /// Registration attempted for a user that already holds a live
    /// credential; re-registration goes through the upgrade flow.
    #[error("user already registered")]
    AlreadyRegistered,
    /// A request field is missing or malformed.
    #[error("missing or malformed field: {0}")]
    InvalidRequest(&'static str),
    /// A peer advertised an algorithm, modulus or generator other than the
    /// deployment group.
    #[error("unsupported protocol parameters")]
    ParameterMismatch,
    /// Upgrade referenced a user without a stored credential.
    #[error("credential not found")]
    CredentialNotFound,
    /// Upgrade attempted without a matching authentication context.
    #[error("credential upgrade not authorized")]
    UnauthorizedUpgrade,
}

/// Result type
pub type Result<T> = core::result::Result<T, AuthError>;
