//! Token issuance collaborator.

/// Tokens minted for an authenticated user by the external issuer.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    /// Opaque access token.
    pub access_token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u32,
}

/// External collaborator that turns a verified login into tokens.
///
/// Called only after the client's proof has been verified; everything it
/// returns is passed through to the login response untouched.
pub trait TokenIssuer {
    /// Mint access and refresh tokens for `user_id`.
    fn issue(&self, user_id: &str) -> IssuedTokens;
}
