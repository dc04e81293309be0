//! The server-side protocol flows.
//!
//! [`PakeAuthService`] sequences the math core into the two-phase
//! registration and login state machines and the credential upgrade flow.
//! It owns the transient session cache and a per-process decoy secret; the
//! credential store and the token issuer are external collaborators passed
//! in by the host.

mod login;
mod registration;

use std::time::Duration;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use sha2::{Digest, Sha256};

use srp::groups::G_2048;
use srp::kdf::{
    KdfParameters, DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM, SALT_LENGTH,
};
use srp::SrpGroup;

use crate::credential::CredentialStore;
use crate::session::{SessionCache, DEFAULT_SESSION_TTL};
use crate::tokens::TokenIssuer;

/// Tunables for the protocol flows.
#[derive(Debug, Clone)]
pub struct PakeAuthConfig {
    /// Lifetime of the Start→Finish window.
    pub session_ttl: Duration,
}

impl Default for PakeAuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Proof that the embedding auth layer has already authenticated a user.
///
/// The upgrade flow requires one. The upgrade wire contract deliberately
/// carries no token field, so this subsystem cannot mint a context from
/// request data alone: the host constructs it after validating its own
/// bearer credentials and threads it through the call.
#[derive(Debug, Clone)]
pub struct AuthContext {
    user_id: String,
}

impl AuthContext {
    /// Certify that `user_id` has passed the embedding layer's
    /// authentication.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// The authenticated user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Server-side PAKE flows over a credential store and a token issuer.
pub struct PakeAuthService<C, T> {
    group: &'static SrpGroup,
    credentials: C,
    tokens: T,
    sessions: SessionCache,
    // obscures whether a credential lookup failed
    decoy_secret: [u8; 32],
}

impl<C: CredentialStore, T: TokenIssuer> PakeAuthService<C, T> {
    /// Create a service instance. `rng` seeds the per-process decoy secret
    /// used to answer login attempts for unknown users.
    pub fn new<CSPRNG: CryptoRngCore>(
        credentials: C,
        tokens: T,
        config: PakeAuthConfig,
        rng: &mut CSPRNG,
    ) -> Self {
        let mut decoy_secret = [0u8; 32];
        rng.fill_bytes(&mut decoy_secret);
        Self {
            group: &G_2048,
            credentials,
            tokens,
            sessions: SessionCache::new(config.session_ttl),
            decoy_secret,
        }
    }

    /// The session cache, exposed so the host can schedule periodic
    /// [`evict_expired`](SessionCache::evict_expired) runs.
    pub fn sessions(&self) -> &SessionCache {
        &self.sessions
    }

    /// Lowercase, trimmed identifier form used for storage keys and
    /// lookups.
    pub(crate) fn normalize_user_id(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Identifier form safe for logs.
    pub(crate) fn mask(user_id: &str) -> String {
        let visible: String = user_id.chars().take(2).collect();
        format!("{visible}***")
    }

    /// Deterministic stand-in credential material for an unknown user: the
    /// same group, a stable per-user salt, default KDF costs and a verifier
    /// no password derives to. Keyed by the process decoy secret so repeated
    /// probes observe the same shape a real credential would have.
    pub(crate) fn decoy_credential(&self, user_id: &str) -> (Vec<u8>, BigUint, KdfParameters) {
        let salt_digest = Sha256::new()
            .chain_update(self.decoy_secret)
            .chain_update(b"decoy-salt")
            .chain_update(user_id.as_bytes())
            .finalize();
        let salt = salt_digest[..SALT_LENGTH].to_vec();

        let x_digest = Sha256::new()
            .chain_update(self.decoy_secret)
            .chain_update(b"decoy-verifier")
            .chain_update(user_id.as_bytes())
            .finalize();
        let verifier = self.group.modpow(&BigUint::from_bytes_be(&x_digest));

        let kdf = KdfParameters::Argon2id {
            salt_base64: BASE64_STANDARD.encode(&salt),
            parallelism: DEFAULT_PARALLELISM,
            iterations: DEFAULT_ITERATIONS,
            memory_kib: DEFAULT_MEMORY_KIB,
        };
        (salt, verifier, kdf)
    }
}
