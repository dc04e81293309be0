//! SRP-6a registration and login flows.
//!
//! This crate sequences the [`srp`] math core into the two-phase protocol
//! state machines of a password-authenticated key exchange service:
//!
//! - **Registration** (`Start → Finish`): the server hands out fresh KDF
//!   parameters; the client derives a verifier and registers it together
//!   with the parameters and an optional opaque vault payload.
//! - **Login** (`Start → Finish`, TTL-bounded): a two-message
//!   challenge-response that proves password knowledge in zero knowledge,
//!   derives a shared session key, and ends with mutual proof. The
//!   intermediate state lives in a single-use [`SessionCache`] entry.
//! - **Credential upgrade**: an already-authenticated user atomically
//!   replaces their credential with one derived under new KDF parameters.
//!
//! Persistence and token issuance are collaborators behind the
//! [`CredentialStore`] and [`TokenIssuer`] traits; HTTP framing, JWT
//! contents and rate limiting live outside this crate. The wire DTOs in
//! [`contracts`] define the JSON the flows speak, and [`client`] drives the
//! same DTOs from the other side, including the mandatory verification of
//! the server's proof.
//!
//! Login failures are deliberately indistinguishable at the boundary: an
//! unknown user, a replayed session and a wrong password all produce the
//! same opaque [`AuthError::AuthenticationFailed`], and Login Start answers
//! unknown users with a deterministic decoy challenge.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod client;
pub mod contracts;
pub mod credential;
pub mod errors;
pub mod service;
pub mod session;
pub mod tokens;

pub use self::{
    client::{LoginHandshake, PakeClient, PendingLogin},
    credential::{Credential, CredentialStore, GroupDescriptor, MemoryCredentialStore, VaultBlob},
    errors::{AuthError, Result},
    service::{AuthContext, PakeAuthConfig, PakeAuthService},
    session::{LoginSession, SessionCache},
    tokens::{IssuedTokens, TokenIssuer},
};
