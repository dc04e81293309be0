//! [Secure Remote Password][1] (SRP-6a) protocol primitives.
//!
//! SRP is a password-authenticated key exchange: the server stores only a
//! salted one-way *verifier* of the password, every login proves knowledge
//! of the password through a two-message challenge-response, and both sides
//! end up with the same session key and a proof that the other side holds
//! the same secret. Neither the password nor anything equivalent to it ever
//! crosses the wire.
//!
//! This crate provides the arithmetic core and the password KDF negotiation:
//!
//! - [`client`] and [`server`] implement the two halves of the handshake,
//!   generic over the [`Digest`](digest::Digest) used for the hash chains.
//! - [`groups`] holds the fixed deployment group (modulus, generator and the
//!   derived multiplier `k = H(PAD(N) | PAD(g))`), built once per process.
//! - [`kdf`] turns a password into the private key `x`, either through the
//!   legacy single SHA-256 pass or through Argon2id with tunable costs; the
//!   choice travels with the credential as a tagged parameter object.
//!
//! All values that are hashed or compared are first padded to the modulus
//! byte length, received public ephemerals are range-checked before use, a
//! zero scrambling parameter aborts the handshake, and proofs are compared
//! in constant time. The state machines that sequence these primitives into
//! registration and login flows live in the `pake-auth` crate.
//!
//! [1]: https://en.wikipedia.org/wiki/Secure_Remote_Password_protocol

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod client;
pub mod errors;
pub mod groups;
pub mod kdf;
pub mod server;
pub mod types;
pub mod utils;

pub use self::{
    errors::{Error, Result},
    types::{Ephemeral, SrpGroup},
};
