//! SRP server implementation.
//!
//! # Usage
//! Receive the user's `A` value, look up their stored verifier, and generate
//! a fresh server ephemeral pair:
//!
//! ```ignore
//! use sha2::Sha256;
//! use srp::groups::G_2048;
//! use srp::server::SrpServer;
//!
//! let server = SrpServer::<Sha256>::new(&G_2048);
//! let ephemeral = server.generate_ephemeral(&verifier, &mut rng);
//! ```
//!
//! Send `ephemeral.public` (B) and the stored salt to the user, keeping the
//! pair for the second round trip. When the user's proof arrives, process
//! the handshake and verify it:
//!
//! ```ignore
//! let verifier = server.process_reply(&ephemeral, &stored_verifier, &a_pub)?;
//! verifier.verify_client(&client_proof)?;
//! send_proof(verifier.proof());
//! ```
//!
//! `process_reply` rejects a malicious `A` and a degenerate scrambling
//! parameter before any proof comparison. The shared secret is available
//! from `key()` once the client's proof has been verified.

use core::marker::PhantomData;

use digest::{Digest, Output};
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;

use crate::errors::{Error, Result};
use crate::types::{Ephemeral, SrpGroup};
use crate::utils::{
    compute_m1, compute_m2, compute_session_key, compute_u, generate_private_value,
    is_valid_public_ephemeral,
};

/// SRP server state for a single handshake.
pub struct SrpServer<D: Digest> {
    group: &'static SrpGroup,
    d: PhantomData<D>,
}

/// SRP server state after processing the client's handshake.
pub struct SrpServerVerifier<D: Digest> {
    m1: Output<D>,
    m2: Output<D>,
    key: Vec<u8>,
}

impl<D: Digest> SrpServer<D> {
    /// Create a new SRP server instance.
    #[must_use]
    pub const fn new(group: &'static SrpGroup) -> Self {
        Self {
            group,
            d: PhantomData,
        }
    }

    /// Generate a fresh ephemeral pair `(b, B = (k*v + g^b) % N)` for the
    /// user with password verifier `v`.
    pub fn generate_ephemeral<CSPRNG: CryptoRngCore>(
        &self,
        verifier: &BigUint,
        rng: &mut CSPRNG,
    ) -> Ephemeral {
        let secret = generate_private_value(self.group, rng);
        let public = (self.group.k() * verifier + self.group.modpow(&secret)) % &self.group.n;
        Ephemeral { secret, public }
    }

    /// Server-side session secret
    /// `S = (A * v^u % N) ^ b % N`.
    ///
    /// For an honest pair this agrees with the client-side computation.
    #[must_use]
    pub fn compute_session(
        &self,
        a_pub: &BigUint,
        verifier: &BigUint,
        b: &BigUint,
        u: &BigUint,
    ) -> BigUint {
        let n = &self.group.n;
        let base = (a_pub * verifier.modpow(u, n)) % n;
        base.modpow(b, n)
    }

    /// Process the client's handshake: validate `A`, compute the shared
    /// session key, the expected client proof and the server proof.
    ///
    /// `ephemeral` is the pair generated for this attempt, `verifier` the
    /// stored password verifier, `a_pub` the client's public value.
    pub fn process_reply(
        &self,
        ephemeral: &Ephemeral,
        verifier: &BigUint,
        a_pub: &BigUint,
    ) -> Result<SrpServerVerifier<D>> {
        // Safeguard against malicious A
        if !is_valid_public_ephemeral(self.group, a_pub) {
            return Err(Error::IllegalParameter { name: "a_pub" });
        }

        let u = compute_u::<D>(self.group, a_pub, &ephemeral.public);
        if u.is_zero() {
            return Err(Error::DegenerateScramble);
        }

        let session = self.compute_session(a_pub, verifier, &ephemeral.secret, &u);
        let key = compute_session_key::<D>(self.group, &session);
        let m1 = compute_m1::<D>(self.group, a_pub, &ephemeral.public, &key);
        let m2 = compute_m2::<D>(self.group, a_pub, &m1, &key);

        Ok(SrpServerVerifier {
            m1,
            m2,
            key: key.to_vec(),
        })
    }
}

impl<D: Digest> SrpServerVerifier<D> {
    /// Get the shared session key. Only hand it out once [`verify_client`]
    /// succeeds.
    ///
    /// [`verify_client`]: Self::verify_client
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Server proof (M2) for sending to the user after their proof checks
    /// out.
    pub fn proof(&self) -> &[u8] {
        self.m2.as_slice()
    }

    /// Verify the client's proof (M1) of the shared secret in constant
    /// time.
    pub fn verify_client(&self, proof: &[u8]) -> Result<()> {
        if self.m1.ct_eq(proof).unwrap_u8() == 1 {
            Ok(())
        } else {
            Err(Error::BadRecordMac { peer: "user" })
        }
    }
}
