//! SRP client implementation.
//!
//! # Usage
//! First create an SRP client from the deployment group (shared between
//! client and server) and derive the private key `x` from the password using
//! the KDF parameters the server advertised:
//!
//! ```ignore
//! use sha2::Sha256;
//! use srp::client::SrpClient;
//! use srp::groups::G_2048;
//! use srp::kdf::derive_private_key;
//!
//! let client = SrpClient::<Sha256>::new(&G_2048);
//! let x = derive_private_key(&kdf, user_id, password)?;
//! ```
//!
//! For registration, send the verifier (and the KDF parameters used) to the
//! server over a protected channel:
//!
//! ```ignore
//! let verifier = client.compute_verifier(&x);
//! ```
//!
//! For login, generate a fresh ephemeral pair, send `A` to the server, and
//! process the server's reply. `process_reply` fails on a malicious `B` or a
//! degenerate scrambling parameter:
//!
//! ```ignore
//! let ephemeral = client.generate_ephemeral(&mut rng);
//! let (salt, b_pub) = server_response();
//! let verifier = client.process_reply(&ephemeral, &x, &b_pub)?;
//! ```
//!
//! Finally send `verifier.proof()` (M1) to the server and check its reply
//! against M2. A login the server cannot prove back must be treated as
//! failed:
//!
//! ```ignore
//! let server_proof = send_proof(verifier.proof());
//! verifier.verify_server(&server_proof)?;
//! let session_key = verifier.key();
//! ```

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

/// SRP client state before the handshake with the server.
pub struct SrpClient<D: Digest> {
    group: &'static SrpGroup,
    d: PhantomData<D>,
}

/// SRP client state after processing the server's reply.
#[derive(Debug)]
pub struct SrpClientVerifier<D: Digest> {
    m1: Output<D>,
    m2: Output<D>,
    key: Vec<u8>,
}

impl<D: Digest> SrpClient<D> {
    /// Create a new SRP client instance.
    #[must_use]
    pub const fn new(group: &'static SrpGroup) -> Self {
        Self {
            group,
            d: PhantomData,
        }
    }

    /// Get the password verifier `v = g^x % N` for registration on the
    /// server.
    #[must_use]
    pub fn compute_verifier(&self, x: &BigUint) -> BigUint {
        self.group.modpow(x)
    }

    /// Generate a fresh ephemeral pair `(a, A = g^a % N)`.
    pub fn generate_ephemeral<CSPRNG: CryptoRngCore>(&self, rng: &mut CSPRNG) -> Ephemeral {
        let secret = generate_private_value(self.group, rng);
        let public = self.group.modpow(&secret);
        Ephemeral { secret, public }
    }

    /// Client-side session secret
    /// `S = ((B - k*g^x) % N) ^ (a + u*x) % N`.
    #[must_use]
    pub fn compute_session(
        &self,
        b_pub: &BigUint,
        x: &BigUint,
        a: &BigUint,
        u: &BigUint,
    ) -> BigUint {
        let n = &self.group.n;
        let k_g_x = (self.group.k() * self.group.modpow(x)) % n;
        // normalize the base into [0, N) before exponentiation
        let base = (b_pub + n - k_g_x) % n;
        let exp = a + u * x;
        base.modpow(&exp, n)
    }

    /// Process the server's reply to the handshake: validate `B`, compute
    /// the shared session key and both proofs.
    ///
    /// `ephemeral` is the pair generated for this attempt, `x` the private
    /// key derived from the password, `b_pub` the server's public value.
    pub fn process_reply(
        &self,
        ephemeral: &Ephemeral,
        x: &BigUint,
        b_pub: &BigUint,
    ) -> Result<SrpClientVerifier<D>> {
        // Safeguard against malicious B
        if !is_valid_public_ephemeral(self.group, b_pub) {
            return Err(Error::IllegalParameter { name: "b_pub" });
        }

        let u = compute_u::<D>(self.group, &ephemeral.public, b_pub);
        if u.is_zero() {
            return Err(Error::DegenerateScramble);
        }

        let session = self.compute_session(b_pub, x, &ephemeral.secret, &u);
        let key = compute_session_key::<D>(self.group, &session);
        let m1 = compute_m1::<D>(self.group, &ephemeral.public, b_pub, &key);
        let m2 = compute_m2::<D>(self.group, &ephemeral.public, &m1, &key);

        Ok(SrpClientVerifier {
            m1,
            m2,
            key: key.to_vec(),
        })
    }
}

impl<D: Digest> SrpClientVerifier<D> {
    /// Get the shared session key. Only trust it after [`verify_server`]
    /// succeeds.
    ///
    /// [`verify_server`]: Self::verify_server
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Verification data (M1) for sending to the server.
    pub fn proof(&self) -> &[u8] {
        self.m1.as_slice()
    }

    /// Verify the server's reply (M2) to our proof. A mismatch means the
    /// server does not hold the verifier and must not be trusted.
    pub fn verify_server(&self, reply: &[u8]) -> Result<()> {
        if self.m2.ct_eq(reply).unwrap_u8() == 1 {
            Ok(())
        } else {
            Err(Error::BadRecordMac { peer: "server" })
        }
    }
}
