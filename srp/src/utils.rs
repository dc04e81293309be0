//! Shared SRP-6a computations.
//!
//! Every value hashed or compared in the protocol is first passed through
//! [`pad`]: unsigned big-endian, zero-left-padded to the modulus byte length.
//! Skipping the padding on either side desynchronizes client and server
//! silently, so all hash chains below are built from padded encodings only.

use digest::{Digest, Output};
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;

use crate::types::SrpGroup;

/// Encode `value` as unsigned big-endian, zero-left-padded to `pad_length`.
///
/// Values wider than `pad_length` keep their least significant bytes.
pub fn pad(value: &BigUint, pad_length: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes.len() == pad_length {
        return bytes;
    }
    if bytes.len() > pad_length {
        return bytes[bytes.len() - pad_length..].to_vec();
    }
    let mut padded = vec![0u8; pad_length - bytes.len()];
    padded.extend_from_slice(&bytes);
    padded
}

// k = H(PAD(N) | PAD(g))
pub fn compute_k<D: Digest>(n: &BigUint, g: &BigUint, pad_length: usize) -> BigUint {
    let mut d = D::new();
    d.update(pad(n, pad_length));
    d.update(pad(g, pad_length));
    BigUint::from_bytes_be(&d.finalize())
}

// u = H(PAD(A) | PAD(B))
pub fn compute_u<D: Digest>(group: &SrpGroup, a_pub: &BigUint, b_pub: &BigUint) -> BigUint {
    let mut d = D::new();
    d.update(pad(a_pub, group.pad_length()));
    d.update(pad(b_pub, group.pad_length()));
    BigUint::from_bytes_be(&d.finalize())
}

// K = H(PAD(S))
pub fn compute_session_key<D: Digest>(group: &SrpGroup, session: &BigUint) -> Output<D> {
    let mut d = D::new();
    d.update(pad(session, group.pad_length()));
    d.finalize()
}

// M1 = H(PAD(A) | PAD(B) | K)
pub fn compute_m1<D: Digest>(
    group: &SrpGroup,
    a_pub: &BigUint,
    b_pub: &BigUint,
    key: &[u8],
) -> Output<D> {
    let mut d = D::new();
    d.update(pad(a_pub, group.pad_length()));
    d.update(pad(b_pub, group.pad_length()));
    d.update(key);
    d.finalize()
}

// M2 = H(PAD(A) | M1 | K)
pub fn compute_m2<D: Digest>(
    group: &SrpGroup,
    a_pub: &BigUint,
    m1: &[u8],
    key: &[u8],
) -> Output<D> {
    let mut d = D::new();
    d.update(pad(a_pub, group.pad_length()));
    d.update(m1);
    d.update(key);
    d.finalize()
}

/// Whether a received public ephemeral lies in the legal range `(0, N)`.
///
/// A zero residue lets an active attacker fix the session secret, and an
/// unreduced value is a protocol violation. Each party must check the value
/// it receives before any further computation.
pub fn is_valid_public_ephemeral(group: &SrpGroup, value: &BigUint) -> bool {
    !value.is_zero() && value < &group.n
}

/// Draw a private ephemeral value uniformly from `(0, N)`.
///
/// Rejection sampling on a modulus-length CSPRNG buffer; out-of-range draws
/// are discarded rather than reduced, which would bias the low end.
pub fn generate_private_value<CSPRNG: CryptoRngCore>(
    group: &SrpGroup,
    rng: &mut CSPRNG,
) -> BigUint {
    let mut buf = vec![0u8; group.pad_length()];
    loop {
        rng.fill_bytes(&mut buf);
        let value = BigUint::from_bytes_be(&buf);
        if !value.is_zero() && value < group.n {
            return value;
        }
    }
}
