//! Additional SRP types.

use digest::Digest;
use num_bigint::BigUint;

use crate::utils::compute_k;

/// Group used for SRP computations.
///
/// Constructed once per process (see [`G_2048`](crate::groups::G_2048)) and
/// shared by every client and server. All parties must agree on the group
/// byte for byte; any divergence breaks every login without raising an error.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SrpGroup {
    /// A large safe prime (N = 2q+1, where q is prime)
    pub n: BigUint,
    /// A generator modulo N
    pub g: BigUint,
    k: BigUint,
    pad_length: usize,
}

impl SrpGroup {
    /// Initialize a group from its modulus and generator, deriving the
    /// multiplier `k = H(PAD(N) | PAD(g))` under digest `D`.
    pub fn new<D: Digest>(n: BigUint, g: BigUint) -> Self {
        let pad_length = n.bits().div_ceil(8) as usize;
        let k = compute_k::<D>(&n, &g, pad_length);
        Self {
            n,
            g,
            k,
            pad_length,
        }
    }

    /// g^exp % N
    pub fn modpow(&self, exp: &BigUint) -> BigUint {
        self.g.modpow(exp, &self.n)
    }

    /// Multiplier parameter `k`.
    pub fn k(&self) -> &BigUint {
        &self.k
    }

    /// Byte length every value is padded to before hashing or transmission.
    pub fn pad_length(&self) -> usize {
        self.pad_length
    }
}

/// An ephemeral SRP key pair: fresh, random and single-use per handshake
/// attempt.
#[derive(Debug, Clone)]
pub struct Ephemeral {
    /// Private value drawn uniformly from `(0, N)`.
    pub secret: BigUint,
    /// Public value sent to the peer.
    pub public: BigUint,
}

#[cfg(test)]
mod tests {
    use crate::groups::G_2048;
    use crate::utils::pad;
    use num_bigint::BigUint;
    use sha2::{Digest, Sha256};

    #[test]
    fn multiplier_is_hash_of_padded_group() {
        let mut d = Sha256::new();
        d.update(pad(&G_2048.n, G_2048.pad_length()));
        d.update(pad(&G_2048.g, G_2048.pad_length()));
        let k = BigUint::from_bytes_be(&d.finalize());
        assert_eq!(G_2048.k(), &k);
    }
}
