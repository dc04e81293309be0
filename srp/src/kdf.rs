//! Password key-derivation parameters and the private key derivation.
//!
//! The KDF describes how a password is stretched into the SRP private key
//! `x`. Its parameters are generated here, serialized to a small JSON object
//! for transport, and stored next to the credential so a verifier can always
//! be recomputed exactly the way it was created. The algorithm tag travels
//! with the credential and is never inferred: credentials issued under the
//! legacy single-pass derivation keep authenticating indefinitely.

use argon2::{Algorithm, Argon2, AssociatedData, ParamsBuilder, Version};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{Error, Result};

/// Default Argon2id degree of parallelism for new credentials.
pub const DEFAULT_PARALLELISM: u32 = 2;

/// Default Argon2id iteration count for new credentials.
pub const DEFAULT_ITERATIONS: u32 = 3;

/// Default Argon2id memory cost in KiB for new credentials.
pub const DEFAULT_MEMORY_KIB: u32 = 65536;

/// Salt length generated for new credentials.
pub const SALT_LENGTH: usize = 16;

/// Private key length produced by every derivation path.
const PRIVATE_KEY_LENGTH: usize = 32;

/// How a password becomes the SRP private key `x`.
///
/// Serialized with the wire field names (`alg`, `salt`, `p`, `t`, `m`);
/// adding a new derivation is a compile-checked change to the `match` in
/// [`derive_private_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "alg")]
pub enum KdfParameters {
    /// Single SHA-256 pass with no tunable cost; predates Argon2id and is
    /// kept only so existing credentials continue to work.
    #[serde(rename = "sha256")]
    Legacy {
        /// Base64-encoded salt.
        #[serde(rename = "salt")]
        salt_base64: String,
    },
    /// Argon2id with tunable memory, iteration and parallelism costs.
    #[serde(rename = "argon2id")]
    Argon2id {
        /// Base64-encoded salt.
        #[serde(rename = "salt")]
        salt_base64: String,
        /// Degree of parallelism.
        #[serde(rename = "p")]
        parallelism: u32,
        /// Iteration count.
        #[serde(rename = "t")]
        iterations: u32,
        /// Memory cost in KiB.
        #[serde(rename = "m")]
        memory_kib: u32,
    },
}

impl KdfParameters {
    /// Fresh Argon2id parameters with the default costs and a new random
    /// salt. This is the single place default costs are tuned.
    pub fn generate<CSPRNG: CryptoRngCore>(rng: &mut CSPRNG) -> Self {
        let mut salt = [0u8; SALT_LENGTH];
        rng.fill_bytes(&mut salt);
        Self::Argon2id {
            salt_base64: BASE64_STANDARD.encode(salt),
            parallelism: DEFAULT_PARALLELISM,
            iterations: DEFAULT_ITERATIONS,
            memory_kib: DEFAULT_MEMORY_KIB,
        }
    }

    /// Parse the transport JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|_| Error::IllegalParameter {
            name: "kdf_parameters",
        })
    }

    /// Serialize to the transport JSON form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("kdf parameters always serialize")
    }

    /// Base64 form of the salt, as carried on the wire.
    pub fn salt_base64(&self) -> &str {
        match self {
            Self::Legacy { salt_base64 } | Self::Argon2id { salt_base64, .. } => salt_base64,
        }
    }

    /// Decoded salt bytes.
    pub fn salt(&self) -> Result<Vec<u8>> {
        BASE64_STANDARD
            .decode(self.salt_base64())
            .map_err(|_| Error::IllegalParameter { name: "salt" })
    }
}

/// Derive the SRP private key `x` from a password under the given KDF.
///
/// Both derivation paths interpret their digest as an unsigned big-endian
/// integer. The match is exhaustive over the algorithm tag.
pub fn derive_private_key(
    kdf: &KdfParameters,
    user_id: &str,
    password: &str,
) -> Result<BigUint> {
    let salt = kdf.salt()?;
    if salt.is_empty() {
        return Err(Error::IllegalParameter { name: "salt" });
    }

    match kdf {
        // x = H(salt | H(user_id ":" password))
        KdfParameters::Legacy { .. } => {
            let mut inner = Sha256::new();
            inner.update(user_id.as_bytes());
            inner.update(b":");
            inner.update(password.as_bytes());
            let identity_hash = inner.finalize();

            let mut outer = Sha256::new();
            outer.update(&salt);
            outer.update(identity_hash);
            Ok(BigUint::from_bytes_be(&outer.finalize()))
        }
        // x = Argon2id(password, salt, p/t/m, ad = H(user_id))
        KdfParameters::Argon2id {
            parallelism,
            iterations,
            memory_kib,
            ..
        } => {
            // argon2 caps associated data at 32 bytes; bind the user id
            // through its digest so arbitrary-length identifiers fit.
            let user_binding = Sha256::digest(user_id.as_bytes());
            let associated_data =
                AssociatedData::new(&user_binding).map_err(|_| Error::KdfFailure)?;

            let params = ParamsBuilder::new()
                .m_cost(*memory_kib)
                .t_cost(*iterations)
                .p_cost(*parallelism)
                .data(associated_data)
                .output_len(PRIVATE_KEY_LENGTH)
                .build()
                .map_err(|_| Error::KdfFailure)?;

            let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
            let mut output = [0u8; PRIVATE_KEY_LENGTH];
            argon2
                .hash_password_into(password.as_bytes(), &salt, &mut output)
                .map_err(|_| Error::KdfFailure)?;
            Ok(BigUint::from_bytes_be(&output))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn argon2_test_params(salt: &[u8]) -> KdfParameters {
        // small costs so the suite stays fast
        KdfParameters::Argon2id {
            salt_base64: BASE64_STANDARD.encode(salt),
            parallelism: 1,
            iterations: 1,
            memory_kib: 1024,
        }
    }

    #[test]
    fn argon2_json_round_trip_keeps_wire_field_names() {
        let kdf = KdfParameters::Argon2id {
            salt_base64: BASE64_STANDARD.encode([7u8; SALT_LENGTH]),
            parallelism: 2,
            iterations: 3,
            memory_kib: 65536,
        };
        let json = kdf.to_json();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["alg"], "argon2id");
        assert_eq!(value["p"], 2);
        assert_eq!(value["t"], 3);
        assert_eq!(value["m"], 65536);
        assert!(value["salt"].is_string());
        assert_eq!(KdfParameters::from_json(&json).unwrap(), kdf);
    }

    #[test]
    fn legacy_json_round_trip() {
        let kdf = KdfParameters::Legacy {
            salt_base64: BASE64_STANDARD.encode([1u8; SALT_LENGTH]),
        };
        let json = kdf.to_json();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["alg"], "sha256");
        assert_eq!(KdfParameters::from_json(&json).unwrap(), kdf);
    }

    #[test]
    fn legacy_json_with_zeroed_costs_still_parses() {
        // older credentials serialize unused cost fields as zeros
        let json = format!(
            r#"{{"alg":"sha256","salt":"{}","p":0,"t":0,"m":0}}"#,
            BASE64_STANDARD.encode([1u8; SALT_LENGTH])
        );
        let parsed = KdfParameters::from_json(&json).unwrap();
        assert!(matches!(parsed, KdfParameters::Legacy { .. }));
    }

    #[test]
    fn unknown_algorithm_tag_is_rejected() {
        let json = r#"{"alg":"pbkdf2","salt":"AAAA"}"#;
        assert!(KdfParameters::from_json(json).is_err());
    }

    #[test]
    fn generated_parameters_use_default_costs() {
        let mut rng = rand::rngs::OsRng;
        let kdf = KdfParameters::generate(&mut rng);
        match kdf {
            KdfParameters::Argon2id {
                parallelism,
                iterations,
                memory_kib,
                ref salt_base64,
            } => {
                assert_eq!(parallelism, DEFAULT_PARALLELISM);
                assert_eq!(iterations, DEFAULT_ITERATIONS);
                assert_eq!(memory_kib, DEFAULT_MEMORY_KIB);
                assert_eq!(
                    BASE64_STANDARD.decode(salt_base64).unwrap().len(),
                    SALT_LENGTH
                );
            }
            KdfParameters::Legacy { .. } => panic!("generate must pick Argon2id"),
        }
    }

    #[test]
    fn legacy_derivation_is_deterministic() {
        let kdf = KdfParameters::Legacy {
            salt_base64: BASE64_STANDARD.encode([9u8; SALT_LENGTH]),
        };
        let a = derive_private_key(&kdf, "alice@example.com", "hunter2").unwrap();
        let b = derive_private_key(&kdf, "alice@example.com", "hunter2").unwrap();
        assert_eq!(a, b);
        let c = derive_private_key(&kdf, "alice@example.com", "hunter3").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn argon2_derivation_is_deterministic_and_user_bound() {
        let kdf = argon2_test_params(&[3u8; SALT_LENGTH]);
        let a = derive_private_key(&kdf, "alice@example.com", "hunter2").unwrap();
        let b = derive_private_key(&kdf, "alice@example.com", "hunter2").unwrap();
        assert_eq!(a, b);
        // associated data binds the user id
        let c = derive_private_key(&kdf, "bob@example.com", "hunter2").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn derivation_paths_disagree() {
        let salt = [5u8; SALT_LENGTH];
        let legacy = KdfParameters::Legacy {
            salt_base64: BASE64_STANDARD.encode(salt),
        };
        let argon2 = argon2_test_params(&salt);
        let x_legacy = derive_private_key(&legacy, "alice@example.com", "hunter2").unwrap();
        let x_argon2 = derive_private_key(&argon2, "alice@example.com", "hunter2").unwrap();
        assert_ne!(x_legacy, x_argon2);
    }

    #[test]
    fn empty_salt_is_rejected() {
        let kdf = KdfParameters::Legacy {
            salt_base64: String::new(),
        };
        assert_eq!(
            derive_private_key(&kdf, "alice@example.com", "hunter2"),
            Err(Error::IllegalParameter { name: "salt" })
        );
    }
}
