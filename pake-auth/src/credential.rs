//! Stored credentials and the storage collaborator.
//!
//! Persistence is abstracted behind [`CredentialStore`] so the protocol
//! flows can run against any backing engine; [`MemoryCredentialStore`] is a
//! process-local implementation for tests and single-node embedding.

use std::collections::HashMap;
use std::sync::Mutex;

use num_bigint::BigUint;
use srp::groups;
use srp::kdf::KdfParameters;

/// Wire descriptor of the SRP group a credential was created under.
///
/// Recorded at registration and checked against the deployment group at
/// every login, before any secret material is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDescriptor {
    /// Algorithm identifier.
    pub algorithm: String,
    /// Hex encoding of the modulus.
    pub modulus_hex: String,
    /// Group generator.
    pub generator: u32,
}

impl GroupDescriptor {
    /// The descriptor of the process-wide deployment group.
    pub fn deployment() -> Self {
        Self {
            algorithm: groups::ALGORITHM.to_owned(),
            modulus_hex: groups::MODULUS_HEX.to_owned(),
            generator: groups::GENERATOR,
        }
    }

    /// Whether this descriptor names the deployment group. The modulus
    /// comparison is case-insensitive; everything else is exact.
    pub fn matches_deployment(&self) -> bool {
        self.algorithm == groups::ALGORITHM
            && self.modulus_hex.eq_ignore_ascii_case(groups::MODULUS_HEX)
            && self.generator == groups::GENERATOR
    }
}

/// A user's registered PAKE credential.
///
/// Created at registration finish, read at every login start and replaced
/// (never mutated in place) by the upgrade flow. At most one live credential
/// exists per user id.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Normalized user identifier.
    pub user_id: String,
    /// KDF salt, also carried inside `kdf`.
    pub salt: Vec<u8>,
    /// Password verifier `v = g^x % N`.
    pub verifier: BigUint,
    /// The KDF the verifier was derived under; authoritative for how to
    /// recompute `x`.
    pub kdf: KdfParameters,
    /// The group the credential was created under.
    pub group: GroupDescriptor,
}

/// Opaque encrypted vault payload stored next to a credential for later
/// device pairing. This subsystem never interprets it.
#[derive(Debug, Clone)]
pub struct VaultBlob {
    /// Base64-encoded ciphertext.
    pub data_base64: String,
    /// JSON describing the client-side encryption parameters.
    pub kdf_metadata_json: Option<String>,
    /// Cipher suite descriptor.
    pub cipher_suite: String,
}

/// Storage collaborator for credentials and vault blobs.
pub trait CredentialStore {
    /// Store a credential only if the user has none; returns `false` when a
    /// live credential already exists (registration is create-only).
    fn insert_if_absent(&self, credential: Credential) -> bool;

    /// Fetch the live credential for a user.
    fn lookup(&self, user_id: &str) -> Option<Credential>;

    /// Atomically replace an existing credential; returns `false` when the
    /// user has none to replace.
    fn replace(&self, credential: Credential) -> bool;

    /// Store an opaque vault blob for the user.
    fn store_vault(&self, user_id: &str, vault: VaultBlob);

    /// Whether a vault blob is stored for the user.
    fn has_vault(&self, user_id: &str) -> bool;
}

/// In-memory [`CredentialStore`] for tests and single-process embedding.
#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: Mutex<HashMap<String, Credential>>,
    vaults: Mutex<HashMap<String, VaultBlob>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn insert_if_absent(&self, credential: Credential) -> bool {
        let mut credentials = self.credentials.lock().expect("credential store poisoned");
        if credentials.contains_key(&credential.user_id) {
            return false;
        }
        credentials.insert(credential.user_id.clone(), credential);
        true
    }

    fn lookup(&self, user_id: &str) -> Option<Credential> {
        let credentials = self.credentials.lock().expect("credential store poisoned");
        credentials.get(user_id).cloned()
    }

    fn replace(&self, credential: Credential) -> bool {
        let mut credentials = self.credentials.lock().expect("credential store poisoned");
        if !credentials.contains_key(&credential.user_id) {
            return false;
        }
        credentials.insert(credential.user_id.clone(), credential);
        true
    }

    fn store_vault(&self, user_id: &str, vault: VaultBlob) {
        let mut vaults = self.vaults.lock().expect("vault store poisoned");
        vaults.insert(user_id.to_owned(), vault);
    }

    fn has_vault(&self, user_id: &str) -> bool {
        let vaults = self.vaults.lock().expect("vault store poisoned");
        vaults.contains_key(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(user_id: &str) -> Credential {
        Credential {
            user_id: user_id.to_owned(),
            salt: vec![1; 16],
            verifier: BigUint::from(42u32),
            kdf: KdfParameters::Legacy {
                salt_base64: "AQEB".to_owned(),
            },
            group: GroupDescriptor::deployment(),
        }
    }

    #[test]
    fn insert_is_create_only() {
        let store = MemoryCredentialStore::new();
        assert!(store.insert_if_absent(credential("alice")));
        assert!(!store.insert_if_absent(credential("alice")));
    }

    #[test]
    fn replace_requires_existing_credential() {
        let store = MemoryCredentialStore::new();
        assert!(!store.replace(credential("alice")));
        assert!(store.insert_if_absent(credential("alice")));
        let mut upgraded = credential("alice");
        upgraded.verifier = BigUint::from(7u32);
        assert!(store.replace(upgraded));
        assert_eq!(
            store.lookup("alice").unwrap().verifier,
            BigUint::from(7u32)
        );
    }

    #[test]
    fn deployment_descriptor_matches_itself() {
        let mut descriptor = GroupDescriptor::deployment();
        assert!(descriptor.matches_deployment());
        descriptor.modulus_hex = descriptor.modulus_hex.to_lowercase();
        assert!(descriptor.matches_deployment());
        descriptor.generator = 5;
        assert!(!descriptor.matches_deployment());
    }
}
