//! Wire contracts for the PAKE endpoints.
//!
//! All byte values travel Base64-encoded; field names follow the JSON
//! camelCase convention shared with the non-Rust clients. Token fields in
//! [`LoginFinishResponse`] are produced by the external token issuer and are
//! opaque to this subsystem.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Begins user registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStartRequest {
    /// User identifier (stable username / email alias).
    pub user_id: String,
}

/// Register-start reply: the KDF to derive the verifier under, plus the
/// group descriptor the client must verify before deriving anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStartResponse {
    /// JSON form of the freshly generated KDF parameters.
    pub kdf_parameters_json: String,
    /// Algorithm identifier of the deployment group.
    pub algorithm: String,
    /// Hex encoding of the group modulus.
    pub modulus_hex: String,
    /// Group generator.
    pub generator: u32,
}

/// Completes registration with the client-computed verifier and an optional
/// encrypted vault payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFinishRequest {
    /// User identifier submitted in Start.
    pub user_id: String,
    /// Base64-encoded verifier `v = g^x % N`.
    pub verifier_base64: String,
    /// JSON form of the KDF parameters the verifier was derived under.
    pub kdf_parameters_json: String,
    /// Optional encrypted vault payload to bootstrap key storage.
    #[serde(default)]
    pub vault_data_base64: Option<String>,
    /// Optional JSON describing encryption/KDF parameters for the vault.
    #[serde(default)]
    pub vault_kdf_metadata_json: Option<String>,
    /// Optional cipher suite descriptor (e.g. AES-256-GCM).
    #[serde(default)]
    pub vault_cipher_suite: Option<String>,
}

/// Register-finish reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFinishResponse {
    /// Whether the credential was stored.
    pub success: bool,
}

/// Begins a login handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStartRequest {
    /// User identifier to authenticate.
    pub user_id: String,
    /// Base64-encoded client public ephemeral `A`.
    pub client_public_ephemeral_base64: String,
    /// Optional device identifier (machine name / mobile id).
    #[serde(default)]
    pub client_id: Option<String>,
    /// Optional human-readable device name.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Optional device platform tag.
    #[serde(default)]
    pub device_platform: Option<String>,
}

/// Login-start reply carrying the challenge parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStartResponse {
    /// JSON form of the credential's KDF parameters; absent only for
    /// credentials that predate KDF metadata, in which case the client
    /// falls back to the legacy derivation over `salt_base64`.
    pub kdf_parameters_json: Option<String>,
    /// Base64-encoded credential salt.
    pub salt_base64: String,
    /// Base64-encoded server public ephemeral `B`.
    pub server_public_ephemeral_base64: String,
    /// Handle for the Finish round trip.
    pub session_id: Uuid,
    /// Algorithm identifier of the deployment group.
    pub algorithm: String,
    /// Hex encoding of the group modulus.
    pub modulus_hex: String,
    /// Group generator.
    pub generator: u32,
}

/// Completes a login with the client proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginFinishRequest {
    /// User identifier to authenticate.
    pub user_id: String,
    /// Server-provided session identifier from Start.
    pub session_id: Uuid,
    /// Base64-encoded client proof M1.
    pub client_proof_base64: String,
    /// Optional device identifier (machine name / mobile id).
    #[serde(default)]
    pub client_id: Option<String>,
    /// Optional human-readable device name.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Optional device platform tag.
    #[serde(default)]
    pub device_platform: Option<String>,
}

/// Login-finish reply with issued tokens and the server proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginFinishResponse {
    /// Whether authentication succeeded.
    pub success: bool,
    /// Whether an encrypted vault payload is stored for the user.
    pub has_vault: bool,
    /// Opaque access token from the external issuer.
    pub access_token: String,
    /// Opaque refresh token from the external issuer.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u32,
    /// Base64-encoded server proof M2 for the client to verify.
    pub server_proof_base64: String,
}

/// Replaces a stored credential with one derived under a new KDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeCredentialRequest {
    /// The user to upgrade.
    pub user_id: String,
    /// Base64-encoded verifier computed under the new KDF.
    pub verifier_base64: String,
    /// JSON form of the new KDF parameters.
    pub kdf_parameters_json: String,
}

/// Upgrade reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeCredentialResponse {
    /// Whether the credential was replaced.
    pub success: bool,
}
