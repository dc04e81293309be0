//! Client-side driver for the wire contracts.
//!
//! Mirrors the server flows over the same DTOs: check the advertised group
//! before touching any secret material, derive the private key under the
//! advertised KDF (falling back to the legacy derivation when no KDF object
//! is present), validate the server ephemeral, reject a zero scramble, and
//! refuse to trust the server until its proof verifies. A login whose
//! server proof does not check out must be treated as failed even if the
//! server reported success.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use sha2::Sha256;
use uuid::Uuid;

use srp::client::{SrpClient, SrpClientVerifier};
use srp::groups::{self, G_2048};
use srp::kdf::{derive_private_key, KdfParameters};
use srp::Ephemeral;

use crate::contracts::{
    LoginFinishRequest, LoginFinishResponse, LoginStartRequest, LoginStartResponse,
    RegisterFinishRequest, RegisterStartResponse,
};
use crate::errors::{AuthError, Result};

/// Client half of the PAKE flows, driving the wire contracts.
pub struct PakeClient {
    user_id: String,
    password: String,
}

/// Login state held between sending Start and receiving its response.
pub struct LoginHandshake {
    ephemeral: Ephemeral,
}

/// Login state held between the Start response and the server's Finish
/// reply.
#[derive(Debug)]
pub struct PendingLogin {
    user_id: String,
    session_id: Uuid,
    verifier: SrpClientVerifier<Sha256>,
}

impl PakeClient {
    /// Create a client for one user's credentials. The identifier is
    /// normalized the same way the server stores it.
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            user_id: user_id.trim().to_lowercase(),
            password: password.into(),
        }
    }

    // Reject a group other than the deployment's before any
    // secret-dependent computation happens.
    fn check_group(algorithm: &str, modulus_hex: &str, generator: u32) -> Result<()> {
        if algorithm != groups::ALGORITHM
            || !modulus_hex.eq_ignore_ascii_case(groups::MODULUS_HEX)
            || generator != groups::GENERATOR
        {
            return Err(AuthError::ParameterMismatch);
        }
        Ok(())
    }

    /// Build the RegisterFinish payload from the server's Start response:
    /// derive `x` under the advertised KDF and compute the verifier.
    pub fn register(&self, start: &RegisterStartResponse) -> Result<RegisterFinishRequest> {
        Self::check_group(&start.algorithm, &start.modulus_hex, start.generator)?;

        let kdf = KdfParameters::from_json(&start.kdf_parameters_json)
            .map_err(|_| AuthError::InvalidRequest("kdfParametersJson"))?;
        let x = derive_private_key(&kdf, &self.user_id, &self.password)
            .map_err(|_| AuthError::InvalidRequest("kdfParametersJson"))?;
        let verifier = SrpClient::<Sha256>::new(&G_2048).compute_verifier(&x);

        Ok(RegisterFinishRequest {
            user_id: self.user_id.clone(),
            verifier_base64: BASE64_STANDARD.encode(verifier.to_bytes_be()),
            kdf_parameters_json: kdf.to_json(),
            vault_data_base64: None,
            vault_kdf_metadata_json: None,
            vault_cipher_suite: None,
        })
    }

    /// Begin a login: generate a fresh ephemeral pair and the Start
    /// request.
    pub fn start_login<CSPRNG: CryptoRngCore>(
        &self,
        rng: &mut CSPRNG,
    ) -> (LoginHandshake, LoginStartRequest) {
        let ephemeral = SrpClient::<Sha256>::new(&G_2048).generate_ephemeral(rng);
        let request = LoginStartRequest {
            user_id: self.user_id.clone(),
            client_public_ephemeral_base64: BASE64_STANDARD.encode(ephemeral.public.to_bytes_be()),
            client_id: None,
            device_name: None,
            device_platform: None,
        };
        (LoginHandshake { ephemeral }, request)
    }

    /// Process the server's Start response: derive the session key and both
    /// proofs. Fails on a foreign group, a malicious `B` or a degenerate
    /// scramble.
    pub fn process_start(
        &self,
        handshake: LoginHandshake,
        response: &LoginStartResponse,
    ) -> Result<PendingLogin> {
        Self::check_group(&response.algorithm, &response.modulus_hex, response.generator)?;

        // No KDF object means the credential predates KDF metadata; those
        // verifiers were derived with the legacy single-pass scheme.
        let kdf = match &response.kdf_parameters_json {
            Some(json) => KdfParameters::from_json(json)
                .map_err(|_| AuthError::InvalidRequest("kdfParametersJson"))?,
            None => KdfParameters::Legacy {
                salt_base64: response.salt_base64.clone(),
            },
        };
        let x = derive_private_key(&kdf, &self.user_id, &self.password)
            .map_err(|_| AuthError::AuthenticationFailed)?;

        let b_pub = BASE64_STANDARD
            .decode(&response.server_public_ephemeral_base64)
            .map(|bytes| BigUint::from_bytes_be(&bytes))
            .map_err(|_| AuthError::AuthenticationFailed)?;

        let verifier = SrpClient::<Sha256>::new(&G_2048)
            .process_reply(&handshake.ephemeral, &x, &b_pub)
            .map_err(|_| AuthError::AuthenticationFailed)?;

        Ok(PendingLogin {
            user_id: self.user_id.clone(),
            session_id: response.session_id,
            verifier,
        })
    }
}

impl PendingLogin {
    /// The Finish request carrying the client proof M1.
    pub fn finish_request(&self) -> LoginFinishRequest {
        LoginFinishRequest {
            user_id: self.user_id.clone(),
            session_id: self.session_id,
            client_proof_base64: BASE64_STANDARD.encode(self.verifier.proof()),
            client_id: None,
            device_name: None,
            device_platform: None,
        }
    }

    /// Verify the server's proof from the Finish response and return the
    /// shared session key. Mutual authentication: only a login that passes
    /// this check may be trusted.
    pub fn verify_server(&self, response: &LoginFinishResponse) -> Result<Vec<u8>> {
        if !response.success {
            return Err(AuthError::AuthenticationFailed);
        }
        let proof = BASE64_STANDARD
            .decode(&response.server_proof_base64)
            .map_err(|_| AuthError::AuthenticationFailed)?;
        self.verifier
            .verify_server(&proof)
            .map_err(|_| AuthError::AuthenticationFailed)?;
        Ok(self.verifier.key().to_vec())
    }
}
