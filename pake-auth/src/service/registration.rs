//! Registration and credential upgrade flows.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;
use tracing::{info, warn};

use srp::groups::{self, G_2048};
use srp::kdf::KdfParameters;

use crate::contracts::{
    RegisterFinishRequest, RegisterFinishResponse, RegisterStartRequest, RegisterStartResponse,
    UpgradeCredentialRequest, UpgradeCredentialResponse,
};
use crate::credential::{Credential, CredentialStore, GroupDescriptor, VaultBlob};
use crate::errors::{AuthError, Result};
use crate::tokens::TokenIssuer;

use super::{AuthContext, PakeAuthService};

impl<C: CredentialStore, T: TokenIssuer> PakeAuthService<C, T> {
    /// Begin registration: generate fresh KDF parameters for the caller to
    /// derive its verifier under. Side-effect-free and idempotent; no secret
    /// is computed here.
    pub fn register_start<CSPRNG: CryptoRngCore>(
        &self,
        request: &RegisterStartRequest,
        rng: &mut CSPRNG,
    ) -> Result<RegisterStartResponse> {
        if request.user_id.trim().is_empty() {
            return Err(AuthError::InvalidRequest("userId"));
        }

        let kdf = KdfParameters::generate(rng);
        info!(user = %Self::mask(&request.user_id), "registration started");

        Ok(RegisterStartResponse {
            kdf_parameters_json: kdf.to_json(),
            algorithm: groups::ALGORITHM.to_owned(),
            modulus_hex: groups::MODULUS_HEX.to_owned(),
            generator: groups::GENERATOR,
        })
    }

    /// Complete registration with the client-computed verifier and the KDF
    /// parameters it was derived under. Create-only: a live credential is
    /// never overwritten here, only through the upgrade flow.
    pub fn register_finish(
        &self,
        request: &RegisterFinishRequest,
    ) -> Result<RegisterFinishResponse> {
        let user_id = Self::normalize_user_id(&request.user_id);
        if user_id.is_empty() {
            return Err(AuthError::InvalidRequest("userId"));
        }

        let verifier = Self::parse_verifier(&request.verifier_base64)?;
        let (kdf, salt) = Self::parse_kdf(&request.kdf_parameters_json)?;

        let credential = Credential {
            user_id: user_id.clone(),
            salt,
            verifier,
            kdf,
            group: GroupDescriptor::deployment(),
        };
        if !self.credentials.insert_if_absent(credential) {
            warn!(user = %Self::mask(&user_id), "registration rejected: already registered");
            return Err(AuthError::AlreadyRegistered);
        }

        if let Some(data_base64) = request
            .vault_data_base64
            .clone()
            .filter(|data| !data.is_empty())
        {
            self.credentials.store_vault(
                &user_id,
                VaultBlob {
                    data_base64,
                    kdf_metadata_json: request.vault_kdf_metadata_json.clone(),
                    cipher_suite: request
                        .vault_cipher_suite
                        .clone()
                        .unwrap_or_else(|| "AES-256-GCM".to_owned()),
                },
            );
        }

        info!(user = %Self::mask(&user_id), "registration finished");
        Ok(RegisterFinishResponse { success: true })
    }

    /// Atomically replace a stored credential with one derived under new
    /// KDF parameters.
    ///
    /// The caller must already be authenticated; `auth` is the capability
    /// the embedding layer threads through to prove it. A context/user
    /// mismatch rejects the request before anything is read.
    pub fn upgrade_credential(
        &self,
        auth: &AuthContext,
        request: &UpgradeCredentialRequest,
    ) -> Result<UpgradeCredentialResponse> {
        if !auth
            .user_id()
            .trim()
            .eq_ignore_ascii_case(request.user_id.trim())
        {
            warn!(user = %Self::mask(&request.user_id), "credential upgrade rejected: context mismatch");
            return Err(AuthError::UnauthorizedUpgrade);
        }

        let user_id = Self::normalize_user_id(&request.user_id);
        if self.credentials.lookup(&user_id).is_none() {
            return Err(AuthError::CredentialNotFound);
        }

        let verifier = Self::parse_verifier(&request.verifier_base64)?;
        let (kdf, salt) = Self::parse_kdf(&request.kdf_parameters_json)?;

        let replaced = self.credentials.replace(Credential {
            user_id: user_id.clone(),
            salt,
            verifier,
            kdf,
            group: GroupDescriptor::deployment(),
        });
        if !replaced {
            return Err(AuthError::CredentialNotFound);
        }

        info!(user = %Self::mask(&user_id), "credential upgraded");
        Ok(UpgradeCredentialResponse { success: true })
    }

    /// Decode and range-check a wire verifier; anything outside `(0, N)` is
    /// rejected before it reaches storage.
    fn parse_verifier(verifier_base64: &str) -> Result<BigUint> {
        let bytes = BASE64_STANDARD
            .decode(verifier_base64)
            .map_err(|_| AuthError::InvalidRequest("verifierBase64"))?;
        let verifier = BigUint::from_bytes_be(&bytes);
        if verifier.is_zero() || verifier >= G_2048.n {
            return Err(AuthError::InvalidRequest("verifierBase64"));
        }
        Ok(verifier)
    }

    /// Parse the KDF JSON and extract its salt; a credential without a salt
    /// cannot ever be re-derived.
    fn parse_kdf(kdf_parameters_json: &str) -> Result<(KdfParameters, Vec<u8>)> {
        let kdf = KdfParameters::from_json(kdf_parameters_json)
            .map_err(|_| AuthError::InvalidRequest("kdfParametersJson"))?;
        let salt = kdf
            .salt()
            .map_err(|_| AuthError::InvalidRequest("kdfParametersJson"))?;
        if salt.is_empty() {
            return Err(AuthError::InvalidRequest("kdfParametersJson"));
        }
        Ok((kdf, salt))
    }
}
