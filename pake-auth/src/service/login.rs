//! Login flow.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use sha2::Sha256;
use tracing::{info, warn};

use srp::groups;
use srp::server::SrpServer;
use srp::utils::is_valid_public_ephemeral;
use srp::{Ephemeral, Error};

use crate::contracts::{
    LoginFinishRequest, LoginFinishResponse, LoginStartRequest, LoginStartResponse,
};
use crate::credential::CredentialStore;
use crate::errors::{AuthError, Result};
use crate::tokens::TokenIssuer;

use super::PakeAuthService;

impl<C: CredentialStore, T: TokenIssuer> PakeAuthService<C, T> {
    /// Begin a login handshake: validate the client ephemeral, generate a
    /// server ephemeral against the stored verifier and open a single-use
    /// session for the Finish round trip.
    ///
    /// Unknown users receive a deterministic, well-formed challenge instead
    /// of an error; the response shape never reveals whether the user
    /// exists.
    pub fn login_start<CSPRNG: CryptoRngCore>(
        &self,
        request: &LoginStartRequest,
        rng: &mut CSPRNG,
    ) -> Result<LoginStartResponse> {
        let user_id = Self::normalize_user_id(&request.user_id);

        let client_public = BASE64_STANDARD
            .decode(&request.client_public_ephemeral_base64)
            .map(|bytes| BigUint::from_bytes_be(&bytes))
            .map_err(|_| AuthError::InvalidRequest("clientPublicEphemeralBase64"))?;
        if !is_valid_public_ephemeral(self.group, &client_public) {
            warn!(user = %Self::mask(&user_id), "login start rejected: invalid client ephemeral");
            return Err(AuthError::InvalidRequest("clientPublicEphemeralBase64"));
        }

        let (salt, verifier, kdf) = match self.credentials.lookup(&user_id) {
            Some(credential) => {
                if !credential.group.matches_deployment() {
                    warn!(user = %Self::mask(&user_id), "login start rejected: credential group differs from deployment");
                    return Err(AuthError::ParameterMismatch);
                }
                (credential.salt, credential.verifier, credential.kdf)
            }
            None => {
                info!(user = %Self::mask(&user_id), "login start for unknown user, issuing decoy challenge");
                self.decoy_credential(&user_id)
            }
        };

        let server = SrpServer::<Sha256>::new(self.group);
        let ephemeral = server.generate_ephemeral(&verifier, rng);
        let server_public_base64 = BASE64_STANDARD.encode(ephemeral.public.to_bytes_be());

        let session_id = self.sessions().insert(
            user_id.clone(),
            salt.clone(),
            verifier,
            client_public,
            ephemeral.secret,
            ephemeral.public,
            request.client_id.clone(),
            request.device_name.clone(),
            request.device_platform.clone(),
        );

        info!(user = %Self::mask(&user_id), %session_id, "login started");
        Ok(LoginStartResponse {
            kdf_parameters_json: Some(kdf.to_json()),
            salt_base64: BASE64_STANDARD.encode(&salt),
            server_public_ephemeral_base64: server_public_base64,
            session_id,
            algorithm: groups::ALGORITHM.to_owned(),
            modulus_hex: groups::MODULUS_HEX.to_owned(),
            generator: groups::GENERATOR,
        })
    }

    /// Complete a login handshake: consume the session exactly once,
    /// recompute the scramble and the session secret server-side, check the
    /// client proof in constant time and, on success, hand the user to the
    /// token issuer.
    ///
    /// Every failure (unknown, expired or replayed session, user mismatch,
    /// degenerate scramble, wrong proof) surfaces as the same opaque
    /// authentication failure.
    pub fn login_finish(&self, request: &LoginFinishRequest) -> Result<LoginFinishResponse> {
        let user_id = Self::normalize_user_id(&request.user_id);

        let Some(session) = self
            .sessions()
            .consume_if_valid(request.session_id, &user_id)
        else {
            warn!(user = %Self::mask(&user_id), "login finish rejected: unknown, expired or consumed session");
            return Err(AuthError::AuthenticationFailed);
        };

        let proof = BASE64_STANDARD
            .decode(&request.client_proof_base64)
            .map_err(|_| AuthError::AuthenticationFailed)?;

        let server = SrpServer::<Sha256>::new(self.group);
        let ephemeral = Ephemeral {
            secret: session.server_secret.clone(),
            public: session.server_public.clone(),
        };
        let verifier = server
            .process_reply(&ephemeral, &session.verifier, &session.client_public)
            .map_err(|err| {
                match err {
                    Error::DegenerateScramble => {
                        warn!(user = %Self::mask(&user_id), "login finish rejected: degenerate scramble, client must restart")
                    }
                    _ => {
                        warn!(user = %Self::mask(&user_id), "login finish rejected: handshake recomputation failed")
                    }
                }
                AuthError::AuthenticationFailed
            })?;

        if verifier.verify_client(&proof).is_err() {
            warn!(user = %Self::mask(&user_id), "login finish rejected: proof mismatch");
            return Err(AuthError::AuthenticationFailed);
        }

        let tokens = self.tokens.issue(&session.user_id);
        let has_vault = self.credentials.has_vault(&session.user_id);
        info!(user = %Self::mask(&user_id), "login succeeded");

        Ok(LoginFinishResponse {
            success: true,
            has_vault,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            server_proof_base64: BASE64_STANDARD.encode(verifier.proof()),
        })
    }
}
