use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use srp::client::SrpClient;
use srp::groups::G_2048;
use srp::kdf::{derive_private_key, KdfParameters};
use srp::server::SrpServer;

fn legacy_kdf(rng: &mut OsRng) -> KdfParameters {
    let mut salt = [0u8; 16];
    rng.fill_bytes(&mut salt);
    KdfParameters::Legacy {
        salt_base64: BASE64_STANDARD.encode(salt),
    }
}

fn auth_test(kdf: &KdfParameters, true_pwd: &str, auth_pwd: &str) {
    let mut rng = OsRng;
    let user = "alice@example.com";

    // Registration: the client derives x and registers the verifier
    let client = SrpClient::<Sha256>::new(&G_2048);
    let x = derive_private_key(kdf, user, true_pwd).unwrap();
    let verifier = client.compute_verifier(&x);

    // Login: both sides generate fresh ephemerals and exchange publics
    let server = SrpServer::<Sha256>::new(&G_2048);
    let client_eph = client.generate_ephemeral(&mut rng);
    let server_eph = server.generate_ephemeral(&verifier, &mut rng);

    let x_login = derive_private_key(kdf, user, auth_pwd).unwrap();
    let client_verifier = client
        .process_reply(&client_eph, &x_login, &server_eph.public)
        .unwrap();
    let server_verifier = server
        .process_reply(&server_eph, &verifier, &client_eph.public)
        .unwrap();

    // Mutual proof: server checks M1, client checks M2
    server_verifier
        .verify_client(client_verifier.proof())
        .unwrap();
    client_verifier
        .verify_server(server_verifier.proof())
        .unwrap();

    assert_eq!(
        server_verifier.key(),
        client_verifier.key(),
        "server and client keys are not equal"
    );
}

#[test]
fn good_password() {
    let mut rng = OsRng;
    let kdf = legacy_kdf(&mut rng);
    auth_test(&kdf, "password", "password");
}

#[test]
#[should_panic]
fn bad_password() {
    let mut rng = OsRng;
    let kdf = legacy_kdf(&mut rng);
    auth_test(&kdf, "password", "paSsword");
}

#[test]
fn argon2id_password() {
    let kdf = KdfParameters::Argon2id {
        salt_base64: BASE64_STANDARD.encode([42u8; 16]),
        parallelism: 1,
        iterations: 1,
        memory_kib: 1024,
    };
    auth_test(&kdf, "correct horse battery staple", "correct horse battery staple");
}

// The core algebraic invariant: for matching inputs the client and server
// session computations agree, across many random (a, b, x) triples rather
// than a single fixed vector.
#[test]
fn session_agreement_over_random_triples() {
    let mut rng = OsRng;
    let client = SrpClient::<Sha256>::new(&G_2048);
    let server = SrpServer::<Sha256>::new(&G_2048);

    for round in 0..25 {
        let kdf = legacy_kdf(&mut rng);
        let password = format!("password-{round}");
        let x = derive_private_key(&kdf, "prop@example.com", &password).unwrap();
        let verifier = client.compute_verifier(&x);

        let client_eph = client.generate_ephemeral(&mut rng);
        let server_eph = server.generate_ephemeral(&verifier, &mut rng);

        let client_verifier = client
            .process_reply(&client_eph, &x, &server_eph.public)
            .unwrap();
        let server_verifier = server
            .process_reply(&server_eph, &verifier, &client_eph.public)
            .unwrap();

        assert_eq!(client_verifier.key(), server_verifier.key());
        assert_eq!(client_verifier.proof().len(), 32);
        server_verifier
            .verify_client(client_verifier.proof())
            .unwrap();
        client_verifier
            .verify_server(server_verifier.proof())
            .unwrap();
    }
}

// Flipping any single byte of the client proof must fail verification.
#[test]
fn tampered_proof_is_rejected() {
    let mut rng = OsRng;
    let client = SrpClient::<Sha256>::new(&G_2048);
    let server = SrpServer::<Sha256>::new(&G_2048);

    let kdf = legacy_kdf(&mut rng);
    let x = derive_private_key(&kdf, "tamper@example.com", "password").unwrap();
    let verifier = client.compute_verifier(&x);

    let client_eph = client.generate_ephemeral(&mut rng);
    let server_eph = server.generate_ephemeral(&verifier, &mut rng);

    let client_verifier = client
        .process_reply(&client_eph, &x, &server_eph.public)
        .unwrap();
    let server_verifier = server
        .process_reply(&server_eph, &verifier, &client_eph.public)
        .unwrap();

    let mut proof = client_verifier.proof().to_vec();
    for _ in 0..16 {
        let index = (rng.next_u32() as usize) % proof.len();
        let bit = 1u8 << (rng.next_u32() % 8);
        proof[index] ^= bit;
        assert!(server_verifier.verify_client(&proof).is_err());
        proof[index] ^= bit;
    }
    // untouched proof still verifies
    server_verifier.verify_client(&proof).unwrap();
}

// Flipping a byte of A before the server processes the handshake must end
// in an authentication failure one way or the other: either the value is
// rejected outright or the proofs no longer match.
#[test]
fn tampered_client_public_fails_authentication() {
    let mut rng = OsRng;
    let client = SrpClient::<Sha256>::new(&G_2048);
    let server = SrpServer::<Sha256>::new(&G_2048);

    let kdf = legacy_kdf(&mut rng);
    let x = derive_private_key(&kdf, "tamper@example.com", "password").unwrap();
    let verifier = client.compute_verifier(&x);

    for _ in 0..8 {
        let client_eph = client.generate_ephemeral(&mut rng);
        let server_eph = server.generate_ephemeral(&verifier, &mut rng);
        let client_verifier = client
            .process_reply(&client_eph, &x, &server_eph.public)
            .unwrap();

        let mut a_bytes = srp::utils::pad(&client_eph.public, G_2048.pad_length());
        let index = (rng.next_u32() as usize) % a_bytes.len();
        a_bytes[index] ^= 1u8 << (rng.next_u32() % 8);
        let tampered = num_bigint::BigUint::from_bytes_be(&a_bytes);

        match server.process_reply(&server_eph, &verifier, &tampered) {
            Err(_) => {}
            Ok(server_verifier) => {
                assert!(server_verifier
                    .verify_client(client_verifier.proof())
                    .is_err());
            }
        }
    }
}
