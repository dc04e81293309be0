use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use sha2::Sha256;

use srp::client::SrpClient;
use srp::groups::G_2048;
use srp::server::SrpServer;
use srp::utils::is_valid_public_ephemeral;
use srp::Error;

#[test]
fn public_ephemeral_boundaries() {
    let n = &G_2048.n;
    assert!(!is_valid_public_ephemeral(&G_2048, &BigUint::zero()));
    assert!(is_valid_public_ephemeral(&G_2048, &BigUint::from(1u32)));
    assert!(is_valid_public_ephemeral(&G_2048, &(n - 1u32)));
    assert!(!is_valid_public_ephemeral(&G_2048, n));
    assert!(!is_valid_public_ephemeral(&G_2048, &(n + 1u32)));
}

#[test]
#[should_panic]
fn bad_a_pub() {
    let mut rng = OsRng;
    let server = SrpServer::<Sha256>::new(&G_2048);
    let verifier = BigUint::from(12345u32);
    let ephemeral = server.generate_ephemeral(&verifier, &mut rng);
    server
        .process_reply(&ephemeral, &verifier, &BigUint::zero())
        .unwrap();
}

#[test]
#[should_panic]
fn bad_b_pub() {
    let mut rng = OsRng;
    let client = SrpClient::<Sha256>::new(&G_2048);
    let ephemeral = client.generate_ephemeral(&mut rng);
    client
        .process_reply(&ephemeral, &BigUint::from(12345u32), &BigUint::zero())
        .unwrap();
}

#[test]
fn modulus_valued_publics_are_illegal_parameters() {
    let mut rng = OsRng;
    let server = SrpServer::<Sha256>::new(&G_2048);
    let client = SrpClient::<Sha256>::new(&G_2048);
    let verifier = BigUint::from(12345u32);

    let server_eph = server.generate_ephemeral(&verifier, &mut rng);
    assert_eq!(
        server
            .process_reply(&server_eph, &verifier, &G_2048.n)
            .err(),
        Some(Error::IllegalParameter { name: "a_pub" })
    );

    let client_eph = client.generate_ephemeral(&mut rng);
    assert_eq!(
        client
            .process_reply(&client_eph, &verifier, &G_2048.n)
            .err(),
        Some(Error::IllegalParameter { name: "b_pub" })
    );
}
