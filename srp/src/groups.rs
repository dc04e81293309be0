//! The fixed deployment group.
//!
//! Every client and server must use these exact values. A peer advertising a
//! different algorithm, modulus or generator is rejected before any secret
//! material is touched; negotiating the group down is not supported.

use std::sync::LazyLock;

use num_bigint::BigUint;
use sha2::Sha256;

use crate::types::SrpGroup;

/// Algorithm identifier advertised on the wire and recorded with every
/// credential.
pub const ALGORITHM: &str = "SRP-6a-2048-SHA256";

/// Hex encoding of the group modulus `N`, exactly as carried in wire
/// descriptors. Comparisons against this constant are case-insensitive.
pub const MODULUS_HEX: &str = "AC6BDB41324A9A9BF166DE5E1389582FAF72B6651987EE07FC3192943DB56050\
                               A37329CBB4A099ED8193E0757767A13DD52312AB4B03310DCD7F48A9DA04FD50\
                               E8083969EDB767B0CF6096A4FA3B58F90F6A54B42A59D53B3A2A7C5F4F5F4E46\
                               2E9F6A4E128E71B9F0C67C8E18CBF4C3BAFE8A31C5CFFFB4E90D54BD45BF37DF\
                               365C1A65E68CFDA76D4DA708DF1FB2BC2E4A4371";

/// Group generator `g`.
pub const GENERATOR: u32 = 2;

/// Process-wide group parameters, derived once on first use and immutable
/// for the process lifetime.
pub static G_2048: LazyLock<SrpGroup> = LazyLock::new(|| {
    let n = BigUint::parse_bytes(MODULUS_HEX.as_bytes(), 16)
        .expect("modulus constant is valid hex");
    SrpGroup::new::<Sha256>(n, BigUint::from(GENERATOR))
});

#[cfg(test)]
mod tests {
    use super::{G_2048, GENERATOR, MODULUS_HEX};
    use num_bigint::BigUint;

    #[test]
    fn descriptor_constants_match_group() {
        assert_eq!(G_2048.g, BigUint::from(GENERATOR));
        let n_bytes = hex::decode(MODULUS_HEX).unwrap();
        assert_eq!(G_2048.n, BigUint::from_bytes_be(&n_bytes));
        assert_eq!(G_2048.pad_length(), n_bytes.len());
    }

    #[test]
    fn modulus_is_odd() {
        assert_eq!(&G_2048.n % 2u32, BigUint::from(1u32));
    }
}
