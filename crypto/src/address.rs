//! Account address derivation from public keys.
//!
//! Address format: `gvl_` + hex(first 20 bytes of Blake2b-256(public_key)).

use crate::hash::blake2b_256;
use gavel_types::{Address, PublicKey};

/// Number of hash bytes kept in an address.
const ADDRESS_BYTES: usize = 20;

/// Derive the account address owned by `public_key`.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let digest = blake2b_256(public_key.as_bytes());
    Address::new(format!(
        "{}{}",
        Address::PREFIX,
        hex::encode(&digest[..ADDRESS_BYTES])
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;

    #[test]
    fn derived_address_has_prefix_and_length() {
        let addr = derive_address(&keypair_from_seed(&[9u8; 32]).public);
        assert!(addr.is_valid());
        assert_eq!(addr.as_str().len(), Address::PREFIX.len() + ADDRESS_BYTES * 2);
    }

    #[test]
    fn distinct_keys_distinct_addresses() {
        let a = derive_address(&keypair_from_seed(&[1u8; 32]).public);
        let b = derive_address(&keypair_from_seed(&[2u8; 32]).public);
        assert_ne!(a, b);
    }
}
