//! Cryptographic primitives for gavel.
//!
//! - **Blake2b-256** for content-addressing queued actions and signed messages
//! - **Ed25519** for signed delegations
//! - Address derivation with the `gvl_` prefix

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::derive_address;
pub use hash::{blake2b_256, blake2b_256_multi, hash_action};
pub use keys::{keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
