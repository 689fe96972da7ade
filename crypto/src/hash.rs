//! Blake2b hashing for queued actions and signed payloads.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use gavel_types::{Action, ActionHash, Timestamp};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Content hash of an action scheduled at `eta`.
///
/// Variable-length fields are length-prefixed so that no two distinct
/// `(target, value, signature, data, eta)` tuples share an encoding.
pub fn hash_action(action: &Action, eta: Timestamp) -> ActionHash {
    let target = action.target.as_str().as_bytes();
    let signature = action.signature.as_bytes();
    let target_len = (target.len() as u64).to_le_bytes();
    let signature_len = (signature.len() as u64).to_le_bytes();
    let data_len = (action.data.len() as u64).to_le_bytes();
    let value = action.value.to_le_bytes();
    let eta = eta.as_secs().to_le_bytes();
    ActionHash::new(blake2b_256_multi(&[
        &target_len,
        target,
        &value,
        &signature_len,
        signature,
        &data_len,
        &action.data,
        &eta,
    ]))
}
