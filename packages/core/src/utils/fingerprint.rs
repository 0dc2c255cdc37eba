//! Content fingerprints used for derived node ids and uids.

use sha2::{Digest, Sha256};

/// Number of digest bytes kept in a fingerprint (32 hex characters).
const FINGERPRINT_BYTES: usize = 16;

/// Deterministic hex fingerprint of arbitrary input.
///
/// ```
/// use contentgraph_core::utils::fingerprint;
///
/// assert_eq!(fingerprint("Post42"), fingerprint("Post42"));
/// assert_eq!(fingerprint("Post42").len(), 32);
/// ```
pub fn fingerprint(input: impl AsRef<[u8]>) -> String {
    let digest = Sha256::digest(input.as_ref());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
