//! MD5 helpers for `Content-MD5` headers and deposit verification.
//!
//! Deposit clients send `Content-MD5` as a lowercase hex digest of the exact
//! body bytes, and the server answers media and statement retrievals the same
//! way. Comparison is case-insensitive.

use digest::Digest;

/// Compute the hex-encoded MD5 digest of `data`.
///
/// # Examples
///
/// ```
/// use swordstack_core::checksums::compute_md5;
///
/// let digest = compute_md5(b"hello");
/// assert_eq!(digest, "5d41402abc4b2a76b9719d911017c592");
/// ```
#[must_use]
pub fn compute_md5(data: &[u8]) -> String {
    let hash = md5::Md5::digest(data);
    hex::encode(hash)
}

/// Check whether `data` hashes to the client-supplied hex digest.
///
/// Surrounding whitespace in `expected` is ignored and hex case does not matter.
#[must_use]
pub fn md5_matches(data: &[u8], expected: &str) -> bool {
    compute_md5(data).eq_ignore_ascii_case(expected.trim())
}
