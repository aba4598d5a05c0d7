//! Content hashes for witnesses.
//!
//! ```text
//! SHA-256( for each token: type || 0x1f || normalization || 0x1e )
//! ```
//!
//! Only what collation compares goes into the hash, so two witnesses with
//! the same hash diff to an all-`Keep` script.

use sha2::{Digest, Sha256};

use token::Token;

/// SHA-256 hex digest of the comparable content of `tokens`.
pub fn hash_tokens<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    let mut hasher = Sha256::new();
    for token in tokens {
        hasher.update(token.token_type.as_str().as_bytes());
        hasher.update([0x1f]);
        hasher.update(token.normalization.as_bytes());
        hasher.update([0x1e]);
    }
    hex::encode(hasher.finalize())
}
