//! File hashing utilities

use sha2::{Digest as _, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::Digest;
use crate::utils::config::HashingConsts;

/// SHA-256 of the file at `path`, streamed in fixed-size chunks.
///
/// Any open or read error is returned as `Err`; a zero-length file yields the digest of the empty
/// string.
pub fn digest_file(path: &Path) -> io::Result<Digest> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize().into())
}

/// Lowercase hex rendering of a digest (64 chars, zero-padded per byte).
pub fn digest_to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}
