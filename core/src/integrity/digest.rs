//! Streaming SHA-256 over file bytes with a fixed rolling buffer.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest as _, Sha256};

use crate::constants::DIGEST_BUF_SIZE;
use crate::integrity::types::IntegrityError;

/// Lowercase hex SHA-256 of everything `r` yields.
pub fn sha256_reader<R: Read + ?Sized>(r: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; DIGEST_BUF_SIZE];

    loop {
        let n = match r.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Lowercase hex SHA-256 of a file, never holding more than one buffer in memory.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    sha256_reader(&mut f)
}

#[inline]
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Case-insensitive digest comparison.
#[inline]
pub fn digests_match(expected: &str, actual: &str) -> bool {
    expected.eq_ignore_ascii_case(actual)
}

pub fn verify_digest(expected: &str, actual: &str) -> Result<(), IntegrityError> {
    if digests_match(expected, actual) {
        Ok(())
    } else {
        Err(IntegrityError::DigestMismatch {
            expected: expected.to_ascii_lowercase(),
            actual: actual.to_ascii_lowercase(),
        })
    }
}
