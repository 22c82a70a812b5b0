//! Signing key material.

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::outbound::fs::read_file;

const FINGERPRINT_BYTES: usize = 8;

/// Errors returned while loading a signing key.
#[derive(Debug, Error)]
pub enum SigningKeyError {
    /// The key file could not be read.
    #[error("failed to read signing key at {path}: {source}")]
    Read {
        /// Path to the key file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The key file holds no key material.
    #[error("signing key at {path} is empty")]
    Empty {
        /// Path to the key file.
        path: PathBuf,
    },
}

/// Shared HMAC secret, wiped from memory on drop.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl SigningKey {
    /// Load the key from `path`; trailing whitespace is not part of the key.
    ///
    /// # Errors
    ///
    /// Returns [`SigningKeyError`] when the file cannot be read or is
    /// empty.
    pub fn load(path: &Path) -> Result<Self, SigningKeyError> {
        let raw = Zeroizing::new(read_file(path).map_err(|source| SigningKeyError::Read {
            path: path.to_path_buf(),
            source,
        })?);
        let trimmed = raw.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(SigningKeyError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::from_bytes(trimmed))
    }

    /// Key from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes.to_vec()),
        }
    }

    /// Hex of the first bytes of the key's SHA-256 digest, safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes.as_slice());
        hex::encode(
            digest
                .iter()
                .take(FINGERPRINT_BYTES)
                .copied()
                .collect::<Vec<u8>>(),
        )
    }

    pub(super) fn expose(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_support::files::temp_file_with;

    #[rstest]
    fn trailing_newline_is_not_key_material() {
        let file = temp_file_with(b"s3cret\n").expect("temp file");
        let key = SigningKey::load(file.path()).expect("loads");
        assert_eq!(key.expose(), b"s3cret");
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b" \n\t".as_slice())]
    fn empty_key_files_are_rejected(#[case] contents: &[u8]) {
        let file = temp_file_with(contents).expect("temp file");
        let error = SigningKey::load(file.path()).expect_err("must fail");
        assert!(matches!(error, SigningKeyError::Empty { .. }));
    }

    #[rstest]
    fn fingerprint_is_short_hex_and_stable() {
        let key = SigningKey::from_bytes(b"s3cret");
        let fingerprint = key.fingerprint();
        assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fingerprint, SigningKey::from_bytes(b"s3cret").fingerprint());
        assert_ne!(fingerprint, SigningKey::from_bytes(b"other").fingerprint());
    }

    #[rstest]
    fn debug_output_hides_the_key() {
        let rendered = format!("{:?}", SigningKey::from_bytes(b"s3cret"));
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("fingerprint"));
    }
}
