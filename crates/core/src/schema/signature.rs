//! Schema signatures.
//!
//! A signature is a stable digest of a column set: the names are sorted,
//! rendered as a JSON array and hashed with SHA-256. Two schemas holding the
//! same names in a different order share a signature.

use crate::error::{Error, Result};
use core::fmt;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a sorted column set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SchemaSignature(String);

impl SchemaSignature {
    /// Computes the signature of a column definition.
    ///
    /// Fails with [`Error::DefinitionMissing`] when `columns` is empty.
    pub fn compute<S: AsRef<str>>(columns: &[S]) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::DefinitionMissing);
        }

        let mut sorted: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();
        let canonical = serde_json::to_vec(&sorted)?;

        let digest = Sha256::digest(&canonical);
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest.iter().copied() {
            hex.push(char::from(HEX[usize::from(byte >> 4)]));
            hex.push(char::from(HEX[usize::from(byte & 0x0f)]));
        }
        Ok(Self(hex))
    }

    /// Returns the hex digest.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const HEX: &[u8; 16] = b"0123456789abcdef";

impl fmt::Display for SchemaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something whose definition can be signed.
pub trait Signed {
    /// The definition the signature is derived from.
    fn definition(&self) -> &[String];

    /// The signature computed for the current definition.
    fn signature(&self) -> &SchemaSignature;
}
