//! On-disk rule table format
//!
//! ```text
//! +-------+---------+----------+----------------+------------------+
//! | DXST  | version | reserved | blake3(payload)| bincode payload  |
//! | 4 B   | u16 LE  | u16      | 32 B           | ...              |
//! +-------+---------+----------+----------------+------------------+
//! ```
//!
//! The whole header is verified before the payload is decoded, so a
//! truncated or hand-edited file is rejected instead of half-loaded.

use super::RuleTable;
use crate::error::{Result, RuleTableError, StyleError};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const MAGIC: [u8; 4] = *b"DXST";
pub const VERSION: u16 = 1;
pub const HEADER_LEN: usize = 4 + 2 + 2 + blake3::OUT_LEN;

impl RuleTable {
    /// Serialize into the checksummed binary layout.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, RuleTableError> {
        let payload = bincode::serialize(self)?;
        let digest = blake3::hash(&payload);

        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(digest.as_bytes());
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Verify the header and checksum, then decode the payload.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, RuleTableError> {
        if bytes.len() < HEADER_LEN {
            return Err(RuleTableError::Truncated {
                len: bytes.len(),
                header: HEADER_LEN,
            });
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        if magic != MAGIC {
            return Err(RuleTableError::BadMagic { found: magic });
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(RuleTableError::UnsupportedVersion {
                found: version,
                expected: VERSION,
            });
        }

        let (header, payload) = bytes.split_at(HEADER_LEN);
        if blake3::hash(payload).as_bytes()[..] != header[8..] {
            return Err(RuleTableError::ChecksumMismatch);
        }

        Ok(bincode::deserialize(payload)?)
    }

    /// Read and verify a rule table file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| StyleError::io(path, e))?;
        let table = Self::from_bytes(&bytes).map_err(|source| StyleError::RuleTable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Loaded {} static / {} dynamic rules from {:?}",
            table.static_rules.len(),
            table.dynamic_rules.len(),
            path
        );
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes().map_err(|source| StyleError::RuleTable {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, bytes).map_err(|e| StyleError::io(path, e))
    }
}
