//! バイナリ永続化
//!
//! Layout: `TBLO`, format version (u32 LE), payload length (u64 LE),
//! BLAKE3 digest of the payload (32 bytes), bincode payload.

use crate::ontology::NormalizedOntology;
use bincode::Options;
use std::io::{self, Read, Write};
use thiserror::Error;
use tracing::debug;

/// Leading bytes of every saved ontology.
pub const MAGIC: [u8; 4] = *b"TBLO";

/// Version of the layout written by [`NormalizedOntology::save`].
pub const FORMAT_VERSION: u32 = 2;

const SIZE_LIMIT: u64 = 1 << 30;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Not a saved ontology (bad magic bytes)")]
    BadMagic,

    #[error("Unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Saved ontology is truncated")]
    Truncated,

    #[error("Saved ontology failed its checksum")]
    ChecksumMismatch,

    #[error("Saved ontology is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to write ontology: {0}")]
    Write(#[source] bincode::Error),
}

impl PersistenceError {
    /// True for every failure that happens while reading; the caller can
    /// re-normalize from source instead.
    pub fn is_load_error(&self) -> bool {
        !matches!(self, PersistenceError::Write(_))
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(SIZE_LIMIT)
}

fn read_error(err: io::Error) -> PersistenceError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        PersistenceError::Truncated
    } else {
        PersistenceError::Corrupt(err.to_string())
    }
}

fn decode_error(err: bincode::Error) -> PersistenceError {
    match *err {
        bincode::ErrorKind::Io(err) => read_error(err),
        other => PersistenceError::Corrupt(other.to_string()),
    }
}

impl NormalizedOntology {
    /// Write the ontology behind a magic/version/checksum header.
    pub fn save<W: Write>(&self, mut writer: W) -> Result<(), PersistenceError> {
        let write = |err: io::Error| PersistenceError::Write(Box::new(bincode::ErrorKind::Io(err)));
        let payload = options().serialize(self).map_err(PersistenceError::Write)?;
        let digest = blake3::hash(&payload);

        writer.write_all(&MAGIC).map_err(write)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes()).map_err(write)?;
        writer.write_all(&(payload.len() as u64).to_le_bytes()).map_err(write)?;
        writer.write_all(digest.as_bytes()).map_err(write)?;
        writer.write_all(&payload).map_err(write)?;
        writer.flush().map_err(write)?;
        debug!(ontology = %self.ontology_iri(), bytes = payload.len(), "Ontology saved");
        Ok(())
    }

    /// Read an ontology written by [`NormalizedOntology::save`].
    ///
    /// Besides the checksum, every derived index is rebuilt from the stored
    /// clauses and facts and must match the stored one.
    pub fn load<R: Read>(mut reader: R) -> Result<Self, PersistenceError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(read_error)?;
        if magic != MAGIC {
            return Err(PersistenceError::BadMagic);
        }

        let mut version = [0u8; 4];
        reader.read_exact(&mut version).map_err(read_error)?;
        let found = u32::from_le_bytes(version);
        if found != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found,
                expected: FORMAT_VERSION,
            });
        }

        let mut length = [0u8; 8];
        reader.read_exact(&mut length).map_err(read_error)?;
        let length = u64::from_le_bytes(length);
        if length > SIZE_LIMIT {
            return Err(PersistenceError::Corrupt(format!("payload length {length} exceeds the size limit")));
        }

        let mut digest = [0u8; 32];
        reader.read_exact(&mut digest).map_err(read_error)?;

        let mut payload = Vec::new();
        reader.by_ref().take(length).read_to_end(&mut payload).map_err(read_error)?;
        if (payload.len() as u64) < length {
            return Err(PersistenceError::Truncated);
        }
        if blake3::hash(&payload).as_bytes() != &digest {
            return Err(PersistenceError::ChecksumMismatch);
        }

        let ontology: NormalizedOntology = options().deserialize(&payload).map_err(decode_error)?;
        if !ontology.derived_fields_agree() {
            return Err(PersistenceError::Corrupt(
                "derived indices disagree with the stored clauses and facts".to_string(),
            ));
        }
        debug!(ontology = %ontology.ontology_iri(), "Ontology loaded");
        Ok(ontology)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        let mut bytes = Vec::new();
        self.save(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
        Self::load(bytes)
    }
}
