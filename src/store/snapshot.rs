//! Store snapshots
//!
//! Persists the whole contents of a `MemoryStore` to a single file.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header (22 bytes)                                           │
//! │   Magic: "CKVS" (4) | Version: u16 (2) | Count: u64 (8)     │
//! │   BodyLen: u64 (8)                                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Body (BodyLen bytes)                                        │
//! │   bincode Vec<Entry { key, value }>, sorted by key          │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Footer (4 bytes)                                            │
//! │   BodyCRC: u32                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SyncStrategy;
use crate::error::{Error, Result};

/// Magic bytes identifying a snapshot file
pub(crate) const MAGIC: &[u8; 4] = b"CKVS";

/// Current snapshot format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + Count (8) + BodyLen (8) = 22 bytes
pub(crate) const HEADER_SIZE: usize = 22;

/// Footer size: BodyCRC (4)
pub(crate) const FOOTER_SIZE: usize = 4;

/// Per-entry allowance on top of the key and value bytes (bincode length words)
const ENTRY_OVERHEAD: u64 = 16;

/// Body record, borrowed on the write side
#[derive(Serialize)]
struct EntryRef<'e> {
    key: &'e [u8],
    value: &'e [u8],
}

/// Body record, owned on the read side
#[derive(Deserialize)]
struct Entry {
    key: Vec<u8>,
    value: Vec<u8>,
}

/// Write every entry to `path`, replacing any previous file
pub fn write_snapshot(
    path: &Path,
    entries: &BTreeMap<Vec<u8>, Vec<u8>>,
    sync: SyncStrategy,
) -> Result<()> {
    let records: Vec<EntryRef<'_>> = entries
        .iter()
        .map(|(key, value)| EntryRef { key, value })
        .collect();
    let body = bincode::serialize(&records)?;
    let crc = crc32fast::hash(&body);

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&(entries.len() as u64).to_le_bytes())?;
    writer.write_all(&(body.len() as u64).to_le_bytes())?;
    writer.write_all(&body)?;
    writer.write_all(&crc.to_le_bytes())?;
    writer.flush()?;

    if sync == SyncStrategy::Always {
        let file = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        file.sync_all()?;
    }

    tracing::debug!(
        path = %path.display(),
        entries = entries.len(),
        body_bytes = body.len(),
        "snapshot written"
    );
    Ok(())
}

/// Load and validate a snapshot written by [`write_snapshot`]
///
/// `max_value_size` bounds every value and, through it, the body length the
/// header may claim.
pub fn read_snapshot(path: &Path, max_value_size: usize) -> Result<BTreeMap<Vec<u8>, Vec<u8>>> {
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();

    if file_size < (HEADER_SIZE + FOOTER_SIZE) as u64 {
        return Err(Error::SnapshotCorruption(format!(
            "file is {} bytes, shorter than header and footer",
            file_size
        )));
    }

    // Read and validate header
    let mut header = [0u8; HEADER_SIZE];
    file.read_exact(&mut header)?;

    if &header[0..4] != MAGIC {
        return Err(Error::SnapshotCorruption(format!(
            "invalid magic: expected CKVS, got {:?}",
            &header[0..4]
        )));
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != VERSION {
        return Err(Error::SnapshotCorruption(format!(
            "unsupported version: {}",
            version
        )));
    }

    let count = read_u64(&header[6..14]);
    let body_len = read_u64(&header[14..22]);

    let max_body = count
        .saturating_mul(2 * max_value_size as u64 + ENTRY_OVERHEAD)
        .saturating_add(8);
    if body_len > max_body {
        return Err(Error::SnapshotCorruption(format!(
            "body length {} exceeds bound {} for {} entries",
            body_len, max_body, count
        )));
    }

    let expected_size = (HEADER_SIZE + FOOTER_SIZE) as u64 + body_len;
    if file_size < expected_size {
        return Err(Error::SnapshotCorruption(format!(
            "file is {} bytes, header claims {}",
            file_size, expected_size
        )));
    }
    if file_size > expected_size {
        tracing::warn!(
            path = %path.display(),
            extra = file_size - expected_size,
            "ignoring trailing bytes after snapshot footer"
        );
    }

    let mut body = vec![0u8; body_len as usize];
    file.read_exact(&mut body)?;

    let mut footer = [0u8; FOOTER_SIZE];
    file.read_exact(&mut footer)?;
    let stored_crc = u32::from_le_bytes(footer);
    let actual_crc = crc32fast::hash(&body);
    if stored_crc != actual_crc {
        return Err(Error::SnapshotCorruption(format!(
            "body checksum mismatch: stored {:08x}, computed {:08x}",
            stored_crc, actual_crc
        )));
    }

    let records: Vec<Entry> = bincode::deserialize(&body)?;
    if records.len() as u64 != count {
        return Err(Error::SnapshotCorruption(format!(
            "header claims {} entries, body holds {}",
            count,
            records.len()
        )));
    }

    let mut entries = BTreeMap::new();
    for Entry { key, value } in records {
        if value.len() > max_value_size {
            return Err(Error::SnapshotCorruption(format!(
                "value of {} bytes exceeds max_value_size {}",
                value.len(),
                max_value_size
            )));
        }
        if value.is_empty() {
            tracing::warn!(key_len = key.len(), "skipping empty value in snapshot");
            continue;
        }
        if entries.insert(key, value).is_some() {
            return Err(Error::SnapshotCorruption("duplicate key".to_string()));
        }
    }

    tracing::debug!(path = %path.display(), entries = entries.len(), "snapshot loaded");
    Ok(entries)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}
