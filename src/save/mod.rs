//! Numbered-slot snapshot persistence with a checksummed binary format.
//!
//! Wire layout per slot file:
//! magic (8 bytes) | version (4) | data length (4) | bincode payload |
//! sha256 checksum (32, over everything before it). Older payload
//! versions are migrated forward on load.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::battle::types::CombatantSpec;
use crate::gacha::types::Holdings;

/// Fixed file magic identifying a slot file.
const SNAPSHOT_MAGIC: u64 = 0x534B_4952_4D53_4856; // "SKIRMSHV"

/// Current snapshot payload version.
const SNAPSHOT_VERSION: u32 = 2;

/// Number of addressable save slots.
pub const SLOT_COUNT: u8 = 10;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("slot {0} is out of range (0..{SLOT_COUNT})")]
    SlotOutOfRange(u8),
    #[error("not a snapshot file: bad magic")]
    BadMagic,
    #[error("unknown snapshot version {0}")]
    UnknownVersion(u32),
    #[error("checksum mismatch: file is corrupt or tampered")]
    ChecksumMismatch,
    #[error("payload is corrupt: {0}")]
    Corrupt(String),
}

/// Everything a save slot captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub saved_at: i64,
    pub holdings: Holdings,
    pub roster: Vec<CombatantSpec>,
}

impl Snapshot {
    pub fn new(holdings: Holdings, roster: Vec<CombatantSpec>) -> Self {
        Self {
            saved_at: Utc::now().timestamp(),
            holdings,
            roster,
        }
    }
}

/// Version-1 payload: holdings only, no roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotV1 {
    saved_at: i64,
    holdings: Holdings,
}

impl From<SnapshotV1> for Snapshot {
    fn from(old: SnapshotV1) -> Self {
        Snapshot {
            saved_at: old.saved_at,
            holdings: old.holdings,
            roster: Vec::new(),
        }
    }
}

/// One line of the slot list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSummary {
    pub slot: u8,
    pub saved_at: i64,
    pub roster_size: usize,
    pub characters_owned: usize,
}

/// Numbered-slot snapshot store.
pub struct SlotStore {
    dir: PathBuf,
}

impl SlotStore {
    /// Store rooted at the platform config directory.
    pub fn new() -> Result<Self, SaveError> {
        let project_dirs = ProjectDirs::from("", "", "skirmish").ok_or_else(|| {
            SaveError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine config directory",
            ))
        })?;
        Self::with_dir(project_dirs.config_dir().to_path_buf())
    }

    /// Store rooted at an explicit directory (created if missing).
    pub fn with_dir(dir: PathBuf) -> Result<Self, SaveError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: u8) -> Result<PathBuf, SaveError> {
        if slot >= SLOT_COUNT {
            return Err(SaveError::SlotOutOfRange(slot));
        }
        Ok(self.dir.join(format!("slot_{slot}.sav")))
    }

    /// Write a snapshot into a slot, replacing any previous content.
    pub fn save(&self, slot: u8, snapshot: &Snapshot) -> Result<(), SaveError> {
        let path = self.slot_path(slot)?;
        let data = bincode::serialize(snapshot).map_err(|e| SaveError::Corrupt(e.to_string()))?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SNAPSHOT_MAGIC.to_le_bytes());
        hasher.update(SNAPSHOT_VERSION.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let mut file = fs::File::create(path)?;
        file.write_all(&SNAPSHOT_MAGIC.to_le_bytes())?;
        file.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;
        Ok(())
    }

    /// Load a slot, migrating older payload versions forward. `None` if
    /// the slot has never been written.
    pub fn load(&self, slot: u8) -> Result<Option<Snapshot>, SaveError> {
        let path = self.slot_path(slot)?;
        let mut file = match fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut magic_bytes = [0u8; 8];
        file.read_exact(&mut magic_bytes)?;
        if u64::from_le_bytes(magic_bytes) != SNAPSHOT_MAGIC {
            return Err(SaveError::BadMagic);
        }

        let mut version_bytes = [0u8; 4];
        file.read_exact(&mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(magic_bytes);
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        if hasher.finalize().as_slice() != stored_checksum {
            return Err(SaveError::ChecksumMismatch);
        }

        let snapshot = match version {
            1 => {
                let old: SnapshotV1 =
                    bincode::deserialize(&data).map_err(|e| SaveError::Corrupt(e.to_string()))?;
                old.into()
            }
            SNAPSHOT_VERSION => {
                bincode::deserialize(&data).map_err(|e| SaveError::Corrupt(e.to_string()))?
            }
            other => return Err(SaveError::UnknownVersion(other)),
        };
        Ok(Some(snapshot))
    }

    /// Summaries for every written slot, unreadable files skipped.
    pub fn list(&self) -> Vec<SlotSummary> {
        (0..SLOT_COUNT)
            .filter_map(|slot| match self.load(slot) {
                Ok(Some(snapshot)) => Some(SlotSummary {
                    slot,
                    saved_at: snapshot.saved_at,
                    roster_size: snapshot.roster.len(),
                    characters_owned: snapshot.holdings.characters.len(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Remove a slot file. Removing an empty slot is not an error.
    pub fn delete(&self, slot: u8) -> Result<(), SaveError> {
        let path = self.slot_path(slot)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::types::Gender;
    use crate::character::attributes::Attributes;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn test_store() -> SlotStore {
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("skirmish-test-{}-{id}", std::process::id()));
        SlotStore::with_dir(dir).unwrap()
    }

    fn sample_snapshot() -> Snapshot {
        let mut holdings = Holdings::new();
        holdings.characters.insert("Seren".to_string());
        holdings.skills.insert("Starfall".to_string());
        holdings.currency = 420;
        let roster = vec![CombatantSpec::new("Seren", Gender::Female, Attributes::new())];
        Snapshot::new(holdings, roster)
    }

    #[test]
    fn test_round_trip() {
        let store = test_store();
        let snapshot = sample_snapshot();
        store.save(3, &snapshot).unwrap();
        let loaded = store.load(3).unwrap().expect("slot should exist");
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_empty_slot_is_none() {
        let store = test_store();
        assert!(store.load(7).unwrap().is_none());
    }

    #[test]
    fn test_slot_out_of_range() {
        let store = test_store();
        assert!(matches!(
            store.save(SLOT_COUNT, &sample_snapshot()),
            Err(SaveError::SlotOutOfRange(_))
        ));
    }

    #[test]
    fn test_tampered_file_fails_checksum() {
        let store = test_store();
        store.save(0, &sample_snapshot()).unwrap();

        let path = store.dir.join("slot_0.sav");
        let mut bytes = fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        assert!(matches!(store.load(0), Err(SaveError::ChecksumMismatch)));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let store = test_store();
        let path = store.dir.join("slot_1.sav");
        fs::write(&path, b"definitely not a snapshot file............").unwrap();
        assert!(matches!(store.load(1), Err(SaveError::BadMagic)));
    }

    #[test]
    fn test_v1_payload_migrates_forward() {
        let store = test_store();
        let mut holdings = Holdings::new();
        holdings.characters.insert("Kael".to_string());
        let old = SnapshotV1 {
            saved_at: 1_700_000_000,
            holdings,
        };

        // Write a version-1 file by hand.
        let data = bincode::serialize(&old).unwrap();
        let data_len = data.len() as u32;
        let version: u32 = 1;
        let mut hasher = Sha256::new();
        hasher.update(SNAPSHOT_MAGIC.to_le_bytes());
        hasher.update(version.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let path = store.dir.join("slot_5.sav");
        let mut file = fs::File::create(path).unwrap();
        file.write_all(&SNAPSHOT_MAGIC.to_le_bytes()).unwrap();
        file.write_all(&version.to_le_bytes()).unwrap();
        file.write_all(&data_len.to_le_bytes()).unwrap();
        file.write_all(&data).unwrap();
        file.write_all(&checksum).unwrap();

        let migrated = store.load(5).unwrap().expect("v1 slot should load");
        assert_eq!(migrated.saved_at, 1_700_000_000);
        assert!(migrated.holdings.characters.contains("Kael"));
        assert!(migrated.roster.is_empty());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let store = test_store();
        let data = bincode::serialize(&sample_snapshot()).unwrap();
        let data_len = data.len() as u32;
        let version: u32 = 99;
        let mut hasher = Sha256::new();
        hasher.update(SNAPSHOT_MAGIC.to_le_bytes());
        hasher.update(version.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let path = store.dir.join("slot_2.sav");
        let mut file = fs::File::create(path).unwrap();
        file.write_all(&SNAPSHOT_MAGIC.to_le_bytes()).unwrap();
        file.write_all(&version.to_le_bytes()).unwrap();
        file.write_all(&data_len.to_le_bytes()).unwrap();
        file.write_all(&data).unwrap();
        file.write_all(&checksum).unwrap();

        assert!(matches!(store.load(2), Err(SaveError::UnknownVersion(99))));
    }

    #[test]
    fn test_list_and_delete() {
        let store = test_store();
        store.save(0, &sample_snapshot()).unwrap();
        store.save(4, &sample_snapshot()).unwrap();

        let summaries = store.list();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].slot, 0);
        assert_eq!(summaries[1].slot, 4);
        assert_eq!(summaries[0].roster_size, 1);
        assert_eq!(summaries[0].characters_owned, 1);

        store.delete(0).unwrap();
        assert_eq!(store.list().len(), 1);
        // Deleting again is a no-op.
        store.delete(0).unwrap();
    }
}
