//! Point-in-time export of the registry.
//!
//! A snapshot is plain data. It becomes a live registry only through
//! [`ShipmentRegistry::restore`](crate::ShipmentRegistry::restore), which checks
//! every invariant first.

mod error;

pub use self::error::{SnapshotError, SnapshotErrorExt};

use cflux_domain::{Principal, Shipment, ShipmentId};
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const TMP_SUFFIX: &str = "cfluxtmp";

/// Serializable registry state. Shipments are ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistrySnapshot {
    pub admin: Principal,
    /// The id the next created shipment receives.
    pub next_id: ShipmentId,
    pub shipments: Vec<Shipment>,
}

/// On-disk encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `postcard`, the default for any extension other than `.json`.
    Binary,
    Json,
}

impl SnapshotFormat {
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        if path.extension().and_then(OsStr::to_str).is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::Json
        } else {
            Self::Binary
        }
    }
}

impl RegistrySnapshot {
    /// Checks the id invariants of the registry.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Invalid`] when `next_id` is zero or reaches
    /// [`ShipmentId::CEILING`], when an id lies outside `[1, next_id - 1]`, or
    /// when an id appears twice.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.next_id < ShipmentId::FIRST || self.next_id >= ShipmentId::CEILING {
            return Err(invalid(format!(
                "next_id {} is outside 1..{}",
                self.next_id,
                ShipmentId::CEILING
            )));
        }

        let mut seen = FxHashSet::default();
        for shipment in &self.shipments {
            let id = shipment.id;
            if id < ShipmentId::FIRST || id >= self.next_id {
                return Err(invalid(format!(
                    "shipment id {id} is outside the issued range 1..{}",
                    self.next_id
                )));
            }
            if !seen.insert(id) {
                return Err(invalid(format!("shipment id {id} appears more than once")));
            }
        }

        Ok(())
    }

    /// # Errors
    /// Returns [`SnapshotError::Postcard`] if serialization fails.
    pub fn encode_bin(&self) -> Result<Vec<u8>, SnapshotError> {
        postcard::to_stdvec(self).context("Failed to encode snapshot")
    }

    /// # Errors
    /// Returns [`SnapshotError::Postcard`] for truncated or malformed input.
    pub fn decode_bin(bytes: &[u8]) -> Result<Self, SnapshotError> {
        postcard::from_bytes(bytes).context("Failed to decode snapshot")
    }

    /// # Errors
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).context("Failed to encode snapshot")
    }

    /// # Errors
    /// Returns [`SnapshotError::Json`] for malformed input, unknown fields or
    /// unknown status codes.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).context("Failed to decode snapshot")
    }

    /// Writes the snapshot to `path` atomically.
    ///
    /// The data goes to a sibling temporary file which is synced and then renamed
    /// over the target, so readers never observe a partially written snapshot.
    /// Parent directories are created as needed.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Io`] on filesystem failures and an encoding error
    /// if the snapshot cannot be serialized.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let data = match SnapshotFormat::for_path(path) {
            SnapshotFormat::Binary => self.encode_bin()?,
            SnapshotFormat::Json => self.to_json()?.into_bytes(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create snapshot directory {}", parent.display()))?;
        }

        let temp = tmp_path(path);
        {
            let mut file = fs::File::create(&temp)
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&data).context("Write failed")?;
            file.sync_all().context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(SnapshotError::Io {
                source: err,
                context: Some(
                    format!("Atomic swap failed: {} -> {}", temp.display(), path.display()).into(),
                ),
            });
        }

        debug!(path = %path.display(), shipments = self.shipments.len(), "Snapshot saved");
        Ok(())
    }

    /// Reads a snapshot written by [`RegistrySnapshot::save`].
    ///
    /// The result is decoded only; invariants are checked on restore.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Io`] if the file cannot be read and an encoding
    /// error if its content is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let bytes = fs::read(path).context(format!("Read failed: {}", path.display()))?;

        let snapshot = match SnapshotFormat::for_path(path) {
            SnapshotFormat::Binary => Self::decode_bin(&bytes)?,
            SnapshotFormat::Json => {
                let text = std::str::from_utf8(&bytes).map_err(|e| SnapshotError::Invalid {
                    message: e.to_string().into(),
                    context: Some(format!("Snapshot is not UTF-8: {}", path.display()).into()),
                })?;
                Self::from_json(text)?
            },
        };

        debug!(path = %path.display(), shipments = snapshot.shipments.len(), "Snapshot loaded");
        Ok(snapshot)
    }
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> SnapshotError {
    SnapshotError::Invalid { message: message.into(), context: None }
}

fn tmp_path(target: &Path) -> PathBuf {
    let file_name = target.file_name().and_then(OsStr::to_str).unwrap_or("snapshot");
    target.with_file_name(format!("{file_name}.{TMP_SUFFIX}.{}", std::process::id()))
}
