use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::errors::{ExportError, ExportResult};

/// Persists rendered payloads as named files.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Write `content` under `filename`, returning the final path.
    async fn save(&self, filename: &str, content: &[u8]) -> ExportResult<PathBuf>;
}

/// Filesystem-backed storage.
///
/// Payloads are staged through a transient buffer file and then
/// persisted under the target name. The staging handle is released on
/// every path: `persist` consumes it on success and dropping the
/// `NamedTempFile` deletes it on failure.
pub struct LocalFileStorage {
    base_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, filename: &str, content: &[u8]) -> ExportResult<PathBuf> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| ExportError::Io(e.to_string()))?;

        let handle_id = Uuid::new_v4();
        log::debug!("staging export buffer {} for {}", handle_id, filename);

        let mut staging =
            NamedTempFile::new_in(&self.base_dir).map_err(|e| ExportError::Io(e.to_string()))?;
        staging
            .write_all(content)
            .map_err(|e| ExportError::Io(e.to_string()))?;
        staging
            .flush()
            .map_err(|e| ExportError::Io(e.to_string()))?;

        let target = self.base_dir.join(filename);
        staging
            .persist(&target)
            .map_err(|e| ExportError::Io(e.to_string()))?;

        log::debug!("released export buffer {}", handle_id);
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_round_trips_bytes() {
        let dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        let path = storage.save("report.csv", b"a,b\n1,2\n").await.unwrap();
        assert_eq!(path, dir.path().join("report.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n1,2\n");

        // The staging buffer is gone once persisted.
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        storage.save("report.csv", b"old").await.unwrap();
        let path = storage.save("report.csv", b"new").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
