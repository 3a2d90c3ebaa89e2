use std::sync::RwLock;

use super::types::AccessRequest;

/// Read-only view over the live request collection.
///
/// The export engine never mutates records; it takes a point-in-time
/// snapshot at the start of each export call. Creation and mutation of
/// requests belong to the request-management layer that owns the store.
pub trait RequestStore: Send + Sync {
    /// Clone the current collection as an immutable snapshot.
    fn snapshot(&self) -> Vec<AccessRequest>;

    /// Number of records currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store backing the engine in tests and embedded deployments.
#[derive(Debug, Default)]
pub struct InMemoryRequestStore {
    records: RwLock<Vec<AccessRequest>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<AccessRequest>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replace the whole collection. Owning-layer operation; must not be
    /// called while an export is in flight.
    pub fn replace(&self, records: Vec<AccessRequest>) {
        let mut guard = self.records.write().unwrap_or_else(|e| e.into_inner());
        *guard = records;
    }

    pub fn push(&self, record: AccessRequest) {
        let mut guard = self.records.write().unwrap_or_else(|e| e.into_inner());
        guard.push(record);
    }
}

impl RequestStore for InMemoryRequestStore {
    fn snapshot(&self) -> Vec<AccessRequest> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
