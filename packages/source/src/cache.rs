//! Per-highway record cache.
//!
//! Loading a highway's file is the only expensive step of a view refresh, so
//! the presentation host keeps a [`RecordCache`] and asks it for records on
//! every selection change. Entries stay until they are invalidated
//! explicitly.

use std::collections::BTreeMap;
use std::sync::Arc;

use accident_map_accident_models::{AccidentRecord, HighwayProfile};

use crate::SourceError;

/// Loaded record sets keyed by highway identifier.
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: BTreeMap<String, Arc<[AccidentRecord]>>,
}

impl RecordCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the cached records for `highway_id`, if loaded.
    #[must_use]
    pub fn get(&self, highway_id: &str) -> Option<Arc<[AccidentRecord]>> {
        self.entries.get(highway_id).cloned()
    }

    /// Returns the cached records for `profile`, calling `load` on a miss and
    /// remembering its result.
    ///
    /// # Errors
    ///
    /// Propagates any error from `load`; nothing is cached in that case.
    pub fn get_or_load<F>(
        &mut self,
        profile: &HighwayProfile,
        load: F,
    ) -> Result<Arc<[AccidentRecord]>, SourceError>
    where
        F: FnOnce(&HighwayProfile) -> Result<Vec<AccidentRecord>, SourceError>,
    {
        if let Some(records) = self.entries.get(&profile.id) {
            log::debug!("[{}] Record cache hit", profile.id);
            return Ok(Arc::clone(records));
        }

        let records: Arc<[AccidentRecord]> = load(profile)?.into();
        log::debug!("[{}] Cached {} records", profile.id, records.len());
        self.entries.insert(profile.id.clone(), Arc::clone(&records));
        Ok(records)
    }

    /// Drops the entry for `highway_id`. Returns whether one was present.
    pub fn invalidate(&mut self, highway_id: &str) -> bool {
        self.entries.remove(highway_id).is_some()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of highways currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
