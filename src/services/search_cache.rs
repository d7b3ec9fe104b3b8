use std::sync::Arc;

use crate::{
    config::CachePolicy,
    error::AppResult,
    models::{Record, Table},
    storage::KeyValueStorage,
    store::WriteHook,
};

/// Per-table snapshot used for name prefix search without re-querying the
/// store.
///
/// The first search on a table stores the rows the caller currently shows;
/// later searches filter that snapshot. Under [`CachePolicy::Snapshot`] the
/// snapshot is only dropped by [`SearchCache::invalidate`], so it can lag the
/// store. Under [`CachePolicy::InvalidateOnWrite`] writes through a store the
/// cache is hooked into drop it as well.
#[derive(Clone)]
pub struct SearchCache {
    storage: Arc<dyn KeyValueStorage>,
    policy: CachePolicy,
}

impl SearchCache {
    pub fn new(storage: Arc<dyn KeyValueStorage>, policy: CachePolicy) -> Self {
        Self { storage, policy }
    }

    pub fn key(table: Table) -> String {
        format!("search_cache:{}", table.as_str())
    }

    pub fn snapshot(&self, table: Table) -> AppResult<Option<Vec<Record>>> {
        match self.storage.get(&Self::key(table))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn has_snapshot(&self, table: Table) -> AppResult<bool> {
        Ok(self.storage.get(&Self::key(table))?.is_some())
    }

    /// Rows of the snapshot whose `name` starts with `keyword` (case-sensitive).
    /// `loaded` becomes the snapshot when none exists yet and is ignored otherwise.
    pub fn search(&self, table: Table, loaded: &[Record], keyword: &str) -> AppResult<Vec<Record>> {
        let snapshot = match self.snapshot(table)? {
            Some(rows) => rows,
            None => {
                tracing::debug!(%table, rows = loaded.len(), "storing search snapshot");
                self.storage
                    .set(&Self::key(table), &serde_json::to_string(loaded)?)?;
                loaded.to_vec()
            }
        };

        Ok(snapshot
            .into_iter()
            .filter(|row| {
                row.get("name")
                    .and_then(|name| name.as_str())
                    .is_some_and(|name| name.starts_with(keyword))
            })
            .collect())
    }

    /// The snapshot verbatim, or nothing when no search has run.
    pub fn clear_search(&self, table: Table) -> AppResult<Vec<Record>> {
        Ok(self.snapshot(table)?.unwrap_or_default())
    }

    pub fn invalidate(&self, table: Table) -> AppResult<()> {
        self.storage.remove(&Self::key(table))
    }
}

impl WriteHook for SearchCache {
    fn table_written(&self, table: Table) {
        if self.policy != CachePolicy::InvalidateOnWrite {
            return;
        }
        if let Err(err) = self.invalidate(table) {
            tracing::warn!(%table, error = %err, "search snapshot invalidation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;

    fn names(rows: &[Record]) -> Vec<&str> {
        rows.iter().filter_map(|r| r["name"].as_str()).collect()
    }

    fn bolts() -> Vec<Record> {
        vec![
            json!({"id": 1, "name": "Bolt"}),
            json!({"id": 2, "name": "Bolt Extra"}),
            json!({"id": 3, "name": "Nut"}),
        ]
    }

    #[test]
    fn prefix_search_is_case_sensitive() {
        let cache = SearchCache::new(Arc::new(MemoryStorage::new()), CachePolicy::Snapshot);
        let hits = cache.search(Table::Items, &bolts(), "Bo").unwrap();
        assert_eq!(names(&hits), ["Bolt", "Bolt Extra"]);
        assert!(cache.search(Table::Items, &[], "bo").unwrap().is_empty());
    }

    #[test]
    fn first_search_snapshots_and_later_searches_ignore_loaded_rows() {
        let cache = SearchCache::new(Arc::new(MemoryStorage::new()), CachePolicy::Snapshot);
        cache.search(Table::Tags, &bolts(), "N").unwrap();

        let later = vec![json!({"id": 9, "name": "Nail"})];
        let hits = cache.search(Table::Tags, &later, "N").unwrap();
        assert_eq!(names(&hits), ["Nut"]);
    }

    #[test]
    fn clear_restores_snapshot_or_nothing() {
        let cache = SearchCache::new(Arc::new(MemoryStorage::new()), CachePolicy::Snapshot);
        assert!(cache.clear_search(Table::Tags).unwrap().is_empty());

        cache.search(Table::Tags, &bolts(), "Bo").unwrap();
        assert_eq!(cache.clear_search(Table::Tags).unwrap(), bolts());
        // Other tables keep their own slot.
        assert!(cache.clear_search(Table::Warehouses).unwrap().is_empty());
    }

    #[test]
    fn write_hook_respects_policy() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let stale = SearchCache::new(storage.clone(), CachePolicy::Snapshot);
        stale.search(Table::Tags, &bolts(), "").unwrap();
        stale.table_written(Table::Tags);
        assert!(stale.has_snapshot(Table::Tags).unwrap());

        let fresh = SearchCache::new(storage, CachePolicy::InvalidateOnWrite);
        fresh.table_written(Table::Tags);
        assert!(!fresh.has_snapshot(Table::Tags).unwrap());
    }
}
