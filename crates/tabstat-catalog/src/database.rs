use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tabstat_types::{DbId, TableId};

use crate::table::Table;

#[derive(Debug)]
pub struct Database {
    id: DbId,
    name: String,
    tables: RwLock<BTreeMap<TableId, Arc<Table>>>,
}

impl Database {
    pub fn new(id: DbId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tables: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn id(&self) -> DbId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the table list, ascending by table id.
    pub fn tables(&self) -> Vec<Arc<Table>> {
        self.tables.read().values().cloned().collect()
    }

    pub fn get_table(&self, id: TableId) -> Option<Arc<Table>> {
        self.tables.read().get(&id).cloned()
    }

    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }

    /// Returns `false` if a table with the same id already exists.
    pub(crate) fn insert_table(&self, table: Arc<Table>) -> bool {
        let mut tables = self.tables.write();
        if tables.contains_key(&table.id()) {
            return false;
        }
        tables.insert(table.id(), table);
        true
    }

    pub(crate) fn remove_table(&self, id: TableId) -> Option<Arc<Table>> {
        self.tables.write().remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_listed_by_id() {
        let db = Database::new(DbId(1), "sales");
        assert!(db.insert_table(Arc::new(Table::external(TableId(30), "c", "s3"))));
        assert!(db.insert_table(Arc::new(Table::managed(TableId(10), "a", Vec::new()))));
        assert!(db.insert_table(Arc::new(Table::managed(TableId(20), "b", Vec::new()))));
        let ids: Vec<_> = db.tables().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![TableId(10), TableId(20), TableId(30)]);
    }

    #[test]
    fn test_duplicate_and_remove() {
        let db = Database::new(DbId(1), "sales");
        assert!(db.insert_table(Arc::new(Table::managed(TableId(10), "a", Vec::new()))));
        assert!(!db.insert_table(Arc::new(Table::managed(TableId(10), "dup", Vec::new()))));
        assert_eq!(db.get_table(TableId(10)).unwrap().name(), "a");
        assert!(db.remove_table(TableId(10)).is_some());
        assert_eq!(db.table_count(), 0);
    }
}
