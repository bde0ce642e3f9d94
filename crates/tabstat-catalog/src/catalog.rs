use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tabstat_types::{make_error_msg, CatalogCode, DbId, Result, Status, TableId, TabletId};

use crate::database::Database;
use crate::inverted_index::{TabletInvertedIndex, TabletMeta};
use crate::partition::Partition;
use crate::table::Table;
use crate::tablet::Replica;

/// Root of the internal catalog.
#[derive(Debug, Default)]
pub struct InternalCatalog {
    dbs: RwLock<BTreeMap<DbId, Arc<Database>>>,
    inverted_index: TabletInvertedIndex,
    ready: AtomicBool,
}

impl InternalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Whether the catalog finished loading its image and may be traversed.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Ids of all databases, ascending.
    pub fn db_ids(&self) -> Vec<DbId> {
        self.dbs.read().keys().copied().collect()
    }

    pub fn get_db(&self, id: DbId) -> Option<Arc<Database>> {
        self.dbs.read().get(&id).cloned()
    }

    pub fn db_count(&self) -> usize {
        self.dbs.read().len()
    }

    pub fn inverted_index(&self) -> &TabletInvertedIndex {
        &self.inverted_index
    }

    pub fn create_database(&self, id: DbId, name: impl Into<String>) -> Result<Arc<Database>> {
        let mut dbs = self.dbs.write();
        if dbs.contains_key(&id) {
            return make_error_msg(CatalogCode::DATABASE_EXISTS, format!("database {} exists", id));
        }
        let db = Arc::new(Database::new(id, name));
        dbs.insert(id, db.clone());
        tracing::info!(db_id = *id, name = db.name(), "database created");
        Ok(db)
    }

    /// Drop a database together with all of its tables.
    pub fn drop_database(&self, id: DbId) -> Result<Arc<Database>> {
        let removed = self.dbs.write().remove(&id);
        let db = match removed {
            Some(db) => db,
            None => {
                return make_error_msg(CatalogCode::DATABASE_NOT_FOUND, format!("database {} not found", id))
            }
        };
        for table in db.tables() {
            if let Some(table) = db.remove_table(table.id()) {
                self.unregister_table(&table);
            }
        }
        tracing::info!(db_id = *id, "database dropped");
        Ok(db)
    }

    /// Add a table and register its tablets and replicas in the inverted index.
    pub fn create_table(&self, db_id: DbId, table: Table) -> Result<Arc<Table>> {
        let db = self.require_db(db_id)?;
        let table = Arc::new(table);

        if let Some(managed) = table.as_managed() {
            let guard = managed.read_lock();
            for partition in guard.partitions() {
                self.check_unregistered(partition)?;
            }
        }

        if !db.insert_table(table.clone()) {
            return make_error_msg(
                CatalogCode::TABLE_EXISTS,
                format!("table {} exists in database {}", table.id(), db_id),
            );
        }

        if let Some(managed) = table.as_managed() {
            let guard = managed.read_lock();
            for partition in guard.partitions() {
                self.register_partition(db_id, table.id(), partition);
            }
        }

        tracing::info!(db_id = *db_id, table_id = *table.id(), name = table.name(), "table created");
        Ok(table)
    }

    /// Attach a partition to a managed table and register its tablets.
    pub fn add_partition(&self, db_id: DbId, table_id: TableId, partition: Arc<Partition>) -> Result<()> {
        let table = self.require_table(db_id, table_id)?;
        let managed = table.as_managed().ok_or_else(|| {
            Status::with_message(
                CatalogCode::TABLE_NOT_MANAGED,
                format!("table {} has no partitions", table_id),
            )
        })?;

        // Registration happens under the exclusive table lock so a racing
        // drop cannot miss the new tablets.
        let added = managed.with_partitions_mut(|partitions| -> Result<()> {
            self.check_unregistered(&partition)?;
            self.register_partition(db_id, table_id, &partition);
            partitions.push(partition.clone());
            Ok(())
        });
        match added {
            Some(result) => result?,
            None => {
                return make_error_msg(CatalogCode::TABLE_DROPPED, format!("table {} was dropped", table_id))
            }
        }

        tracing::info!(
            db_id = *db_id,
            table_id = *table_id,
            partition_id = *partition.id(),
            name = partition.name(),
            "partition added"
        );
        Ok(())
    }

    /// Append a replica to a registered tablet, in the tree and in the
    /// inverted index alike.
    pub fn add_replica(&self, tablet_id: TabletId, replica: Arc<Replica>) -> Result<()> {
        let not_found = || {
            Status::with_message(
                CatalogCode::TABLET_NOT_FOUND,
                format!("tablet {} not found", tablet_id),
            )
        };
        let meta = self.inverted_index.tablet_meta(tablet_id).ok_or_else(not_found)?;
        let table = self.require_table(meta.db_id, meta.table_id)?;
        let Some(guard) = table.as_managed().and_then(|m| m.try_read_lock_if_exists()) else {
            return Err(not_found());
        };
        let tablet = guard
            .partitions()
            .iter()
            .filter(|p| p.id() == meta.partition_id)
            .flat_map(|p| p.indices().iter())
            .find(|idx| idx.id() == meta.index_id)
            .and_then(|idx| idx.tablet(tablet_id))
            .ok_or_else(not_found)?;

        tablet.add_replica(replica.clone());
        self.inverted_index.add_replica(tablet_id, replica.clone());
        tracing::info!(
            tablet_id = *tablet_id,
            replica_id = *replica.id(),
            backend_id = *replica.backend_id(),
            "replica added"
        );
        Ok(())
    }

    /// Remove a table, mark it dropped and forget its tablets.
    pub fn drop_table(&self, db_id: DbId, table_id: TableId) -> Result<Arc<Table>> {
        let db = self.require_db(db_id)?;
        let table = match db.remove_table(table_id) {
            Some(t) => t,
            None => {
                return make_error_msg(
                    CatalogCode::TABLE_NOT_FOUND,
                    format!("table {} not found in database {}", table_id, db_id),
                )
            }
        };
        self.unregister_table(&table);
        tracing::info!(db_id = *db_id, table_id = *table_id, "table dropped");
        Ok(table)
    }

    fn require_db(&self, db_id: DbId) -> Result<Arc<Database>> {
        self.get_db(db_id).ok_or_else(|| {
            Status::with_message(
                CatalogCode::DATABASE_NOT_FOUND,
                format!("database {} not found", db_id),
            )
        })
    }

    fn require_table(&self, db_id: DbId, table_id: TableId) -> Result<Arc<Table>> {
        self.require_db(db_id)?.get_table(table_id).ok_or_else(|| {
            Status::with_message(
                CatalogCode::TABLE_NOT_FOUND,
                format!("table {} not found in database {}", table_id, db_id),
            )
        })
    }

    fn check_unregistered(&self, partition: &Partition) -> Result<()> {
        for index in partition.indices() {
            for tablet in index.tablets() {
                if self.inverted_index.contains(tablet.id()) {
                    return make_error_msg(
                        CatalogCode::TABLET_EXISTS,
                        format!("tablet {} already registered", tablet.id()),
                    );
                }
            }
        }
        Ok(())
    }

    fn register_partition(&self, db_id: DbId, table_id: TableId, partition: &Partition) {
        for index in partition.indices() {
            let meta = TabletMeta {
                db_id,
                table_id,
                partition_id: partition.id(),
                index_id: index.id(),
            };
            for tablet in index.tablets() {
                self.inverted_index.add_tablet(tablet.id(), meta);
                for replica in tablet.replicas() {
                    self.inverted_index.add_replica(tablet.id(), replica);
                }
            }
        }
    }

    fn unregister_table(&self, table: &Table) {
        if let Some(managed) = table.as_managed() {
            for tablet_id in managed.mark_dropped() {
                self.inverted_index.delete_tablet(tablet_id);
            }
        }
    }
}
