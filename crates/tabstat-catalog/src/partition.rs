use std::sync::Arc;
use tabstat_types::PartitionId;

use crate::index::MaterializedIndex;

#[derive(Debug)]
pub struct Partition {
    id: PartitionId,
    name: String,
    indices: Vec<Arc<MaterializedIndex>>,
}

impl Partition {
    pub fn new(id: PartitionId, name: impl Into<String>, indices: Vec<Arc<MaterializedIndex>>) -> Self {
        Self {
            id,
            name: name.into(),
            indices,
        }
    }

    pub fn id(&self) -> PartitionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All indices, shadow ones included.
    pub fn indices(&self) -> &[Arc<MaterializedIndex>] {
        &self.indices
    }

    pub fn visible_indices(&self) -> impl Iterator<Item = &Arc<MaterializedIndex>> {
        self.indices.iter().filter(|idx| idx.is_visible())
    }
}
