strong_type!(DbId, i64);
strong_type!(TableId, i64);
strong_type!(PartitionId, i64);
strong_type!(IndexId, i64);
strong_type!(TabletId, i64);
strong_type!(ReplicaId, i64);
strong_type!(BackendId, i64);
