mod versioned_schema;

pub use versioned_schema::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

/// Offset added to every schema version before it is written to `PRAGMA user_version`,
/// so that databases created by this server are distinguishable from foreign files.
pub const BASE_DB_VERSION: usize = 300;
