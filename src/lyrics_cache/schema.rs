//! SQLite schema definitions for the lyrics cache database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

/// One row per track that went through lyric scoring.
const LYRICS_CACHE_TABLE: Table = Table {
    name: "lyrics_cache",
    columns: &[
        sqlite_column!("track_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("lyrics", &SqlType::Text, non_null = true), // raw, truncated
        sqlite_column!("lang", &SqlType::Text, non_null = true),
        sqlite_column!("valence", &SqlType::Real, non_null = true),
        sqlite_column!("energy", &SqlType::Real, non_null = true),
        sqlite_column!(
            "updated_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_lyrics_cache_lang", "lang")],
};

pub const LYRICS_CACHE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[LYRICS_CACHE_TABLE],
    migration: None,
}];
