//! SQLite-backed lyrics cache implementation.

use super::models::{CacheEntry, CacheStats};
use super::schema::LYRICS_CACHE_VERSIONED_SCHEMAS;
use super::trait_def::LyricsCache;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{anyhow, bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// SQLite-backed lyrics cache.
#[derive(Clone)]
pub struct SqliteLyricsCache {
    read_conn: Arc<Mutex<Connection>>,
    write_conn: Arc<Mutex<Connection>>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = LYRICS_CACHE_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &LYRICS_CACHE_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating lyrics cache schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {}, it was not created by this server",
            db_version
        );
    }
    let mut current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version > latest_version {
        bail!(
            "Lyrics cache schema version {} is newer than supported version {}",
            current_version,
            latest_version
        );
    }

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in LYRICS_CACHE_VERSIONED_SCHEMAS
            .iter()
            .skip(current_version + 1)
        {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating lyrics cache from version {} to {}",
                    current_version, schema.version
                );
                migration_fn(&tx)?;
            }
            current_version = schema.version;
        }
        tx.pragma_update(
            None,
            "user_version",
            (BASE_DB_VERSION + current_version) as i64,
        )?;
        tx.commit()?;
    }

    latest_schema
        .validate(conn)
        .context("Lyrics cache schema validation failed")
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("Lyrics cache connection mutex poisoned"))
}

impl SqliteLyricsCache {
    /// Open (creating if needed) the lyrics cache database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open lyrics cache database")?;

        migrate_if_needed(&mut write_conn)?;

        write_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on lyrics cache write connection")?;

        let read_conn = Connection::open_with_flags(
            db_path_ref,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open lyrics cache database for reading")?;

        let stats = Self::count_rows(&read_conn)?;
        info!(
            "Lyrics cache ready: {} entries across {} languages",
            stats.entries,
            stats.languages.len()
        );

        Ok(Self {
            read_conn: Arc::new(Mutex::new(read_conn)),
            write_conn: Arc::new(Mutex::new(write_conn)),
        })
    }

    fn count_rows(conn: &Connection) -> Result<CacheStats> {
        let mut stmt =
            conn.prepare_cached("SELECT lang, COUNT(*) FROM lyrics_cache GROUP BY lang")?;
        let languages = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, usize>(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
        Ok(CacheStats {
            entries: languages.values().sum(),
            languages,
        })
    }
}

impl LyricsCache for SqliteLyricsCache {
    fn get_entry(&self, track_id: &str) -> Result<Option<CacheEntry>> {
        let conn = lock(&self.read_conn)?;
        let mut stmt = conn.prepare_cached(
            "SELECT track_id, lyrics, lang, valence, energy, updated_at
             FROM lyrics_cache WHERE track_id = ?1",
        )?;
        let entry = stmt
            .query_row(params![track_id], |row| {
                Ok(CacheEntry {
                    track_id: row.get(0)?,
                    lyrics: row.get(1)?,
                    lang: row.get(2)?,
                    valence: row.get(3)?,
                    energy: row.get(4)?,
                    updated_at: row.get(5)?,
                })
            })
            .optional()?;
        Ok(entry)
    }

    fn upsert_entry(&self, entry: &CacheEntry) -> Result<()> {
        let conn = lock(&self.write_conn)?;
        conn.execute(
            "INSERT OR REPLACE INTO lyrics_cache
             (track_id, lyrics, lang, valence, energy, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.track_id,
                entry.lyrics,
                entry.lang,
                entry.valence,
                entry.energy,
                entry.updated_at,
            ],
        )
        .with_context(|| format!("Failed to upsert lyrics cache entry {}", entry.track_id))?;
        Ok(())
    }

    fn get_stats(&self) -> Result<CacheStats> {
        let conn = lock(&self.read_conn)?;
        Self::count_rows(&conn)
    }
}
