//! Waitlist Collection
//!
//! SQLite-backed `waitlist` collection. Every successful mutation publishes a
//! [`StoreChange`] on a broadcast channel; live queries listen on it and
//! re-run their query when a relevant change arrives.
//!
//! Thread-safe via a `std::sync::Mutex` around the connection (SQLite
//! connections are not `Sync`). Statements run on Tokio's blocking pool and
//! the lock is only taken there.

use crate::store::error::{StoreError, StoreResult};
use crate::store::live::{ListenerGuard, LiveQuery, Subscription};
use crate::store::types::{
    ChangeKind, EntryId, EntryStatus, NewEntry, StoreChange, WaitlistEntry,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Configuration for the waitlist store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding `waitlist.db`
    pub data_dir: PathBuf,
    /// Capacity of the change notification channel
    pub broadcast_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("stellar_forge_data"),
            broadcast_capacity: 1024,
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Path to the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("waitlist.db")
    }
}

/// Entry counts, used by health checks and the CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total: u64,
    pub pending: u64,
    pub ready: u64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entries ({} pending, {} ready)",
            self.total, self.pending, self.ready
        )
    }
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS waitlist (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        reason TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_waitlist_email ON waitlist(email);
    CREATE INDEX IF NOT EXISTS idx_waitlist_created ON waitlist(created_at, seq);
";

const SELECT_COLUMNS: &str = "SELECT id, name, email, reason, status, created_at FROM waitlist";

/// The `waitlist` collection
pub struct WaitlistStore {
    conn: Arc<Mutex<Connection>>,
    changes: broadcast::Sender<StoreChange>,
    /// Number of live subscriptions currently holding a receiver
    listeners: Arc<AtomicUsize>,
}

impl WaitlistStore {
    /// Open (or create) the on-disk collection
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let conn = Connection::open_with_flags(
            config.db_path(),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        let store = Self::with_connection(conn, config.broadcast_capacity)?;
        tracing::info!(path = ?config.db_path(), "Waitlist store opened");
        Ok(store)
    }

    /// Open a throwaway in-memory collection
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, 1024)
    }

    fn with_connection(conn: Connection, broadcast_capacity: usize) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        let (changes, _) = broadcast::channel(broadcast_capacity.max(1));

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            changes,
            listeners: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool
    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Lock(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Create an entry with status `pending` and the server's current time
    pub async fn create(&self, new: NewEntry) -> StoreResult<WaitlistEntry> {
        let new = new.normalized()?;

        let now_ms = Utc::now().timestamp_millis();
        let entry = WaitlistEntry {
            id: EntryId::generate(),
            name: new.name,
            email: new.email,
            reason: new.reason,
            status: EntryStatus::Pending,
            created_at: timestamp_from_millis(now_ms)?,
        };

        let row = entry.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO waitlist (id, name, email, reason, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.id.as_str(),
                    row.name,
                    row.email,
                    row.reason,
                    row.status.as_str(),
                    now_ms
                ],
            )?;
            Ok(())
        })
        .await?;

        tracing::info!(entry_id = %entry.id, "Waitlist entry created");
        self.publish(ChangeKind::Created, &entry);
        Ok(entry)
    }

    /// All entries ordered by creation time, oldest first
    pub async fn list(&self) -> StoreResult<Vec<WaitlistEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare_cached(&format!("{} ORDER BY created_at ASC, seq ASC", SELECT_COLUMNS))?;
            let rows = stmt.query_map([], RawEntry::from_row)?;

            let entries = rows
                .map(|row| row.map_err(StoreError::from).and_then(WaitlistEntry::try_from))
                .collect::<StoreResult<Vec<_>>>()?;
            Ok(entries)
        })
        .await
    }

    /// Entries whose email equals `email`, oldest first
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Vec<WaitlistEntry>> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "{} WHERE email = ?1 ORDER BY created_at ASC, seq ASC",
                SELECT_COLUMNS
            ))?;
            let rows = stmt.query_map(params![email], RawEntry::from_row)?;

            let entries = rows
                .map(|row| row.map_err(StoreError::from).and_then(WaitlistEntry::try_from))
                .collect::<StoreResult<Vec<_>>>()?;
            Ok(entries)
        })
        .await
    }

    /// The entry a browser caching `email` correlates with: the most recent one
    pub async fn correlated(&self, email: &str) -> StoreResult<Option<WaitlistEntry>> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            let raw = conn
                .query_row(
                    &format!(
                        "{} WHERE email = ?1 ORDER BY created_at DESC, seq DESC LIMIT 1",
                        SELECT_COLUMNS
                    ),
                    params![email],
                    RawEntry::from_row,
                )
                .optional()?;

            raw.map(WaitlistEntry::try_from).transpose()
        })
        .await
    }

    /// Fetch one entry by id
    pub async fn get(&self, id: &EntryId) -> StoreResult<WaitlistEntry> {
        let id = id.clone();
        self.with_conn(move |conn| Self::get_with(conn, &id)).await
    }

    fn get_with(conn: &Connection, id: &EntryId) -> StoreResult<WaitlistEntry> {
        conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id.as_str()],
            RawEntry::from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
        .and_then(WaitlistEntry::try_from)
    }

    /// Set the entry's status to `ready`.
    ///
    /// Idempotent: an entry that is already ready is returned unchanged and no
    /// change notification is published.
    pub async fn mark_ready(&self, id: &EntryId) -> StoreResult<WaitlistEntry> {
        let id = id.clone();
        let (entry, changed) = self
            .with_conn(move |conn| {
                let mut entry = Self::get_with(conn, &id)?;
                if entry.status == EntryStatus::Ready {
                    return Ok((entry, false));
                }

                conn.execute(
                    "UPDATE waitlist SET status = ?1 WHERE id = ?2",
                    params![EntryStatus::Ready.as_str(), id.as_str()],
                )?;
                entry.status = EntryStatus::Ready;
                Ok((entry, true))
            })
            .await?;

        if changed {
            tracing::info!(entry_id = %entry.id, "Waitlist entry marked ready");
            self.publish(ChangeKind::Updated, &entry);
        } else {
            tracing::debug!(entry_id = %entry.id, "Entry already ready");
        }

        Ok(entry)
    }

    /// Delete an entry by id
    pub async fn delete(&self, id: &EntryId) -> StoreResult<WaitlistEntry> {
        let id = id.clone();
        let entry = self
            .with_conn(move |conn| {
                let entry = Self::get_with(conn, &id)?;
                conn.execute("DELETE FROM waitlist WHERE id = ?1", params![id.as_str()])?;
                Ok(entry)
            })
            .await?;

        tracing::info!(entry_id = %entry.id, "Waitlist entry deleted");
        self.publish(ChangeKind::Deleted, &entry);
        Ok(entry)
    }

    /// Entry counts by status
    pub async fn stats(&self) -> StoreResult<StoreStats> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare_cached("SELECT status, COUNT(*) FROM waitlist GROUP BY status")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;

            let mut stats = StoreStats::default();
            for row in rows {
                let (status, count) = row?;
                let count = count.max(0) as u64;
                match status.parse::<EntryStatus>()? {
                    EntryStatus::Pending => stats.pending += count,
                    EntryStatus::Ready => stats.ready += count,
                }
                stats.total += count;
            }

            Ok(stats)
        })
        .await
    }

    /// Open a continuous query. The first `next()` yields the current result.
    pub fn watch(self: &Arc<Self>, query: LiveQuery) -> Subscription {
        Subscription::new(Arc::clone(self), query)
    }

    /// Number of subscriptions that have not been dropped yet
    pub fn active_listeners(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }

    pub(crate) fn change_receiver(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    pub(crate) fn listener_guard(&self) -> ListenerGuard {
        ListenerGuard::new(Arc::clone(&self.listeners))
    }

    fn publish(&self, kind: ChangeKind, entry: &WaitlistEntry) {
        // No receivers just means nobody is watching
        let _ = self.changes.send(StoreChange {
            kind,
            id: entry.id.clone(),
            email: entry.email.clone(),
        });
    }
}

/// Row as stored, before status and timestamp decoding
struct RawEntry {
    id: String,
    name: String,
    email: String,
    reason: String,
    status: String,
    created_at: i64,
}

impl RawEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            reason: row.get(3)?,
            status: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<RawEntry> for WaitlistEntry {
    type Error = StoreError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EntryId::from(raw.id),
            name: raw.name,
            email: raw.email,
            reason: raw.reason,
            status: raw.status.parse()?,
            created_at: timestamp_from_millis(raw.created_at)?,
        })
    }
}

fn timestamp_from_millis(ms: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Corruption(format!("timestamp out of range: {}", ms)))
}
