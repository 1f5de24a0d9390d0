//! SQLite-backed content store
//!
//! One row per date in `daily_content`, flat columns per section. The
//! `UNIQUE(date)` constraint plus `ON CONFLICT DO NOTHING` makes insert an
//! atomic insert-if-absent. rusqlite is blocking, so every query runs on the
//! blocking pool behind a shared connection.

pub(crate) mod migrations;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use litdaily_content::{ContentItem, DailyBundle, ReviewContent};
use litdaily_utils::StoreError;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use crate::{ContentStore, InsertOutcome, ensure_storable};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_BY_DATE: &str = "SELECT date, review_title, review_content, review_author, review_tag, \
     review_source, concept_title, concept_content, question_title, question_content \
     FROM daily_content WHERE date = ?1";

const INSERT_IF_ABSENT: &str = "INSERT INTO daily_content (date, review_title, review_content, \
     review_author, review_tag, review_source, concept_title, concept_content, question_title, \
     question_content) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
     ON CONFLICT(date) DO NOTHING";

pub(crate) fn db_err(err: rusqlite::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database file and bring its schema up to date.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// - `StoreError::Io` if the parent directory cannot be created
    /// - `StoreError::UnsupportedSchemaVersion` for a database from a newer release
    /// - `StoreError::Database` for any SQLite failure
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let started = Instant::now();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("{}: {e}", parent.display())))?;
        }

        let mut conn = Connection::open(path).map_err(db_err)?;
        bootstrap(&mut conn)?;

        info!(
            path = %path.display(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Opened content store"
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// # Errors
    ///
    /// Returns `StoreError::Database` if SQLite cannot set up the schema.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let mut conn = Connection::open_in_memory().map_err(db_err)?;
        bootstrap(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current `PRAGMA user_version` of the open database.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` on query failure.
    pub async fn schema_version(&self) -> Result<u32, StoreError> {
        self.with_conn(migrations::current_user_version).await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Database(format!("store task failed: {e}")))?
    }
}

fn bootstrap(conn: &mut Connection) -> Result<(), StoreError> {
    conn.busy_timeout(Duration::from_secs(5)).map_err(db_err)?;
    migrations::apply_migrations(conn)
}

/// Empty or whitespace-only metadata is stored as NULL.
fn nullable(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

struct RawRow {
    date: String,
    review: ReviewContent,
    concept: ContentItem,
    question: ContentItem,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    let optional = |idx: usize| -> rusqlite::Result<Option<String>> {
        Ok(row
            .get::<_, Option<String>>(idx)?
            .filter(|v| !v.trim().is_empty()))
    };

    Ok(RawRow {
        date: row.get(0)?,
        review: ReviewContent {
            title: row.get(1)?,
            content: row.get(2)?,
            author: optional(3)?,
            tag: optional(4)?,
            source: optional(5)?,
        },
        concept: ContentItem::new(row.get::<_, String>(6)?, row.get::<_, String>(7)?),
        question: ContentItem::new(row.get::<_, String>(8)?, row.get::<_, String>(9)?),
    })
}

impl RawRow {
    fn into_bundle(self) -> Result<DailyBundle, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            date: self.date.clone(),
            reason,
        };

        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| corrupt(format!("bad date: {e}")))?;

        let bundle = DailyBundle {
            date,
            review: self.review,
            concept: self.concept,
            question: self.question,
        };
        if let Some(column) = bundle.blank_field() {
            return Err(corrupt(format!("{column} is empty")));
        }
        Ok(bundle)
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyBundle>, StoreError> {
        let key = date.format(DATE_FORMAT).to_string();
        let raw = self
            .with_conn(move |conn| {
                conn.query_row(SELECT_BY_DATE, params![key], read_row)
                    .optional()
                    .map_err(db_err)
            })
            .await?;

        debug!(date = %date, found = raw.is_some(), "Store lookup");
        raw.map(RawRow::into_bundle).transpose()
    }

    async fn insert(&self, bundle: &DailyBundle) -> Result<InsertOutcome, StoreError> {
        ensure_storable(bundle)?;
        let bundle = bundle.clone();
        let date = bundle.date;

        let changed = self
            .with_conn(move |conn| {
                let review = &bundle.review;
                conn.execute(
                    INSERT_IF_ABSENT,
                    params![
                        bundle.date.format(DATE_FORMAT).to_string(),
                        review.title,
                        review.content,
                        nullable(review.author.as_deref()),
                        nullable(review.tag.as_deref()),
                        nullable(review.source.as_deref()),
                        bundle.concept.title,
                        bundle.concept.content,
                        bundle.question.title,
                        bundle.question.content,
                    ],
                )
                .map_err(db_err)
            })
            .await?;

        let outcome = if changed == 0 {
            InsertOutcome::Conflict
        } else {
            InsertOutcome::Inserted
        };
        debug!(date = %date, outcome = ?outcome, "Store insert");
        Ok(outcome)
    }
}
