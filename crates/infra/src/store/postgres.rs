//! Postgres-backed demo request store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `DuplicateEmail` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolTimedOut / PoolClosed / Io / Tls | N/A | `Unavailable` |
//!
//! ## Schema
//!
//! The `demo_requests` table is created on first use (`CREATE ... IF NOT EXISTS`).
//! Under `EmailPolicy::Unique` a unique index on `email` is created as well, which is
//! what makes the duplicate check atomic with the insert.
//!
//! Switching an existing database to `Unique` fails while the table still holds duplicate
//! emails: the index can't be built, so every operation reports `Unavailable` until the
//! duplicates are removed. The cause is logged once. Switching back to `AllowDuplicates`
//! does not drop an index that already exists.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tokio::sync::OnceCell;
use tracing::{instrument, Span};
use uuid::Uuid;

use teethtracks_core::{DemoRequest, DemoRequestId, EmailPolicy, NewDemoRequest};

use super::{DemoRequestStore, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS demo_requests (
    id            UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    practice_name TEXT NOT NULL,
    email         TEXT NOT NULL,
    phone_number  TEXT NOT NULL,
    message       TEXT NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_EMAIL_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS demo_requests_email_key ON demo_requests (email)";

/// Postgres-backed demo request store.
///
/// Uses a lazily connected SQLx pool: construction never touches the network, so the
/// process can start while the database is down. Connection failures surface per call
/// as `StoreError::Unavailable`.
#[derive(Debug)]
pub struct PostgresDemoRequestStore {
    pool: PgPool,
    email_policy: EmailPolicy,
    schema_ready: OnceCell<()>,
    index_conflict_logged: AtomicBool,
}

impl PostgresDemoRequestStore {
    pub fn new(pool: PgPool, email_policy: EmailPolicy) -> Self {
        Self {
            pool,
            email_policy,
            schema_ready: OnceCell::new(),
            index_conflict_logged: AtomicBool::new(false),
        }
    }

    /// Build a store over a pool that connects on first use.
    ///
    /// Fails only if the connection string itself can't be parsed.
    pub fn connect_lazy(database_url: &str, email_policy: EmailPolicy) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(database_url)
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool, email_policy))
    }

    /// Create the table (and the email index under `Unique`) once per process.
    ///
    /// A failed attempt is not cached; the next operation tries again.
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema_ready
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error("create_table", e))?;

                if self.email_policy.is_unique() {
                    sqlx::query(CREATE_EMAIL_INDEX)
                        .execute(&self.pool)
                        .await
                        .map_err(|e| self.email_index_error(e))?;
                }

                tracing::info!(
                    unique_email = self.email_policy.is_unique(),
                    "demo_requests schema ready"
                );
                Ok::<(), StoreError>(())
            })
            .await
            .map(|_| ())
    }

    fn email_index_error(&self, err: sqlx::Error) -> StoreError {
        let err = map_email_index_error(err);
        if let StoreError::Unavailable(msg) = &err {
            if msg.starts_with(EMAIL_INDEX_CONFLICT)
                && !self.index_conflict_logged.swap(true, Ordering::Relaxed)
            {
                tracing::error!(
                    "demo_requests already contains duplicate emails; remove them or use EMAIL_POLICY=allow-duplicates"
                );
            }
        }
        err
    }
}

#[async_trait]
impl DemoRequestStore for PostgresDemoRequestStore {
    #[instrument(skip(self, new), fields(operation = "insert_demo_request"), err)]
    async fn insert(&self, new: NewDemoRequest) -> Result<DemoRequest, StoreError> {
        self.ensure_schema().await?;

        let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO demo_requests (practice_name, email, phone_number, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(&new.practice_name)
        .bind(&new.email)
        .bind(&new.phone_number)
        .bind(&new.message)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_demo_request", e))?;

        // Postgres keeps microseconds; return what was actually stored.
        let mut stored = new.into_stored(DemoRequestId::from_uuid(id));
        stored.created_at = created_at;
        Ok(stored)
    }

    #[instrument(skip(self), fields(operation = "list_demo_requests", record_count = tracing::field::Empty), err)]
    async fn list_recent_first(&self) -> Result<Vec<DemoRequest>, StoreError> {
        self.ensure_schema().await?;

        let rows: Vec<DemoRequestRow> = sqlx::query_as(
            r#"
            SELECT id, practice_name, email, phone_number, message, created_at
            FROM demo_requests
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_demo_requests", e))?;

        Span::current().record("record_count", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.ensure_schema().await?;

        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM demo_requests")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_demo_requests", e))?;
        Ok(n.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }
}

#[derive(Debug)]
struct DemoRequestRow {
    id: Uuid,
    practice_name: String,
    email: String,
    phone_number: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for DemoRequestRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(DemoRequestRow {
            id: row.try_get("id")?,
            practice_name: row.try_get("practice_name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<DemoRequestRow> for DemoRequest {
    fn from(row: DemoRequestRow) -> Self {
        DemoRequest {
            id: DemoRequestId::from_uuid(row.id),
            practice_name: row.practice_name,
            email: row.email,
            phone_number: row.phone_number,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

const EMAIL_INDEX_CONFLICT: &str = "cannot enforce unique emails";

/// A unique violation while *building* the email index means existing rows conflict,
/// not that the caller submitted a duplicate.
fn email_index_conflict(code: Option<&str>) -> Option<StoreError> {
    (code == Some("23505")).then(|| {
        StoreError::Unavailable(format!(
            "{}: existing demo requests share an email address",
            EMAIL_INDEX_CONFLICT
        ))
    })
}

fn map_email_index_error(err: sqlx::Error) -> StoreError {
    let code = match &err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    };
    email_index_conflict(code.as_deref())
        .unwrap_or_else(|| map_sqlx_error("create_email_index", err))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if code.as_ref() == "23505" => StoreError::DuplicateEmail(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => StoreError::Unavailable(format!(
            "timed out waiting for a database connection in {}",
            operation
        )),
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}
