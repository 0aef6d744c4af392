//! SQLite database with Diesel ORM
//!
//! Stores the board: status lanes, context lists and tasks. Task order is a
//! single integer sequence across the whole board, read back with
//! `ORDER BY "order"`.

use crate::model::{ColumnKind, Context, Status, Task};
use crate::schema::*;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory holding the board database, config and log
pub const LANES_DIR: &str = ".lanes";

/// Database file name inside `LANES_DIR`
pub const DB_FILE: &str = "lanes.db";

/// Walk up directory tree to find .lanes folder (like git finds .git)
/// Can be overridden with LANES_DB_PATH env var
fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("LANES_DB_PATH") {
        return PathBuf::from(path);
    }

    if let Some(dir) = find_lanes_dir() {
        return dir.join(DB_FILE);
    }

    // No .lanes found - default to current directory
    // (lanes init will create it here)
    PathBuf::from(LANES_DIR).join(DB_FILE)
}

/// Nearest `.lanes` directory at or above the current directory
pub fn find_lanes_dir() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    let mut dir = current_dir.as_path();
    loop {
        let candidate = dir.join(LANES_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

// ============================================================================
// Diesel Models
// ============================================================================

/// Queryable status row
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = statuses)]
struct StatusRow {
    id: String,
    title: String,
}

impl From<StatusRow> for Status {
    fn from(row: StatusRow) -> Self {
        Status {
            id: row.id,
            title: row.title,
        }
    }
}

/// Insertable context
#[derive(Insertable)]
#[diesel(table_name = contexts)]
struct NewContext<'a> {
    id: &'a str,
    title: &'a str,
    color: &'a str,
}

/// Queryable context row
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = contexts)]
struct ContextRow {
    id: String,
    title: String,
    color: String,
}

impl From<ContextRow> for Context {
    fn from(row: ContextRow) -> Self {
        Context {
            id: row.id,
            title: row.title,
            color: row.color,
        }
    }
}

/// Insertable task. Tags are stored as a JSON array string.
#[derive(Insertable)]
#[diesel(table_name = tasks)]
struct NewTask<'a> {
    id: &'a str,
    title: &'a str,
    status: &'a str,
    context: &'a str,
    tags: &'a str,
    color: Option<&'a str>,
    sort_order: i32,
}

/// Queryable task row
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = tasks)]
struct TaskRow {
    id: String,
    title: String,
    status: String,
    context: String,
    tags: String,
    color: Option<String>,
    sort_order: i32,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let tags: Vec<String> = serde_json::from_str(&self.tags)?;
        Ok(Task {
            id: self.id,
            title: self.title,
            status: self.status,
            context: self.context,
            tags,
            color: self.color,
            order: self.sort_order,
        })
    }
}

/// Helper for COUNT(*) queries
#[derive(QueryableByName, Debug)]
struct RowCount {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

// ============================================================================
// Seed data
// ============================================================================

const SEED_STATUSES: &[(&str, &str)] = &[
    ("todo", "To Do"),
    ("doing", "In Progress"),
    ("done", "Done"),
];

const SEED_CONTEXTS: &[(&str, &str, &str)] = &[
    ("c1", "Urgent", "#ff5252"),
    ("c2", "Deep Work", "#448aff"),
    ("c3", "Routine", "#69f0ae"),
];

// (id, title, status, context, tag, color)
const SEED_TASKS: &[(&str, &str, &str, &str, &str, &str)] = &[
    ("t1", "Fix Login Bug", "doing", "c1", "Bug", "#fff0f0"),
    ("t2", "Write Documentation", "todo", "c2", "Docs", "#ffffff"),
    ("t3", "Weekly Review", "done", "c3", "Admin", "#f0f8ff"),
    ("t4", "Buy Groceries", "todo", "c3", "Personal", "#fffff0"),
    ("t5", "Design System Update", "todo", "c2", "Design", "#e6e6fa"),
];

// ============================================================================
// Database Connection
// ============================================================================

type DbPool = Pool<ConnectionManager<SqliteConnection>>;
type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Per-connection pragmas. Foreign keys are off by default in SQLite.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Database connection wrapper with connection pool
pub struct Database {
    pool: DbPool,
    path: PathBuf,
}

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("Pool error: {0}")]
    Pool(#[from] diesel::r2d2::Error),
    #[error("Corrupt tags column: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Everything the board renders, as last persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub statuses: Vec<Status>,
    pub contexts: Vec<Context>,
    /// Sorted by `order` ascending
    pub tasks: Vec<Task>,
}

impl Database {
    /// Get the database path that will be used
    pub fn db_path() -> PathBuf {
        get_db_path()
    }

    /// Open database at default path (respects LANES_DB_PATH env var)
    pub fn open() -> Result<Self> {
        let path = get_db_path();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Connection(format!("{}: {}", parent.display(), e)))?;
            }
        }
        Self::open_at(&path)
    }

    /// Open database at specified path, creating and seeding it on first use
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let manager = ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
        let pool = Pool::builder()
            .max_size(5)
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let db = Self { pool, path };
        db.init_schema()?;
        db.seed_if_empty()?;
        tracing::debug!(path = %db.path.display(), "database opened");
        Ok(db)
    }

    /// Path of the underlying SQLite file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_conn(&self) -> Result<DbConn> {
        self.pool.get().map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn init_schema(&self) -> Result<()> {
        let mut conn = self.get_conn()?;

        diesel::sql_query(r#"
            CREATE TABLE IF NOT EXISTS statuses (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL
            )
        "#).execute(&mut conn)?;

        diesel::sql_query(r#"
            CREATE TABLE IF NOT EXISTS contexts (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                color TEXT NOT NULL
            )
        "#).execute(&mut conn)?;

        diesel::sql_query(r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                status TEXT NOT NULL,
                context TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]',
                color TEXT,
                "order" INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (status) REFERENCES statuses(id),
                FOREIGN KEY (context) REFERENCES contexts(id)
            )
        "#).execute(&mut conn)?;

        diesel::sql_query(r#"CREATE INDEX IF NOT EXISTS idx_tasks_order ON tasks("order")"#)
            .execute(&mut conn)?;

        Ok(())
    }

    /// Write the starter board once. Keyed on statuses so that deleting every
    /// task does not re-seed.
    fn seed_if_empty(&self) -> Result<bool> {
        let mut conn = self.get_conn()?;
        let existing: Vec<RowCount> = diesel::sql_query("SELECT COUNT(*) AS count FROM statuses")
            .load(&mut conn)?;
        if existing.first().map(|r| r.count).unwrap_or(0) > 0 {
            return Ok(false);
        }

        conn.transaction::<_, StoreError, _>(|conn| {
            let statuses: Vec<StatusRow> = SEED_STATUSES
                .iter()
                .map(|(id, title)| StatusRow {
                    id: id.to_string(),
                    title: title.to_string(),
                })
                .collect();
            diesel::insert_into(statuses::table)
                .values(&statuses)
                .execute(conn)?;

            for &(id, title, color) in SEED_CONTEXTS {
                diesel::insert_into(contexts::table)
                    .values(&NewContext { id, title, color })
                    .execute(conn)?;
            }

            for (index, &(id, title, status, context, tag, color)) in SEED_TASKS.iter().enumerate() {
                let tags = serde_json::to_string(&[tag])?;
                diesel::insert_into(tasks::table)
                    .values(&NewTask {
                        id,
                        title,
                        status,
                        context,
                        tags: &tags,
                        color: Some(color),
                        sort_order: index as i32,
                    })
                    .execute(conn)?;
            }
            Ok(())
        })?;

        tracing::info!("seeded starter board");
        Ok(true)
    }

    // ========================================================================
    // Board Operations
    // ========================================================================

    /// Fetch statuses, contexts and all tasks in board order
    pub fn fetch_all(&self) -> Result<BoardSnapshot> {
        let mut conn = self.get_conn()?;

        let statuses = statuses::table
            .select(StatusRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(Status::from)
            .collect();

        let contexts = contexts::table
            .select(ContextRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(Context::from)
            .collect();

        let tasks = tasks::table
            .select(TaskRow::as_select())
            .order(tasks::sort_order.asc())
            .load(&mut conn)?
            .into_iter()
            .map(TaskRow::into_task)
            .collect::<Result<Vec<_>>>()?;

        Ok(BoardSnapshot {
            statuses,
            contexts,
            tasks,
        })
    }

    /// Look up one task by id
    pub fn get_task(&self, id: &str) -> Result<Task> {
        let mut conn = self.get_conn()?;
        let row = tasks::table
            .find(id)
            .select(TaskRow::as_select())
            .first::<TaskRow>(&mut conn)
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("Task {}", id)))?;
        row.into_task()
    }

    /// Insert a task at the end of the board (order = max + 1)
    pub fn create_task(&self, task: &Task) -> Result<Task> {
        let mut conn = self.get_conn()?;
        let tags = serde_json::to_string(&task.tags)?;

        let stored = conn.transaction::<_, StoreError, _>(|conn| {
            let max_order: Option<i32> = tasks::table
                .select(diesel::dsl::max(tasks::sort_order))
                .first(conn)?;
            let order = max_order.unwrap_or(0) + 1;

            diesel::insert_into(tasks::table)
                .values(&NewTask {
                    id: &task.id,
                    title: &task.title,
                    status: &task.status,
                    context: &task.context,
                    tags: &tags,
                    color: task.color.as_deref(),
                    sort_order: order,
                })
                .execute(conn)?;

            Ok(Task {
                order,
                ..task.clone()
            })
        })?;

        tracing::debug!(id = %stored.id, order = stored.order, "task created");
        Ok(stored)
    }

    /// Overwrite every mutable field except `order`
    pub fn update_task(&self, task: &Task) -> Result<Task> {
        let mut conn = self.get_conn()?;
        let tags = serde_json::to_string(&task.tags)?;

        let updated = diesel::update(tasks::table.find(task.id.as_str()))
            .set((
                tasks::title.eq(task.title.as_str()),
                tasks::status.eq(task.status.as_str()),
                tasks::context.eq(task.context.as_str()),
                tasks::tags.eq(tags.as_str()),
                tasks::color.eq(task.color.as_deref()),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("Task {}", task.id)));
        }
        Ok(task.clone())
    }

    /// Hard delete a task
    pub fn delete_task(&self, id: &str) -> Result<()> {
        let mut conn = self.get_conn()?;
        let deleted = diesel::delete(tasks::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("Task {}", id)));
        }
        tracing::debug!(id, "task deleted");
        Ok(())
    }

    /// Add a context list
    pub fn create_context(&self, context: &Context) -> Result<Context> {
        let mut conn = self.get_conn()?;
        diesel::insert_into(contexts::table)
            .values(&NewContext {
                id: &context.id,
                title: &context.title,
                color: &context.color,
            })
            .execute(&mut conn)?;
        Ok(context.clone())
    }

    /// Rename a status lane or a context list
    pub fn update_column_title(&self, id: &str, title: &str, kind: ColumnKind) -> Result<()> {
        let mut conn = self.get_conn()?;
        let updated = match kind {
            ColumnKind::Status => diesel::update(statuses::table.find(id))
                .set(statuses::title.eq(title))
                .execute(&mut conn)?,
            ColumnKind::Context => diesel::update(contexts::table.find(id))
                .set(contexts::title.eq(title))
                .execute(&mut conn)?,
        };
        if updated == 0 {
            return Err(StoreError::NotFound(format!("{} column {}", kind, id)));
        }
        Ok(())
    }

    /// Rewrite `order` as 0..N-1 following slice position, all or nothing.
    /// Ids that no longer exist are skipped without using up a position.
    pub fn reorder_batch(&self, ordered: &[Task]) -> Result<()> {
        let mut conn = self.get_conn()?;
        let written = conn.transaction::<_, StoreError, _>(|conn| {
            let mut next: i32 = 0;
            for task in ordered {
                let updated = diesel::update(tasks::table.find(task.id.as_str()))
                    .set(tasks::sort_order.eq(next))
                    .execute(conn)?;
                if updated > 0 {
                    next += 1;
                }
            }
            Ok(next)
        })?;
        if written as usize != ordered.len() {
            tracing::warn!(
                requested = ordered.len(),
                written,
                "reorder batch skipped missing tasks"
            );
        }
        tracing::debug!(count = written, "reorder batch written");
        Ok(())
    }
}
