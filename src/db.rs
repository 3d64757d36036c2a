use crate::config::DbConfig;
use crate::error::Result;
use crate::models::{Record, Value};
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Database handle
///
/// Table and column names are formatted straight into the SQL text; only
/// values are bound as parameters. Callers must pass trusted identifiers.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open database connection, creating the file if it does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        info!(path = %path.display(), "opened database");
        Ok(Database { conn, path })
    }

    pub fn from_config(config: &DbConfig) -> Result<Self> {
        Self::open(&config.path)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ==================== Raw SQL ====================

    /// Run a single statement without parameters, returning the affected row count
    pub fn execute(&self, sql: &str) -> Result<usize> {
        debug!(%sql, "execute");
        Ok(self.conn.execute(sql, [])?)
    }

    /// Run several `;`-separated statements without parameters
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        debug!(%sql, "execute batch");
        Ok(self.conn.execute_batch(sql)?)
    }

    /// Run a statement and collect every row
    pub fn fetch(&self, sql: &str) -> Result<Vec<Record>> {
        debug!(%sql, "fetch");
        let mut stmt = self.conn.prepare(sql)?;
        let columns = column_names(&stmt);

        let rows = stmt.query_map([], |row| record_from_row(row, &columns))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    // ==================== CRUD ====================

    /// Insert `data` into `table` and return the new row id
    pub fn create(&self, table: &str, data: &Record) -> Result<i64> {
        let columns = data.columns().collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; data.len()].join(", ");
        let sql = format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})");
        debug!(%sql, "create");

        let mut stmt = self.conn.prepare(&sql)?;
        stmt.execute(params_from_iter(data.values()))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn read(&self, table: &str, id: i64) -> Result<Option<Record>> {
        let sql = format!("SELECT * FROM {table} WHERE id = ?1");
        debug!(%sql, id, "read");

        let mut stmt = self.conn.prepare(&sql)?;
        let columns = column_names(&stmt);
        stmt.query_row([id], |row| record_from_row(row, &columns))
            .optional()
            .map_err(|e| e.into())
    }

    /// Set the columns in `data` on row `id`; true when a row matched
    pub fn update(&self, table: &str, id: i64, data: &Record) -> Result<bool> {
        let assignments = data
            .columns()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {table} SET {assignments} WHERE id = ?");
        debug!(%sql, id, "update");

        let id = Value::Integer(id);
        let mut stmt = self.conn.prepare(&sql)?;
        let changed = stmt.execute(params_from_iter(data.values().chain(std::iter::once(&id))))?;
        Ok(changed > 0)
    }

    /// Delete row `id`. The flag reports that the statement ran, not that a
    /// row was removed.
    pub fn delete(&self, table: &str, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {table} WHERE id = ?1");
        debug!(%sql, id, "delete");

        self.conn.execute(&sql, [id])?;
        Ok(true)
    }

    pub fn count(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) AS count FROM {table}");
        debug!(%sql, "count");

        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }
}

// ==================== Row Parsers ====================

fn column_names(stmt: &rusqlite::Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn record_from_row(row: &Row, columns: &[String]) -> std::result::Result<Record, rusqlite::Error> {
    let mut record = Record::new();
    for (idx, name) in columns.iter().enumerate() {
        record.insert(name.as_str(), Value::from(row.get_ref(idx)?));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteError;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE page (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT
            );
            CREATE TABLE tag (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL
            );",
        )
        .unwrap();
        db
    }

    fn page(title: &str, content: &str) -> Record {
        Record::new().with("title", title).with("content", content)
    }

    #[test]
    fn test_create_then_read() {
        let db = test_db();
        let data = page("Test Page", "Test Content");

        let id = db.create("page", &data).unwrap();
        assert!(id > 0);

        let record = db.read("page", id).unwrap().unwrap();
        assert_eq!(record.get("id"), Some(&Value::Integer(id)));
        for (column, value) in &data {
            assert_eq!(record.get(column), Some(value));
        }
    }

    #[test]
    fn test_read_returns_columns_in_table_order() {
        let db = test_db();
        let id = db.create("page", &page("A", "B")).unwrap();

        let record = db.read("page", id).unwrap().unwrap();
        let columns: Vec<&str> = record.columns().collect();
        assert_eq!(columns, vec!["id", "title", "content"]);
    }

    #[test]
    fn test_read_missing_is_none() {
        let db = test_db();
        assert!(db.read("page", 999).unwrap().is_none());
    }

    #[test]
    fn test_create_binds_null() {
        let db = test_db();
        let data = Record::new()
            .with("title", "No body")
            .with("content", None::<String>);
        let id = db.create("page", &data).unwrap();

        let record = db.read("page", id).unwrap().unwrap();
        assert!(record.get("content").unwrap().is_null());
    }

    #[test]
    fn test_update_changes_only_given_columns() {
        let db = test_db();
        let id = db.create("page", &page("Update Test", "Original Content")).unwrap();

        let changed = db
            .update("page", id, &Record::new().with("title", "Updated Title"))
            .unwrap();
        assert!(changed);

        let record = db.read("page", id).unwrap().unwrap();
        assert_eq!(record.get("title").and_then(Value::as_str), Some("Updated Title"));
        assert_eq!(
            record.get("content").and_then(Value::as_str),
            Some("Original Content")
        );
    }

    #[test]
    fn test_update_missing_row_reports_no_match() {
        let db = test_db();
        let changed = db.update("page", 42, &page("x", "y")).unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_update_empty_record_is_query_error() {
        let db = test_db();
        let id = db.create("page", &page("A", "B")).unwrap();
        let result = db.update("page", id, &Record::new());
        assert!(matches!(result, Err(SiteError::Query(_))));
    }

    #[test]
    fn test_delete_then_read_is_none() {
        let db = test_db();
        let id = db.create("page", &page("Delete Test", "Content to delete")).unwrap();

        assert!(db.delete("page", id).unwrap());
        assert!(db.read("page", id).unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_row_still_succeeds() {
        let db = test_db();
        assert!(db.delete("page", 12345).unwrap());
    }

    #[test]
    fn test_count_tracks_inserts() {
        let db = test_db();
        let before = db.count("page").unwrap();
        for i in 0..5 {
            db.create("page", &page(&format!("Page {i}"), "body")).unwrap();
        }
        assert_eq!(db.count("page").unwrap(), before + 5);
    }

    #[test]
    fn test_fetch_respects_limit() {
        let db = test_db();
        for i in 0..5 {
            db.create("page", &page(&format!("Page {i}"), "body")).unwrap();
        }

        let rows = db.fetch("SELECT * FROM page LIMIT 3").unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.len(), 3);
            assert!(row.get("id").and_then(Value::as_i64).is_some());
        }
    }

    #[test]
    fn test_fetch_empty_table() {
        let db = test_db();
        assert!(db.fetch("SELECT * FROM page").unwrap().is_empty());
    }

    #[test]
    fn test_execute_returns_affected_rows() {
        let db = test_db();
        db.create("page", &page("A", "x")).unwrap();
        db.create("page", &page("B", "x")).unwrap();

        let affected = db
            .execute("UPDATE page SET content = 'Updated via Execute'")
            .unwrap();
        assert_eq!(affected, 2);
    }

    #[test]
    fn test_malformed_sql_is_query_error() {
        let db = test_db();
        assert!(matches!(db.execute("UPDATE nope SET"), Err(SiteError::Query(_))));
        assert!(matches!(db.fetch("SELEKT 1"), Err(SiteError::Query(_))));
    }

    #[test]
    fn test_invalid_identifiers_are_query_errors() {
        let db = test_db();
        assert!(matches!(db.count("missing"), Err(SiteError::Query(_))));
        assert!(matches!(db.read("missing", 1), Err(SiteError::Query(_))));
        assert!(matches!(
            db.create("page", &Record::new().with("nope", "x")),
            Err(SiteError::Query(_))
        ));
    }

    #[test]
    fn test_constraint_violation_is_query_error() {
        let db = test_db();
        let tag = Record::new().with("name", "rust");
        db.create("tag", &tag).unwrap();
        assert!(matches!(db.create("tag", &tag), Err(SiteError::Query(_))));
    }

    #[test]
    fn test_table_name_is_interpolated() {
        // Identifiers are not bound, so a quoted name reaches SQLite verbatim.
        let db = test_db();
        db.execute("CREATE TABLE \"odd table\" (id INTEGER PRIMARY KEY, v TEXT)")
            .unwrap();
        let id = db
            .create("\"odd table\"", &Record::new().with("v", "ok"))
            .unwrap();
        assert_eq!(db.count("\"odd table\"").unwrap(), 1);
        assert!(db.read("\"odd table\"", id).unwrap().is_some());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.db");

        {
            let db = Database::open(&path).unwrap();
            db.execute("CREATE TABLE page (id INTEGER PRIMARY KEY, title TEXT)")
                .unwrap();
            db.create("page", &Record::new().with("title", "kept")).unwrap();
            assert_eq!(db.path(), path.as_path());
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.count("page").unwrap(), 1);
    }
}
