//! Smoke checks run against a live site database.
//!
//! Each check gets its own freshly opened [`Database`]. A check that cannot
//! open the database, or returns an error, is recorded as a failure rather
//! than aborting the run.

use crate::db::Database;
use crate::error::Result;
use crate::models::{Record, Value};
use crate::page::Page;
use crate::schema::PAGE_TABLE;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

/// A single check
pub type Check = fn(&Database) -> Result<Outcome>;

/// Result of one check
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub passed: bool,
    pub message: String,
}

/// Pick the success or failure message depending on `condition`
pub fn expect(condition: bool, on_success: impl Into<String>, on_failure: impl Into<String>) -> Outcome {
    if condition {
        Outcome {
            passed: true,
            message: on_success.into(),
        }
    } else {
        Outcome {
            passed: false,
            message: on_failure.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub results: Vec<CheckResult>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.outcome.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.passed(), self.total())
    }
}

#[derive(Default)]
pub struct Suite {
    checks: Vec<(&'static str, Check)>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &'static str, check: Check) -> &mut Self {
        self.checks.push((name, check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// The built-in checks over the `page` table and the renderer
    pub fn smoke() -> Self {
        let mut suite = Self::new();
        suite
            .add("Database connection", check_connection)
            .add("Table count", check_count)
            .add("Data create", check_create)
            .add("Data read", check_read)
            .add("Data update", check_update)
            .add("Data delete", check_delete)
            .add("Data fetch", check_fetch)
            .add("SQL execute", check_execute)
            .add("Page render", check_render);
        suite
    }

    pub fn run(&self, db_path: &Path) -> Report {
        let mut report = Report::default();

        for &(name, check) in &self.checks {
            info!(check = name, "running");
            let outcome = match Database::open(db_path).and_then(|db| check(&db)) {
                Ok(outcome) => outcome,
                Err(e) => Outcome {
                    passed: false,
                    message: format!("Exception: {e}"),
                },
            };

            if outcome.passed {
                info!(check = name, "{}", outcome.message);
            } else {
                error!(check = name, "{}", outcome.message);
            }
            report.results.push(CheckResult { name, outcome });
        }

        info!(result = %report, "checks finished");
        report
    }
}

fn page(title: &str, content: impl Into<Value>) -> Record {
    Record::new().with("title", title).with("content", content)
}

fn title_of(record: Option<&Record>) -> Option<&str> {
    record.and_then(|r| r.get("title")).and_then(Value::as_str)
}

fn check_connection(_db: &Database) -> Result<Outcome> {
    Ok(expect(
        true,
        "Database connection successful",
        "Failed to connect to database",
    ))
}

fn check_count(db: &Database) -> Result<Outcome> {
    let count = db.count(PAGE_TABLE)?;
    Ok(expect(
        count >= 3,
        format!("Count returned {count} rows as expected"),
        format!("Count failed, expected >= 3 rows, got {count}"),
    ))
}

fn check_create(db: &Database) -> Result<Outcome> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let id = db.create(PAGE_TABLE, &page("Test Page", format!("Test Content {stamp}")))?;
    Ok(expect(
        id > 0,
        format!("Create returned ID {id}"),
        "Create failed to return a valid ID",
    ))
}

fn check_read(db: &Database) -> Result<Outcome> {
    let record = db.read(PAGE_TABLE, 1)?;
    let id = record.as_ref().and_then(|r| r.get("id")).and_then(Value::as_i64);
    Ok(expect(
        id == Some(1),
        "Read retrieved record with ID 1",
        "Read failed to retrieve record with ID 1",
    ))
}

fn check_update(db: &Database) -> Result<Outcome> {
    let id = db.create(PAGE_TABLE, &page("Update Test", "Original Content"))?;
    let changed = db.update(PAGE_TABLE, id, &page("Updated Title", "Updated Content"))?;
    let updated = db.read(PAGE_TABLE, id)?;
    Ok(expect(
        changed && title_of(updated.as_ref()) == Some("Updated Title"),
        format!("Update modified record with ID {id}"),
        format!("Update failed to modify record with ID {id}"),
    ))
}

fn check_delete(db: &Database) -> Result<Outcome> {
    let id = db.create(PAGE_TABLE, &page("Delete Test", "Content to delete"))?;
    let deleted = db.delete(PAGE_TABLE, id)?;
    let record = db.read(PAGE_TABLE, id)?;
    Ok(expect(
        deleted && record.is_none(),
        format!("Delete removed record with ID {id}"),
        format!("Delete failed to remove record with ID {id}"),
    ))
}

fn check_fetch(db: &Database) -> Result<Outcome> {
    let rows = db.fetch("SELECT * FROM page LIMIT 3")?;
    Ok(expect(
        (1..=3).contains(&rows.len()),
        format!("Fetch returned {} rows", rows.len()),
        "Fetch failed to return results",
    ))
}

fn check_execute(db: &Database) -> Result<Outcome> {
    db.execute("UPDATE page SET content = 'Updated via Execute' WHERE id = 1")?;
    Ok(expect(
        true,
        "Execute ran query",
        "Execute failed to run query",
    ))
}

fn check_render(_db: &Database) -> Result<Outcome> {
    let template = tempfile::Builder::new().prefix("test_tpl_").tempfile()?;
    fs::write(template.path(), "Title: {{title}}, Content: {{content}}")?;

    let rendered = Page::new(template.path())
        .render([("title", "Test Title"), ("content", "Test Content")])?;
    Ok(expect(
        rendered == "Title: Test Title, Content: Test Content",
        "Page render replaced placeholders",
        "Page render failed to replace placeholders correctly",
    ))
}
