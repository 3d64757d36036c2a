//! The `page` table and its seed rows.

use crate::db::Database;
use crate::error::Result;
use crate::models::Record;
use tracing::info;

pub const PAGE_TABLE: &str = "page";

const CREATE_PAGE_TABLE: &str = "CREATE TABLE IF NOT EXISTS page (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT
)";

pub const SEED_PAGES: [(&str, &str); 3] = [
    ("Home", "Welcome to the site."),
    ("About", "What this site is about."),
    ("Contact", "How to get in touch."),
];

/// Create the `page` table if needed and seed it when empty.
///
/// Returns true when seed rows were inserted.
pub fn init(db: &Database) -> Result<bool> {
    db.execute_batch(CREATE_PAGE_TABLE)?;

    if db.count(PAGE_TABLE)? > 0 {
        return Ok(false);
    }

    for (title, content) in SEED_PAGES {
        let page = Record::new().with("title", title).with("content", content);
        db.create(PAGE_TABLE, &page)?;
    }
    info!(rows = SEED_PAGES.len(), "seeded page table");
    Ok(true)
}
