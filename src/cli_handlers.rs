use crate::config::Config;
use crate::db::Database;
use crate::error::{Result, SiteError};
use crate::harness::Suite;
use crate::models::Record;
use crate::page::Page;
use crate::schema;
use std::path::Path;

fn open(config: &Config) -> Result<Database> {
    Database::from_config(&config.db)
}

fn to_record(set: &[(String, String)]) -> Record {
    set.iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

/// Handle the init command
pub fn handle_init(config: &Config) -> Result<()> {
    let db = open(config)?;
    let seeded = schema::init(&db)?;

    println!("Initialized {}", db.path().display());
    if seeded {
        println!("  - Seeded {} pages", schema::SEED_PAGES.len());
    }
    Ok(())
}

/// Handle the exec command
pub fn handle_exec(config: &Config, sql: &str) -> Result<()> {
    let affected = open(config)?.execute(sql)?;
    println!("{affected}");
    Ok(())
}

/// Handle the fetch command
pub fn handle_fetch(config: &Config, sql: &str) -> Result<()> {
    let rows = open(config)?.fetch(sql)?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

/// Handle the create command
pub fn handle_create(config: &Config, table: &str, set: &[(String, String)]) -> Result<()> {
    let id = open(config)?.create(table, &to_record(set))?;
    println!("{id}");
    Ok(())
}

/// Handle the read command
pub fn handle_read(config: &Config, table: &str, id: i64) -> Result<()> {
    let record = open(config)?.read(table, id)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Handle the update command
pub fn handle_update(config: &Config, table: &str, id: i64, set: &[(String, String)]) -> Result<()> {
    let changed = open(config)?.update(table, id, &to_record(set))?;
    println!("{}", if changed { "updated" } else { "no match" });
    Ok(())
}

/// Handle the delete command
pub fn handle_delete(config: &Config, table: &str, id: i64) -> Result<()> {
    open(config)?.delete(table, id)?;
    println!("deleted");
    Ok(())
}

/// Handle the count command
pub fn handle_count(config: &Config, table: &str) -> Result<()> {
    let count = open(config)?.count(table)?;
    println!("{count}");
    Ok(())
}

/// Handle the render command
pub fn handle_render(template: &Path, set: &[(String, String)]) -> Result<()> {
    let rendered = Page::new(template).render(set.iter().map(|(k, v)| (k, v)))?;
    print!("{rendered}");
    Ok(())
}

/// Handle the check command
pub fn handle_check(config: &Config) -> Result<()> {
    let report = Suite::smoke().run(&config.db.path);

    for result in &report.results {
        let mark = if result.outcome.passed { "PASS" } else { "FAIL" };
        println!("[{mark}] {}: {}", result.name, result.outcome.message);
    }
    println!("Tests completed: {report}");

    if report.all_passed() {
        Ok(())
    } else {
        Err(SiteError::ChecksFailed {
            failed: report.total() - report.passed(),
            total: report.total(),
        })
    }
}
