//! # site
//!
//! Generic CRUD over a single SQLite file, literal `{{key}}` page templates,
//! and a small smoke harness that exercises both.

pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod db;
pub mod error;
pub mod harness;
pub mod models;
pub mod page;
pub mod schema;

pub use db::Database;
pub use error::{Result, SiteError};
pub use models::{Record, Value};
pub use page::Page;
