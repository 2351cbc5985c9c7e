//! Spreadsheet-backed log store.
//!
//! Talks to the small HTTP proxy sitting in front of the sheet:
//! `GET /api/data` for the menu and every row, `POST /api/save`,
//! `/api/update` and `/api/delete` for writes.

pub mod client;
pub mod config;
pub mod wire;

pub use client::SheetsClient;
pub use config::SheetsConfig;
