// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Emora companion.
//!
//! Provides WAL-mode SQLite storage with embedded migrations and a
//! single-writer concurrency model via `tokio-rusqlite`. Higher layers
//! (the memory store) issue their own queries through [`Database::connection`].

pub mod database;
pub mod migrations;

pub use database::{map_tr_err, Database};
