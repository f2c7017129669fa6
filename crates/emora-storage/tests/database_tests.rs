// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed database lifecycle tests.

use emora_core::EmoraError;
use emora_storage::Database;

#[tokio::test]
async fn open_creates_parent_directories_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/emora.db");
    let path_str = path.to_str().unwrap();

    let db = Database::open(path_str, true).await.unwrap();
    db.ping().await.unwrap();
    db.close().await.unwrap();

    assert!(path.exists());
}

#[tokio::test]
async fn reopen_keeps_rows_and_skips_applied_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emora.db");
    let path_str = path.to_str().unwrap().to_string();

    let db = Database::open(&path_str, true).await.unwrap();
    db.connection()
        .call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO memory_records (id, text, embedding, emotion, speaker, timestamp, reply)
                 VALUES ('1_abcd1234', 'hello', x'0000803f', 'joy', 'user', 1, NULL)",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();
    db.close().await.unwrap();

    let db = Database::open(&path_str, true).await.unwrap();
    let count: i64 = db
        .connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM memory_records", [], |row| row.get(0))
        })
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn open_on_a_directory_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path_str = dir.path().to_str().unwrap();

    let err = Database::open(path_str, false).await.err().unwrap();
    assert!(matches!(err, EmoraError::Storage { .. }), "got {err:?}");
}
