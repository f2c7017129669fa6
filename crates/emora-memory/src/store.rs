// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory store contract and its SQLite implementation.

use std::str::FromStr;

use async_trait::async_trait;
use emora_core::{AdapterType, EmoraError, HealthStatus, PluginAdapter, Speaker};
use emora_storage::{map_tr_err, Database};
use tracing::debug;

use crate::types::{
    blob_to_vec, squared_l2_distance, vec_to_blob, MemoryRecord, MetadataFilter, Neighbor,
    RecordMetadata,
};

/// Append-only store of embedded memory records.
///
/// Implementations must be safe for concurrent callers.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: MemoryRecord) -> Result<(), EmoraError>;

    /// Up to `n` records nearest to `embedding`, ordered by increasing distance.
    ///
    /// Ties keep insertion order.
    async fn query_nearest(
        &self,
        embedding: &[f32],
        n: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<Neighbor>, EmoraError>;

    /// Up to `limit` records matching `filter`, in insertion order, unranked.
    async fn find_by_metadata(
        &self,
        filter: &MetadataFilter,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, EmoraError>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize, EmoraError>;
}

/// SQLite-backed memory store.
///
/// Embeddings are stored as little-endian f32 BLOBs and searched with an
/// exact scan on the database thread. Records whose dimensionality differs
/// from the query are skipped.
#[derive(Clone)]
pub struct SqliteMemoryStore {
    db: Database,
}

impl SqliteMemoryStore {
    /// Wrap an opened database (migrations already applied).
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

const SELECT_COLUMNS: &str = "SELECT id, text, embedding, emotion, speaker, timestamp, reply \
     FROM memory_records \
     WHERE (?1 IS NULL OR emotion = ?1) AND (?2 IS NULL OR speaker = ?2)";

fn row_to_record(row: &rusqlite::Row) -> Result<MemoryRecord, rusqlite::Error> {
    let blob: Vec<u8> = row.get(2)?;
    let speaker: String = row.get(4)?;
    let speaker = Speaker::from_str(&speaker).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(MemoryRecord {
        id: row.get(0)?,
        text: row.get(1)?,
        embedding: blob_to_vec(&blob),
        metadata: RecordMetadata {
            emotion: row.get(3)?,
            speaker,
            timestamp: row.get(5)?,
            reply: row.get(6)?,
        },
    })
}

fn filter_params(filter: Option<&MetadataFilter>) -> (Option<String>, Option<String>) {
    match filter {
        Some(f) => (f.emotion.clone(), f.speaker.map(|s| s.to_string())),
        None => (None, None),
    }
}

#[async_trait]
impl MemoryStore for SqliteMemoryStore {
    async fn insert(&self, record: MemoryRecord) -> Result<(), EmoraError> {
        let id = record.id.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO memory_records (id, text, embedding, emotion, speaker, timestamp, reply)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    rusqlite::params![
                        record.id,
                        record.text,
                        vec_to_blob(&record.embedding),
                        record.metadata.emotion,
                        record.metadata.speaker.to_string(),
                        record.metadata.timestamp,
                        record.metadata.reply,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(id = %id, "memory record inserted");
        Ok(())
    }

    async fn query_nearest(
        &self,
        embedding: &[f32],
        n: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<Neighbor>, EmoraError> {
        if n == 0 {
            return Ok(vec![]);
        }
        let query = embedding.to_vec();
        let (emotion, speaker) = filter_params(filter);

        self.db
            .connection()
            .call(move |conn| -> Result<Vec<Neighbor>, rusqlite::Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))?;
                let records = stmt
                    .query_map(rusqlite::params![emotion, speaker], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;

                let mut neighbors: Vec<Neighbor> = records
                    .into_iter()
                    .filter(|r| r.embedding.len() == query.len())
                    .map(|r| Neighbor {
                        distance: squared_l2_distance(&query, &r.embedding),
                        id: r.id,
                        text: r.text,
                        metadata: r.metadata,
                    })
                    .collect();

                // Stable sort keeps insertion order among equal distances.
                neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
                neighbors.truncate(n);
                Ok(neighbors)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn find_by_metadata(
        &self,
        filter: &MetadataFilter,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, EmoraError> {
        let (emotion, speaker) = filter_params(Some(filter));
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.db
            .connection()
            .call(move |conn| -> Result<Vec<MemoryRecord>, rusqlite::Error> {
                let mut stmt =
                    conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid LIMIT ?3"))?;
                let records = stmt
                    .query_map(rusqlite::params![emotion, speaker, limit], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn count(&self) -> Result<usize, EmoraError> {
        let count = self
            .db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM memory_records", [], |row| row.get(0))
            })
            .await
            .map_err(map_tr_err)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[async_trait]
impl PluginAdapter for SqliteMemoryStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, EmoraError> {
        match self.db.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), EmoraError> {
        self.db.clone().close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_store() -> SqliteMemoryStore {
        SqliteMemoryStore::new(Database::open_in_memory().await.unwrap())
    }

    fn record(id: &str, text: &str, embedding: Vec<f32>, emotion: &str, ts: i64) -> MemoryRecord {
        MemoryRecord {
            id: id.to_string(),
            text: text.to_string(),
            embedding,
            metadata: RecordMetadata {
                emotion: emotion.to_string(),
                speaker: Speaker::User,
                timestamp: Some(ts),
                reply: None,
            },
        }
    }

    #[tokio::test]
    async fn insert_and_count() {
        let store = setup_store().await;
        assert_eq!(store.count().await.unwrap(), 0);
        store
            .insert(record("1", "hello", vec![1.0, 0.0], "joy", 1))
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn query_nearest_orders_by_distance() {
        let store = setup_store().await;
        store.insert(record("far", "far", vec![3.0, 0.0], "joy", 1)).await.unwrap();
        store.insert(record("near", "near", vec![1.0, 0.0], "joy", 2)).await.unwrap();
        store.insert(record("mid", "mid", vec![2.0, 0.0], "joy", 3)).await.unwrap();

        let hits = store.query_nearest(&[0.0, 0.0], 10, None).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert_eq!(hits[0].distance, 1.0);
        assert_eq!(hits[2].distance, 9.0);
    }

    #[tokio::test]
    async fn query_nearest_ties_keep_insertion_order() {
        let store = setup_store().await;
        store.insert(record("b", "first", vec![1.0, 0.0], "joy", 1)).await.unwrap();
        store.insert(record("a", "second", vec![0.0, 1.0], "joy", 2)).await.unwrap();

        let hits = store.query_nearest(&[0.0, 0.0], 2, None).await.unwrap();
        assert_eq!(hits[0].text, "first");
        assert_eq!(hits[1].text, "second");
    }

    #[tokio::test]
    async fn query_nearest_truncates_and_skips_mismatched_dimensions() {
        let store = setup_store().await;
        store.insert(record("1", "a", vec![1.0, 0.0], "joy", 1)).await.unwrap();
        store.insert(record("2", "b", vec![1.0, 0.0, 0.0], "joy", 2)).await.unwrap();
        store.insert(record("3", "c", vec![2.0, 0.0], "joy", 3)).await.unwrap();

        let hits = store.query_nearest(&[0.0, 0.0], 1, None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        let all = store.query_nearest(&[0.0, 0.0], 10, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn query_nearest_applies_filter() {
        let store = setup_store().await;
        store.insert(record("1", "a", vec![0.0], "joy", 1)).await.unwrap();
        store.insert(record("2", "b", vec![5.0], "fear", 2)).await.unwrap();

        let filter = MetadataFilter::emotion("fear");
        let hits = store.query_nearest(&[0.0], 10, Some(&filter)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata.emotion, "fear");
    }

    #[tokio::test]
    async fn find_by_metadata_limits_results() {
        let store = setup_store().await;
        for i in 0..4 {
            store
                .insert(record(&i.to_string(), "x", vec![0.0], "sadness", i))
                .await
                .unwrap();
        }
        store.insert(record("j", "y", vec![0.0], "joy", 9)).await.unwrap();

        let found = store
            .find_by_metadata(&MetadataFilter::emotion("sadness"), 3)
            .await
            .unwrap();
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|r| r.metadata.emotion == "sadness"));

        let none = store
            .find_by_metadata(&MetadataFilter::emotion("anger"), 3)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn metadata_round_trips() {
        let store = setup_store().await;
        let mut r = record("1", "hi", vec![0.25, -0.5], "fear", 7);
        r.metadata.reply = Some("I'm here.".into());
        r.metadata.speaker = Speaker::Bot;
        store.insert(r.clone()).await.unwrap();

        let found = store
            .find_by_metadata(&MetadataFilter::default(), 10)
            .await
            .unwrap();
        assert_eq!(found, vec![r]);
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let store = setup_store().await;
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
