use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use crate::repository::{
    ProgressRecord, ProgressRepository, ProgressUpdate, StorageError, union_merge,
};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn record_from_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let topic: String = row.try_get("topic").map_err(conn)?;
    let weak_areas: String = row.try_get("weak_areas").map_err(conn)?;
    let strengths: String = row.try_get("strengths").map_err(conn)?;
    let last_score: i64 = row.try_get("last_score").map_err(conn)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(conn)?;

    Ok(ProgressRecord {
        topic,
        weak_areas: serde_json::from_str(&weak_areas).map_err(ser)?,
        strengths: serde_json::from_str(&strengths).map_err(ser)?,
        last_score: u8::try_from(last_score).map_err(ser)?,
        updated_at,
    })
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn merge_progress(&self, update: ProgressUpdate) -> Result<(), StorageError> {
        // Read-merge-write inside one transaction so concurrent merges for
        // the same topic cannot drop each other's tags.
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let existing = sqlx::query(
            r"
            SELECT topic, weak_areas, strengths, last_score, updated_at
            FROM learning_progress WHERE topic = ?1
            ",
        )
        .bind(&update.topic)
        .fetch_optional(&mut *tx)
        .await
        .map_err(conn)?;

        let (weak_areas, strengths) = match existing {
            Some(row) => {
                let record = record_from_row(&row)?;
                (
                    union_merge(record.weak_areas, &update.report.weak_areas),
                    union_merge(record.strengths, &update.report.strengths),
                )
            }
            None => (
                update.report.weak_areas.clone(),
                update.report.strengths.clone(),
            ),
        };

        sqlx::query(
            r"
            INSERT INTO learning_progress (topic, weak_areas, strengths, last_score, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(topic) DO UPDATE SET
                weak_areas = excluded.weak_areas,
                strengths = excluded.strengths,
                last_score = excluded.last_score,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&update.topic)
        .bind(serde_json::to_string(&weak_areas).map_err(ser)?)
        .bind(serde_json::to_string(&strengths).map_err(ser)?)
        .bind(i64::from(update.score))
        .bind(update.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)
    }

    async fn get_progress(&self, topic: &str) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT topic, weak_areas, strengths, last_score, updated_at
            FROM learning_progress WHERE topic = ?1
            ",
        )
        .bind(topic)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        match row {
            Some(row) => record_from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_topics(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT topic FROM learning_progress ORDER BY topic ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut topics = Vec::with_capacity(rows.len());
        for row in rows {
            topics.push(row.try_get("topic").map_err(conn)?);
        }
        Ok(topics)
    }
}
