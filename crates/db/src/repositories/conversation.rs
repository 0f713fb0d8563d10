use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::Row;

use petworld_core::domain::conversation::{ConversationId, ConversationRecord, NewConversation};

use super::{ConversationRepository, RepositoryError};
use crate::DbPool;

pub struct SqlConversationRepository {
    pool: DbPool,
}

impl SqlConversationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fixed-width RFC 3339 so that lexicographic order in SQLite matches chronological order.
fn timestamp_to_sql(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_conversation(row: &sqlx::sqlite::SqliteRow) -> Result<ConversationRecord, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let question: String =
        row.try_get("question").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let answer: String =
        row.try_get("answer").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let iteration_count: i64 =
        row.try_get("iteration_count").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            RepositoryError::Decode(format!(
                "conversation {id} has invalid created_at `{created_at_str}`: {e}"
            ))
        })?;
    let iteration_count = u32::try_from(iteration_count).map_err(|_| {
        RepositoryError::Decode(format!(
            "conversation {id} has invalid iteration_count {iteration_count}"
        ))
    })?;

    Ok(ConversationRecord {
        id: ConversationId(id),
        created_at,
        question,
        answer,
        iteration_count,
    })
}

#[async_trait::async_trait]
impl ConversationRepository for SqlConversationRepository {
    async fn append(
        &self,
        conversation: NewConversation,
    ) -> Result<ConversationRecord, RepositoryError> {
        // stored at microsecond precision; hand back exactly what a later read returns
        let conversation = NewConversation {
            created_at: conversation.created_at.trunc_subsecs(6),
            ..conversation
        };
        let result = sqlx::query(
            "INSERT INTO conversation (created_at, question, answer, iteration_count)
             VALUES (?, ?, ?, ?)",
        )
        .bind(timestamp_to_sql(&conversation.created_at))
        .bind(&conversation.question)
        .bind(&conversation.answer)
        .bind(i64::from(conversation.iteration_count))
        .execute(&self.pool)
        .await?;

        Ok(conversation.into_record(ConversationId(result.last_insert_rowid())))
    }

    async fn list_all(&self) -> Result<Vec<ConversationRecord>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, created_at, question, answer, iteration_count
             FROM conversation
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_conversation).collect::<Result<Vec<_>, _>>()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use petworld_core::domain::conversation::NewConversation;

    use super::SqlConversationRepository;
    use crate::repositories::ConversationRepository;
    use crate::{connect_with_settings, migrations};

    fn conversation(question: &str, minutes_offset: i64) -> NewConversation {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid timestamp");
        NewConversation {
            question: question.to_string(),
            answer: format!("answer to {question}"),
            iteration_count: 2,
            created_at: base + Duration::minutes(minutes_offset),
        }
    }

    #[tokio::test]
    async fn append_assigns_identity_and_preserves_fields() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlConversationRepository::new(pool.clone());

        let stored = repo.append(conversation("Co polecasz dla kota?", 0)).await.expect("append");
        let listed = repo.list_all().await.expect("list");

        assert_eq!(listed, vec![stored.clone()]);
        assert_eq!(stored.question, "Co polecasz dla kota?");
        assert_eq!(stored.iteration_count, 2);
        assert!(stored.id.0 > 0);

        pool.close().await;
    }

    #[tokio::test]
    async fn list_all_orders_newest_first() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlConversationRepository::new(pool.clone());

        repo.append(conversation("middle", 5)).await.expect("append middle");
        repo.append(conversation("oldest", 0)).await.expect("append oldest");
        repo.append(conversation("newest", 10)).await.expect("append newest");

        let questions: Vec<String> =
            repo.list_all().await.expect("list").into_iter().map(|r| r.question).collect();
        assert_eq!(questions, vec!["newest", "middle", "oldest"]);

        let again: Vec<String> =
            repo.list_all().await.expect("list again").into_iter().map(|r| r.question).collect();
        assert_eq!(questions, again, "history should be stable without new appends");

        pool.close().await;
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_insertion_order() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlConversationRepository::new(pool.clone());

        repo.append(conversation("first", 0)).await.expect("append first");
        repo.append(conversation("second", 0)).await.expect("append second");

        let questions: Vec<String> =
            repo.list_all().await.expect("list").into_iter().map(|r| r.question).collect();
        assert_eq!(questions, vec!["second", "first"]);

        pool.close().await;
    }
}
