use async_trait::async_trait;
use feedback_core::model::{LessonFeedback, SimpleFeedback, Token};

use super::SqliteRepository;
use super::mapping::{conn, map_lesson_feedback_row, map_simple_feedback_row};
use crate::repository::{FeedbackRepository, StorageError};

#[async_trait]
impl FeedbackRepository for SqliteRepository {
    async fn save_feedback(
        &self,
        lessons: &[LessonFeedback],
        simple: &[SimpleFeedback],
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        for row in lessons {
            sqlx::query(
                r"
                INSERT INTO lesson_feedback (token, category_slug, lesson_slug, mark, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(token, category_slug, lesson_slug) DO UPDATE SET
                    mark = excluded.mark,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(row.token.as_str())
            .bind(row.category.as_str())
            .bind(row.lesson.as_str())
            .bind(row.mark.as_deref())
            .bind(row.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        for row in simple {
            sqlx::query(
                r"
                INSERT INTO simple_feedback (token, question_slug, answer, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(token, question_slug) DO UPDATE SET
                    answer = excluded.answer,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(row.token.as_str())
            .bind(row.question.as_str())
            .bind(row.answer.as_deref())
            .bind(row.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        // Dropping the transaction on an early return rolls everything back.
        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn lesson_feedback_for(
        &self,
        token: &Token,
    ) -> Result<Vec<LessonFeedback>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT token, category_slug, lesson_slug, mark, updated_at
            FROM lesson_feedback
            WHERE token = ?1
            ",
        )
        .bind(token.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_lesson_feedback_row).collect()
    }

    async fn simple_feedback_for(
        &self,
        token: &Token,
    ) -> Result<Vec<SimpleFeedback>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT token, question_slug, answer, updated_at
            FROM simple_feedback
            WHERE token = ?1
            ",
        )
        .bind(token.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_simple_feedback_row).collect()
    }

    async fn all_lesson_feedback(&self) -> Result<Vec<LessonFeedback>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT token, category_slug, lesson_slug, mark, updated_at
            FROM lesson_feedback
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_lesson_feedback_row).collect()
    }

    async fn all_simple_feedback(&self) -> Result<Vec<SimpleFeedback>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT token, question_slug, answer, updated_at
            FROM simple_feedback
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_simple_feedback_row).collect()
    }
}
