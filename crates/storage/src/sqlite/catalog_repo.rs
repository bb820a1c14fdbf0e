use async_trait::async_trait;
use feedback_core::model::{Category, Lesson};

use super::SqliteRepository;
use super::mapping::{conn, map_category_row, map_lesson_row};
use crate::repository::{CatalogRepository, StorageError};

#[async_trait]
impl CatalogRepository for SqliteRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT slug, sort_order, icon, color, question
            FROM categories
            ORDER BY sort_order ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_category_row).collect()
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT slug, sort_order, title
            FROM lessons
            ORDER BY sort_order ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_lesson_row).collect()
    }

    async fn seed_catalog(
        &self,
        categories: &[Category],
        lessons: &[Lesson],
    ) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let (existing,): (i64,) = sqlx::query_as(
            r"
            SELECT (SELECT COUNT(*) FROM categories) + (SELECT COUNT(*) FROM lessons)
            ",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(conn)?;
        if existing > 0 {
            tx.rollback().await.map_err(conn)?;
            return Ok(false);
        }

        for category in categories {
            sqlx::query(
                r"
                INSERT INTO categories (slug, sort_order, icon, color, question)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(slug) DO NOTHING
                ",
            )
            .bind(category.slug())
            .bind(category.order())
            .bind(category.icon())
            .bind(category.color())
            .bind(category.question())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        for lesson in lessons {
            sqlx::query(
                r"
                INSERT INTO lessons (slug, sort_order, title)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(slug) DO NOTHING
                ",
            )
            .bind(lesson.slug())
            .bind(lesson.order())
            .bind(lesson.title())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(true)
    }
}
