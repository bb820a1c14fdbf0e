use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs the versioned schema migrations.
///
/// Safe to call on every start; applied versions are recorded in
/// `schema_migrations` and skipped.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: catalog and feedback tables.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS categories (
                    slug TEXT PRIMARY KEY,
                    sort_order INTEGER NOT NULL UNIQUE,
                    icon TEXT NOT NULL,
                    color TEXT NOT NULL,
                    question TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS lessons (
                    slug TEXT PRIMARY KEY,
                    sort_order INTEGER NOT NULL UNIQUE,
                    title TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS lesson_feedback (
                    token TEXT NOT NULL,
                    category_slug TEXT NOT NULL,
                    lesson_slug TEXT NOT NULL,
                    mark TEXT,
                    updated_at TEXT NOT NULL,
                    PRIMARY KEY (token, category_slug, lesson_slug),
                    FOREIGN KEY (category_slug) REFERENCES categories(slug),
                    FOREIGN KEY (lesson_slug) REFERENCES lessons(slug)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS simple_feedback (
                    token TEXT NOT NULL,
                    question_slug TEXT NOT NULL,
                    answer TEXT,
                    updated_at TEXT NOT NULL,
                    PRIMARY KEY (token, question_slug)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
