use feedback_core::model::{Category, Lesson, LessonFeedback, SimpleFeedback, Token};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn token_from_row(row: &SqliteRow) -> Result<Token, StorageError> {
    let raw: String = row.try_get("token").map_err(ser)?;
    Token::parse(&raw).map_err(ser)
}

pub(crate) fn map_category_row(row: &SqliteRow) -> Result<Category, StorageError> {
    Category::new(
        row.try_get::<i64, _>("sort_order").map_err(ser)?,
        row.try_get::<String, _>("slug").map_err(ser)?,
        row.try_get::<String, _>("icon").map_err(ser)?,
        row.try_get::<String, _>("color").map_err(ser)?,
        row.try_get::<String, _>("question").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_lesson_row(row: &SqliteRow) -> Result<Lesson, StorageError> {
    Lesson::new(
        row.try_get::<i64, _>("sort_order").map_err(ser)?,
        row.try_get::<String, _>("slug").map_err(ser)?,
        row.try_get::<String, _>("title").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_lesson_feedback_row(row: &SqliteRow) -> Result<LessonFeedback, StorageError> {
    Ok(LessonFeedback {
        token: token_from_row(row)?,
        category: row.try_get("category_slug").map_err(ser)?,
        lesson: row.try_get("lesson_slug").map_err(ser)?,
        mark: row.try_get("mark").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_simple_feedback_row(row: &SqliteRow) -> Result<SimpleFeedback, StorageError> {
    Ok(SimpleFeedback {
        token: token_from_row(row)?,
        question: row.try_get("question_slug").map_err(ser)?,
        answer: row.try_get("answer").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}
