use std::sync::Arc;

use feedback_core::model::{LessonFeedback, SimpleFeedback, Token};
use rand::rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use sha2::{Digest, Sha256};
use storage::repository::FeedbackRepository;
use tracing::info;

use crate::error::ExportError;

/// Column order of the exported CSV.
pub const EXPORT_HEADER: [&str; 4] = ["user_hash", "lesson", "category", "answer"];

/// One line of the anonymized export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub user_hash: String,
    /// Lesson slug, or the question slug for free-text answers.
    pub lesson: String,
    /// Category slug; empty for free-text answers.
    pub category: String,
    pub answer: String,
}

/// SHA-256 of the raw token, lowercase hex.
#[must_use]
pub fn hash_token(token: &Token) -> String {
    hex::encode(Sha256::digest(token.as_str().as_bytes()))
}

impl From<&LessonFeedback> for ExportRow {
    fn from(row: &LessonFeedback) -> Self {
        Self {
            user_hash: hash_token(&row.token),
            lesson: row.lesson.clone(),
            category: row.category.clone(),
            answer: row.mark.clone().unwrap_or_default(),
        }
    }
}

impl ExportRow {
    /// Converts a free-text answer, or `None` when its question is private
    /// or no longer part of the question set.
    fn from_simple(row: &SimpleFeedback) -> Option<Self> {
        let question = row.known_question()?;
        if question.is_private() {
            return None;
        }
        Some(Self {
            user_hash: hash_token(&row.token),
            lesson: question.slug().to_owned(),
            category: String::new(),
            answer: row.answer.clone().unwrap_or_default(),
        })
    }
}

/// Builds the anonymized results dump.
#[derive(Clone)]
pub struct ExportService {
    feedback: Arc<dyn FeedbackRepository>,
}

impl ExportService {
    #[must_use]
    pub fn new(feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self { feedback }
    }

    /// Every exportable row from both feedback tables, shuffled.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Storage` if the tables cannot be read.
    pub async fn rows(&self) -> Result<Vec<ExportRow>, ExportError> {
        let lessons = self.feedback.all_lesson_feedback().await?;
        let simple = self.feedback.all_simple_feedback().await?;

        let mut rows: Vec<ExportRow> = lessons
            .iter()
            .map(ExportRow::from)
            .chain(simple.iter().filter_map(ExportRow::from_simple))
            .collect();
        rows.shuffle(&mut rng());
        Ok(rows)
    }

    /// The export rendered as CSV, header included even when empty.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if reading or serializing fails.
    pub async fn csv(&self) -> Result<Vec<u8>, ExportError> {
        let rows = self.rows().await?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;
        for row in &rows {
            writer.serialize(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;

        info!(rows = rows.len(), "results exported");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use feedback_core::model::{SimpleQuestion, seed_categories, seed_lessons};
    use feedback_core::time::fixed_now;
    use storage::repository::{CatalogRepository, InMemoryRepository};

    async fn repo_with_answers(token: &Token) -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        repo.seed_catalog(&seed_categories(), &seed_lessons())
            .await
            .unwrap();
        let lessons = vec![LessonFeedback {
            token: token.clone(),
            category: "like".into(),
            lesson: "numpy".into(),
            mark: Some("8".into()),
            updated_at: fixed_now(),
        }];
        let simple: Vec<_> = SimpleQuestion::ALL
            .into_iter()
            .map(|q| SimpleFeedback {
                token: token.clone(),
                question: q.slug().into(),
                answer: Some(format!("answer to {}", q.slug())),
                updated_at: fixed_now(),
            })
            .collect();
        repo.save_feedback(&lessons, &simple).await.unwrap();
        repo
    }

    #[test]
    fn hash_is_sha256_hex() {
        let token = Token::parse("abcdef").unwrap();
        assert_eq!(
            hash_token(&token),
            "bef57ec7f53a6d40beb640a780a639c83bc29ac8a9816f1fc6c5c6dcd93c4721"
        );
    }

    #[tokio::test]
    async fn export_omits_private_questions() {
        let token = Token::parse("secret1").unwrap();
        let repo = repo_with_answers(&token).await;
        let service = ExportService::new(Arc::new(repo));

        let rows = service.rows().await.unwrap();
        assert_eq!(rows.len(), 1 + SimpleQuestion::ALL.len() - 1);
        assert!(rows.iter().all(|r| r.lesson != "secret"));
        assert!(rows.iter().all(|r| !r.answer.contains("secret")));
    }

    #[tokio::test]
    async fn export_never_contains_raw_token() {
        let token = Token::parse("rawTokenXY").unwrap();
        let repo = repo_with_answers(&token).await;
        let service = ExportService::new(Arc::new(repo));

        let csv = String::from_utf8(service.csv().await.unwrap()).unwrap();
        assert!(!csv.contains("rawTokenXY"));
        assert!(csv.contains(&hash_token(&token)));
        assert!(csv.starts_with("user_hash,lesson,category,answer\n"));
    }

    #[tokio::test]
    async fn lesson_rows_carry_slugs_and_mark() {
        let token = Token::parse("slugs1").unwrap();
        let repo = repo_with_answers(&token).await;
        let service = ExportService::new(Arc::new(repo));

        let rows = service.rows().await.unwrap();
        let mark = rows.iter().find(|r| !r.category.is_empty()).unwrap();
        assert_eq!(mark.lesson, "numpy");
        assert_eq!(mark.category, "like");
        assert_eq!(mark.answer, "8");
    }

    #[tokio::test]
    async fn empty_store_exports_header_only() {
        let service = ExportService::new(Arc::new(InMemoryRepository::new()));
        let csv = service.csv().await.unwrap();
        assert_eq!(csv, b"user_hash,lesson,category,answer\n");
    }
}
