use async_trait::async_trait;
use feedback_core::model::{
    Category, LessonFeedback, Lesson, MarkKey, SimpleFeedback, Token,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the seeded categories and lessons.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All categories, ordered by display order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError>;

    /// All lessons, ordered by display order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError>;

    /// Insert the given catalog in one transaction if no categories or
    /// lessons exist yet. Returns `true` when rows were written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be written.
    async fn seed_catalog(
        &self,
        categories: &[Category],
        lessons: &[Lesson],
    ) -> Result<bool, StorageError>;
}

/// Repository contract for respondents' answers.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Upsert every row of one submission atomically.
    ///
    /// Rows are merged by primary key: `(token, category, lesson)` for marks
    /// and `(token, question)` for answers.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any row cannot be stored; nothing is written
    /// in that case.
    async fn save_feedback(
        &self,
        lessons: &[LessonFeedback],
        simple: &[SimpleFeedback],
    ) -> Result<(), StorageError>;

    /// Marks stored for one token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn lesson_feedback_for(&self, token: &Token)
    -> Result<Vec<LessonFeedback>, StorageError>;

    /// Free-text answers stored for one token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn simple_feedback_for(&self, token: &Token)
    -> Result<Vec<SimpleFeedback>, StorageError>;

    /// Every stored mark.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn all_lesson_feedback(&self) -> Result<Vec<LessonFeedback>, StorageError>;

    /// Every stored free-text answer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn all_simple_feedback(&self) -> Result<Vec<SimpleFeedback>, StorageError>;
}

type LessonKey = (Token, MarkKey);
type SimpleKey = (Token, String);

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    categories: Arc<Mutex<Vec<Category>>>,
    lessons: Arc<Mutex<Vec<Lesson>>>,
    feedback: Arc<Mutex<FeedbackTables>>,
}

#[derive(Default)]
struct FeedbackTables {
    lessons: BTreeMap<LessonKey, LessonFeedback>,
    simple: BTreeMap<SimpleKey, SimpleFeedback>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let mut categories = self.categories.lock().map_err(poisoned)?.clone();
        categories.sort_by_key(Category::order);
        Ok(categories)
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let mut lessons = self.lessons.lock().map_err(poisoned)?.clone();
        lessons.sort_by_key(Lesson::order);
        Ok(lessons)
    }

    async fn seed_catalog(
        &self,
        categories: &[Category],
        lessons: &[Lesson],
    ) -> Result<bool, StorageError> {
        let mut stored_categories = self.categories.lock().map_err(poisoned)?;
        let mut stored_lessons = self.lessons.lock().map_err(poisoned)?;
        if !stored_categories.is_empty() || !stored_lessons.is_empty() {
            return Ok(false);
        }
        stored_categories.extend_from_slice(categories);
        stored_lessons.extend_from_slice(lessons);
        Ok(true)
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryRepository {
    async fn save_feedback(
        &self,
        lessons: &[LessonFeedback],
        simple: &[SimpleFeedback],
    ) -> Result<(), StorageError> {
        let mut guard = self.feedback.lock().map_err(poisoned)?;
        for row in lessons {
            guard
                .lessons
                .insert((row.token.clone(), row.key()), row.clone());
        }
        for row in simple {
            guard
                .simple
                .insert((row.token.clone(), row.question.clone()), row.clone());
        }
        Ok(())
    }

    async fn lesson_feedback_for(
        &self,
        token: &Token,
    ) -> Result<Vec<LessonFeedback>, StorageError> {
        let guard = self.feedback.lock().map_err(poisoned)?;
        Ok(guard
            .lessons
            .values()
            .filter(|row| &row.token == token)
            .cloned()
            .collect())
    }

    async fn simple_feedback_for(
        &self,
        token: &Token,
    ) -> Result<Vec<SimpleFeedback>, StorageError> {
        let guard = self.feedback.lock().map_err(poisoned)?;
        Ok(guard
            .simple
            .values()
            .filter(|row| &row.token == token)
            .cloned()
            .collect())
    }

    async fn all_lesson_feedback(&self) -> Result<Vec<LessonFeedback>, StorageError> {
        let guard = self.feedback.lock().map_err(poisoned)?;
        Ok(guard.lessons.values().cloned().collect())
    }

    async fn all_simple_feedback(&self) -> Result<Vec<SimpleFeedback>, StorageError> {
        let guard = self.feedback.lock().map_err(poisoned)?;
        Ok(guard.simple.values().cloned().collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn CatalogRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo.clone());
        let feedback: Arc<dyn FeedbackRepository> = Arc::new(repo);
        Self { catalog, feedback }
    }
}
