use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::model::catalog::{Category, Lesson};
use crate::model::feedback::{MarkKey, Submission, normalize_mark};
use crate::model::question::SimpleQuestion;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormLayoutError {
    #[error("catalog has no categories")]
    NoCategories,

    #[error("catalog has no lessons")]
    NoLessons,

    #[error("duplicate category slug: {0}")]
    DuplicateCategory(String),

    #[error("duplicate lesson slug: {0}")]
    DuplicateLesson(String),

    #[error("duplicate {kind} order: {order}")]
    DuplicateOrder { kind: &'static str, order: i64 },

    #[error("form field name collision: {0}")]
    FieldCollision(String),
}

/// A single input of the feedback form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Mark(MarkKey),
    Question(SimpleQuestion),
}

impl FieldKey {
    /// Name of the HTML input carrying this field.
    #[must_use]
    pub fn field_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Mark(key) => write!(f, "mark.{}.{}", key.category, key.lesson),
            FieldKey::Question(question) => write!(f, "question.{}", question.slug()),
        }
    }
}

/// Result of decoding a posted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedForm {
    pub submission: Submission,
    /// Posted field names that matched nothing in the layout.
    pub unknown_fields: Vec<String>,
}

/// The validated shape of the feedback form.
///
/// Built once from the stored catalog; maps every input name to the answer
/// it carries.
#[derive(Debug, Clone)]
pub struct FormLayout {
    categories: Vec<Category>,
    lessons: Vec<Lesson>,
    fields: HashMap<String, FieldKey>,
}

impl FormLayout {
    /// Validates the catalog and builds the field mapping.
    ///
    /// Categories and lessons are sorted by their display order.
    ///
    /// # Errors
    ///
    /// Returns `FormLayoutError` if either set is empty, contains duplicate
    /// slugs or order values, or two inputs would share a name.
    pub fn new(
        mut categories: Vec<Category>,
        mut lessons: Vec<Lesson>,
    ) -> Result<Self, FormLayoutError> {
        if categories.is_empty() {
            return Err(FormLayoutError::NoCategories);
        }
        if lessons.is_empty() {
            return Err(FormLayoutError::NoLessons);
        }

        let mut seen = HashSet::new();
        let mut orders = HashSet::new();
        for category in &categories {
            if !seen.insert(category.slug()) {
                return Err(FormLayoutError::DuplicateCategory(category.slug().to_owned()));
            }
            if !orders.insert(category.order()) {
                return Err(FormLayoutError::DuplicateOrder {
                    kind: "category",
                    order: category.order(),
                });
            }
        }

        let mut seen = HashSet::new();
        let mut orders = HashSet::new();
        for lesson in &lessons {
            if !seen.insert(lesson.slug()) {
                return Err(FormLayoutError::DuplicateLesson(lesson.slug().to_owned()));
            }
            if !orders.insert(lesson.order()) {
                return Err(FormLayoutError::DuplicateOrder {
                    kind: "lesson",
                    order: lesson.order(),
                });
            }
        }

        categories.sort_by_key(Category::order);
        lessons.sort_by_key(Lesson::order);

        let mut fields = HashMap::new();
        let keys = categories
            .iter()
            .flat_map(|c| {
                lessons
                    .iter()
                    .map(|l| FieldKey::Mark(MarkKey::new(c.slug(), l.slug())))
            })
            .chain(SimpleQuestion::ALL.into_iter().map(FieldKey::Question));
        for key in keys {
            let name = key.field_name();
            if fields.contains_key(&name) {
                return Err(FormLayoutError::FieldCollision(name));
            }
            fields.insert(name, key);
        }

        Ok(Self {
            categories,
            lessons,
            fields,
        })
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Every `(category, lesson)` cell in display order, category-major.
    pub fn mark_keys(&self) -> impl Iterator<Item = MarkKey> + '_ {
        self.categories.iter().flat_map(move |c| {
            self.lessons
                .iter()
                .map(move |l| MarkKey::new(c.slug(), l.slug()))
        })
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn lookup(&self, field_name: &str) -> Option<&FieldKey> {
        self.fields.get(field_name)
    }

    /// Maps posted `(name, value)` pairs onto a full submission.
    ///
    /// Every known field is present in the result; fields missing from the
    /// post stay `None`. When a name is posted twice the last value wins.
    pub fn decode<I>(&self, pairs: I) -> DecodedForm
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut submission = Submission::new();
        for key in self.mark_keys() {
            submission.set_mark(key, None);
        }
        for question in SimpleQuestion::ALL {
            submission.set_answer(question, None);
        }

        let mut unknown_fields = Vec::new();
        for (name, value) in pairs {
            match self.fields.get(&name) {
                Some(FieldKey::Mark(key)) => {
                    submission.set_mark(key.clone(), Some(normalize_mark(&value)));
                }
                Some(FieldKey::Question(question)) => {
                    submission.set_answer(*question, Some(value));
                }
                None => unknown_fields.push(name),
            }
        }

        DecodedForm {
            submission,
            unknown_fields,
        }
    }
}
