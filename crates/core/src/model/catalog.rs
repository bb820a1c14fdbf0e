use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("slug cannot be empty")]
    EmptySlug,

    #[error("slug {0:?} may only contain lowercase letters, digits and '-'")]
    InvalidSlug(String),

    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("question cannot be empty")]
    EmptyQuestion,
}

fn validate_slug(slug: &str) -> Result<(), CatalogError> {
    if slug.is_empty() {
        return Err(CatalogError::EmptySlug);
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CatalogError::InvalidSlug(slug.to_owned()));
    }
    Ok(())
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// A rating dimension asked for every lesson (e.g. "how useful was the topic").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    order: i64,
    slug: String,
    icon: String,
    color: String,
    question: String,
}

impl Category {
    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the slug is empty or malformed, or the
    /// question is blank.
    pub fn new(
        order: i64,
        slug: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        question: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let slug = slug.into();
        validate_slug(&slug)?;
        let question = question.into();
        if question.trim().is_empty() {
            return Err(CatalogError::EmptyQuestion);
        }
        Ok(Self {
            order,
            slug,
            icon: icon.into(),
            color: color.into(),
            question,
        })
    }

    #[must_use]
    pub fn order(&self) -> i64 {
        self.order
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// One lesson of the course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    order: i64,
    slug: String,
    title: String,
}

impl Lesson {
    /// Creates a lesson.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the slug is empty or malformed, or the title
    /// is blank.
    pub fn new(
        order: i64,
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let slug = slug.into();
        validate_slug(&slug)?;
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        Ok(Self { order, slug, title })
    }

    #[must_use]
    pub fn order(&self) -> i64 {
        self.order
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

//
// ─── SEED ──────────────────────────────────────────────────────────────────────
//

const SEED_CATEGORIES: [(&str, &str, &str, &str); 3] = [
    ("like", "heart", "#D9534F", "Jak se ti lekce líbila?"),
    ("topic", "star", "#F0AD4E", "Jak přínosné bylo téma?"),
    ("learn", "rocket", "#0275D8", "Kolik nového ses naučil/a?"),
];

const SEED_LESSONS: [(&str, &str); 13] = [
    ("flask-click", "Flask & Click"),
    ("requests", "Requests"),
    ("moduly", "Moduly & PyPI"),
    ("testovani", "Testování"),
    ("dokumentace", "Dokumentace"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
    ("cython", "Cython"),
    ("pyqt", "PyQt"),
    ("async", "Asyncio"),
    ("magie", "Magie"),
    ("micropython", "MicroPython"),
    ("semestralka", "Semestrálka"),
];

/// Categories inserted into a fresh store, ordered from 1.
#[must_use]
pub fn seed_categories() -> Vec<Category> {
    SEED_CATEGORIES
        .iter()
        .zip(1_i64..)
        .map(|(&(slug, icon, color, question), order)| Category {
            order,
            slug: slug.to_owned(),
            icon: icon.to_owned(),
            color: color.to_owned(),
            question: question.to_owned(),
        })
        .collect()
}

/// Lessons inserted into a fresh store, ordered from 1.
#[must_use]
pub fn seed_lessons() -> Vec<Lesson> {
    SEED_LESSONS
        .iter()
        .zip(1_i64..)
        .map(|(&(slug, title), order)| Lesson {
            order,
            slug: slug.to_owned(),
            title: title.to_owned(),
        })
        .collect()
}
