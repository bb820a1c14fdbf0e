use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::model::ids::Token;
use crate::model::question::SimpleQuestion;

/// Form value meaning "no rating given".
pub const NO_MARK: &str = "None";

/// Highest rating level offered by the form.
pub const MAX_MARK: u8 = 9;

/// Normalizes a submitted mark: trims it and maps [`NO_MARK`] to an empty string.
#[must_use]
pub fn normalize_mark(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == NO_MARK {
        String::new()
    } else {
        trimmed.to_owned()
    }
}

//
// ─── KEYS ──────────────────────────────────────────────────────────────────────
//

/// Identifies one rating cell: a category asked about a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkKey {
    pub category: String,
    pub lesson: String,
}

impl MarkKey {
    #[must_use]
    pub fn new(category: impl Into<String>, lesson: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            lesson: lesson.into(),
        }
    }
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Stored mark for `(token, category, lesson)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonFeedback {
    pub token: Token,
    pub category: String,
    pub lesson: String,
    pub mark: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl LessonFeedback {
    #[must_use]
    pub fn key(&self) -> MarkKey {
        MarkKey::new(self.category.clone(), self.lesson.clone())
    }
}

/// Stored free-text answer for `(token, question)`.
///
/// The question is kept as its slug so rows written by an older question set
/// still load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleFeedback {
    pub token: Token,
    pub question: String,
    pub answer: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SimpleFeedback {
    /// The question this row answers, if it is still part of the question set.
    #[must_use]
    pub fn known_question(&self) -> Option<SimpleQuestion> {
        SimpleQuestion::from_slug(&self.question)
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// Decoded contents of one form post.
///
/// `None` means the field was absent from the post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    marks: BTreeMap<MarkKey, Option<String>>,
    answers: BTreeMap<SimpleQuestion, Option<String>>,
}

impl Submission {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mark(&mut self, key: MarkKey, mark: Option<String>) {
        self.marks.insert(key, mark);
    }

    pub fn set_answer(&mut self, question: SimpleQuestion, answer: Option<String>) {
        self.answers.insert(question, answer);
    }

    #[must_use]
    pub fn marks(&self) -> &BTreeMap<MarkKey, Option<String>> {
        &self.marks
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<SimpleQuestion, Option<String>> {
        &self.answers
    }

    /// Expands the submission into rows stamped with `at`.
    #[must_use]
    pub fn into_records(
        self,
        token: &Token,
        at: DateTime<Utc>,
    ) -> (Vec<LessonFeedback>, Vec<SimpleFeedback>) {
        let lessons = self
            .marks
            .into_iter()
            .map(|(key, mark)| LessonFeedback {
                token: token.clone(),
                category: key.category,
                lesson: key.lesson,
                mark,
                updated_at: at,
            })
            .collect();
        let simple = self
            .answers
            .into_iter()
            .map(|(question, answer)| SimpleFeedback {
                token: token.clone(),
                question: question.slug().to_owned(),
                answer,
                updated_at: at,
            })
            .collect();
        (lessons, simple)
    }
}

//
// ─── RESPONSE SHEET ────────────────────────────────────────────────────────────
//

/// Everything one respondent has answered so far, used to prefill the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSheet {
    marks: HashMap<MarkKey, String>,
    answers: HashMap<SimpleQuestion, String>,
}

impl ResponseSheet {
    #[must_use]
    pub fn from_records(lessons: &[LessonFeedback], simple: &[SimpleFeedback]) -> Self {
        let marks = lessons
            .iter()
            .filter_map(|row| row.mark.clone().map(|mark| (row.key(), mark)))
            .collect();
        let answers = simple
            .iter()
            .filter_map(|row| Some((row.known_question()?, row.answer.clone()?)))
            .collect();
        Self { marks, answers }
    }

    /// Stored mark, empty when the respondent chose "no rating".
    #[must_use]
    pub fn mark(&self, key: &MarkKey) -> Option<&str> {
        self.marks.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn answer(&self, question: SimpleQuestion) -> Option<&str> {
        self.answers.get(&question).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty() && self.answers.is_empty()
    }
}
