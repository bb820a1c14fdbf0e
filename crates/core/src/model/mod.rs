mod catalog;
mod feedback;
mod form;
mod ids;
mod question;

pub use catalog::{Category, CatalogError, Lesson, seed_categories, seed_lessons};
pub use feedback::{
    LessonFeedback, MAX_MARK, MarkKey, NO_MARK, ResponseSheet, SimpleFeedback, Submission,
    normalize_mark,
};
pub use form::{DecodedForm, FieldKey, FormLayout, FormLayoutError};
pub use ids::{TOKEN_MAX_LEN, TOKEN_MIN_LEN, Token, TokenError};
pub use question::{SimpleQuestion, UnknownQuestion};
