use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown question slug: {0}")]
pub struct UnknownQuestion(pub String);

/// Free-text questions asked once per respondent, independent of lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SimpleQuestion {
    Best,
    Worst,
    Wishes,
    Comments,
    /// Message for the organizers only; never exported.
    Secret,
}

impl SimpleQuestion {
    /// Every question in display order.
    pub const ALL: [SimpleQuestion; 5] = [
        SimpleQuestion::Best,
        SimpleQuestion::Worst,
        SimpleQuestion::Wishes,
        SimpleQuestion::Comments,
        SimpleQuestion::Secret,
    ];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            SimpleQuestion::Best => "best",
            SimpleQuestion::Worst => "worst",
            SimpleQuestion::Wishes => "wishes",
            SimpleQuestion::Comments => "comments",
            SimpleQuestion::Secret => "secret",
        }
    }

    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            SimpleQuestion::Best => "Co se ti na kurzu nejvíc líbilo?",
            SimpleQuestion::Worst => "Co se ti nelíbilo, co bychom měli zlepšit?",
            SimpleQuestion::Wishes => "Jaká témata bys chtěl/a probrat příště?",
            SimpleQuestion::Comments => "Máš ještě nějaké další poznámky?",
            SimpleQuestion::Secret => {
                "Vzkaz jen pro organizátory (nebude zveřejněn ani v anonymních výsledcích):"
            }
        }
    }

    /// Private answers are stored but excluded from the export.
    #[must_use]
    pub fn is_private(self) -> bool {
        matches!(self, SimpleQuestion::Secret)
    }

    /// Looks up a question by its stored slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.slug() == slug)
    }
}

impl fmt::Display for SimpleQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SimpleQuestion {
    type Err = UnknownQuestion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| UnknownQuestion(s.to_owned()))
    }
}
