use feedback_core::model::{
    Category, FieldKey, FormLayout, MAX_MARK, MarkKey, NO_MARK, ResponseSheet, SimpleQuestion,
    Token,
};

/// Everything the form page renders, detached from domain types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormPageVm {
    pub token: String,
    pub action: String,
    /// `true` when the token already has stored answers.
    pub saved: bool,
    pub categories: Vec<CategoryVm>,
    pub questions: Vec<QuestionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryVm {
    pub slug: String,
    pub icon: String,
    pub color: String,
    pub question: String,
    pub rows: Vec<MarkRowVm>,
}

/// One lesson's radio group inside a category table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkRowVm {
    pub lesson_title: String,
    pub field_name: String,
    pub options: Vec<MarkOptionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkOptionVm {
    pub value: String,
    /// How many icons the option shows; 0 for "no mark".
    pub level: u8,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub field_name: String,
    pub prompt: String,
    pub answer: String,
    pub private: bool,
}

/// Path of the form page that belongs to `token`.
#[must_use]
pub fn form_path(token: &Token) -> String {
    format!("/form/{token}/")
}

/// Map the catalog and a respondent's stored answers into the page model.
#[must_use]
pub fn map_form_page(layout: &FormLayout, token: &Token, sheet: &ResponseSheet) -> FormPageVm {
    let categories = layout
        .categories()
        .iter()
        .map(|category| map_category(layout, category, sheet))
        .collect();

    let questions = SimpleQuestion::ALL
        .into_iter()
        .map(|question| QuestionVm {
            field_name: FieldKey::Question(question).field_name(),
            prompt: question.prompt().to_owned(),
            answer: sheet.answer(question).unwrap_or_default().to_owned(),
            private: question.is_private(),
        })
        .collect();

    FormPageVm {
        token: token.to_string(),
        action: form_path(token),
        saved: !sheet.is_empty(),
        categories,
        questions,
    }
}

fn map_category(layout: &FormLayout, category: &Category, sheet: &ResponseSheet) -> CategoryVm {
    let rows = layout
        .lessons()
        .iter()
        .map(|lesson| {
            let key = MarkKey::new(category.slug(), lesson.slug());
            let stored = sheet.mark(&key);
            MarkRowVm {
                lesson_title: lesson.title().to_owned(),
                field_name: FieldKey::Mark(key).field_name(),
                options: mark_options(stored),
            }
        })
        .collect();

    CategoryVm {
        slug: category.slug().to_owned(),
        icon: category.icon().to_owned(),
        color: category.color().to_owned(),
        question: category.question().to_owned(),
        rows,
    }
}

fn mark_options(stored: Option<&str>) -> Vec<MarkOptionVm> {
    let none_checked = stored.is_none_or(str::is_empty);
    let mut options = Vec::with_capacity(usize::from(MAX_MARK) + 1);
    options.push(MarkOptionVm {
        value: NO_MARK.to_owned(),
        level: 0,
        checked: none_checked,
    });
    for level in 1..=MAX_MARK {
        let value = level.to_string();
        let checked = stored == Some(value.as_str());
        options.push(MarkOptionVm {
            value,
            level,
            checked,
        });
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    use feedback_core::model::{LessonFeedback, SimpleFeedback, seed_categories, seed_lessons};
    use feedback_core::time::fixed_now;

    fn layout() -> FormLayout {
        FormLayout::new(seed_categories(), seed_lessons()).unwrap()
    }

    #[test]
    fn empty_sheet_maps_to_blank_form() {
        let token = Token::parse("blank1").unwrap();
        let page = map_form_page(&layout(), &token, &ResponseSheet::default());

        assert_eq!(page.action, "/form/blank1/");
        assert!(!page.saved);
        assert_eq!(page.categories.len(), 3);
        assert!(page.categories.iter().all(|c| c.rows.len() == 13));
        let row = &page.categories[0].rows[0];
        assert_eq!(row.options.len(), 10);
        assert!(row.options[0].checked);
        assert!(row.options[1..].iter().all(|o| !o.checked));
        assert!(page.questions.iter().all(|q| q.answer.is_empty()));
    }

    #[test]
    fn stored_answers_prefill_the_form() {
        let token = Token::parse("filled1").unwrap();
        let sheet = ResponseSheet::from_records(
            &[LessonFeedback {
                token: token.clone(),
                category: "topic".into(),
                lesson: "numpy".into(),
                mark: Some("7".into()),
                updated_at: fixed_now(),
            }],
            &[SimpleFeedback {
                token: token.clone(),
                question: "wishes".into(),
                answer: Some("More exercises".into()),
                updated_at: fixed_now(),
            }],
        );

        let page = map_form_page(&layout(), &token, &sheet);
        assert!(page.saved);

        let topic = page.categories.iter().find(|c| c.slug == "topic").unwrap();
        let row = topic
            .rows
            .iter()
            .find(|r| r.field_name == "mark.topic.numpy")
            .unwrap();
        let checked: Vec<_> = row.options.iter().filter(|o| o.checked).collect();
        assert_eq!(checked.len(), 1);
        assert_eq!(checked[0].value, "7");
        assert_eq!(checked[0].level, 7);

        let wishes = page
            .questions
            .iter()
            .find(|q| q.field_name == "question.wishes")
            .unwrap();
        assert_eq!(wishes.answer, "More exercises");
    }

    #[test]
    fn only_the_secret_question_is_private() {
        let token = Token::parse("priv01").unwrap();
        let page = map_form_page(&layout(), &token, &ResponseSheet::default());
        let private: Vec<_> = page.questions.iter().filter(|q| q.private).collect();
        assert_eq!(private.len(), 1);
        assert_eq!(private[0].field_name, "question.secret");
    }
}
