use std::collections::HashSet;

use feedback_core::model::{
    LessonFeedback, SimpleFeedback, Token, seed_categories, seed_lessons,
};
use feedback_core::time::fixed_now;
use storage::repository::{CatalogRepository, FeedbackRepository, Storage, StorageError};
use storage::sqlite::SqliteRepository;

async fn seeded_repo(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!(
        "sqlite:file:{name}?mode=memory&cache=shared"
    ))
    .await
    .expect("connect");
    repo.migrate().await.expect("migrate");
    repo.seed_catalog(&seed_categories(), &seed_lessons())
        .await
        .expect("seed");
    repo
}

fn mark(token: &Token, category: &str, lesson: &str, value: Option<&str>) -> LessonFeedback {
    LessonFeedback {
        token: token.clone(),
        category: category.into(),
        lesson: lesson.into(),
        mark: value.map(Into::into),
        updated_at: fixed_now(),
    }
}

fn answer(token: &Token, question: &str, value: &str) -> SimpleFeedback {
    SimpleFeedback {
        token: token.clone(),
        question: question.into(),
        answer: Some(value.into()),
        updated_at: fixed_now(),
    }
}

#[tokio::test]
async fn sqlite_seed_catalog_is_ordered_and_idempotent() {
    let repo = seeded_repo("memdb_seed_idempotent").await;

    let again = repo
        .seed_catalog(&seed_categories(), &seed_lessons())
        .await
        .expect("reseed");
    assert!(!again);

    let categories = repo.list_categories().await.expect("categories");
    let lessons = repo.list_lessons().await.expect("lessons");
    assert_eq!(categories, seed_categories());
    assert_eq!(lessons, seed_lessons());

    let orders: HashSet<_> = lessons.iter().map(|l| l.order()).collect();
    assert_eq!(orders.len(), lessons.len());
}

#[tokio::test]
async fn sqlite_resubmission_keeps_latest_mark_only() {
    let repo = seeded_repo("memdb_resubmit").await;
    let token = Token::parse("resub1").unwrap();

    repo.save_feedback(
        &[mark(&token, "like", "numpy", Some("3"))],
        &[answer(&token, "best", "first")],
    )
    .await
    .expect("first save");
    repo.save_feedback(
        &[mark(&token, "like", "numpy", Some("9"))],
        &[answer(&token, "best", "second")],
    )
    .await
    .expect("second save");

    let marks = repo.lesson_feedback_for(&token).await.expect("marks");
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].mark.as_deref(), Some("9"));

    let answers = repo.simple_feedback_for(&token).await.expect("answers");
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].answer.as_deref(), Some("second"));
    assert_eq!(answers[0].updated_at, fixed_now());
}

#[tokio::test]
async fn sqlite_null_marks_round_trip() {
    let repo = seeded_repo("memdb_null_marks").await;
    let token = Token::parse("nulls1").unwrap();

    repo.save_feedback(
        &[
            mark(&token, "topic", "pandas", None),
            mark(&token, "learn", "pandas", Some("")),
        ],
        &[],
    )
    .await
    .expect("save");

    let mut rows = repo.all_lesson_feedback().await.expect("rows");
    rows.sort_by(|a, b| a.category.cmp(&b.category));
    assert_eq!(rows[0].category, "learn");
    assert_eq!(rows[0].mark.as_deref(), Some(""));
    assert_eq!(rows[1].category, "topic");
    assert_eq!(rows[1].mark, None);
}

#[tokio::test]
async fn sqlite_failed_submission_writes_nothing() {
    let repo = seeded_repo("memdb_atomic").await;
    let token = Token::parse("atomic").unwrap();

    let err = repo
        .save_feedback(
            &[
                mark(&token, "like", "numpy", Some("5")),
                mark(&token, "no-such-category", "numpy", Some("5")),
            ],
            &[answer(&token, "best", "x")],
        )
        .await
        .expect_err("foreign key violation");
    assert!(matches!(err, StorageError::Connection(_)));

    assert!(repo.lesson_feedback_for(&token).await.unwrap().is_empty());
    assert!(repo.simple_feedback_for(&token).await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_file_store_persists_across_connections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("feedback.sqlite3");
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let token = Token::parse("persist").unwrap();

    {
        let storage = Storage::sqlite(&url).await.expect("open");
        assert!(
            storage
                .catalog
                .seed_catalog(&seed_categories(), &seed_lessons())
                .await
                .unwrap()
        );
        storage
            .feedback
            .save_feedback(&[mark(&token, "like", "magie", Some("7"))], &[])
            .await
            .unwrap();
    }

    let storage = Storage::sqlite(&url).await.expect("reopen");
    assert!(
        !storage
            .catalog
            .seed_catalog(&seed_categories(), &seed_lessons())
            .await
            .unwrap()
    );
    assert_eq!(storage.catalog.list_lessons().await.unwrap().len(), 13);
    let rows = storage.feedback.lesson_feedback_for(&token).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].mark.as_deref(), Some("7"));
}
