use std::collections::HashSet;

use feedback_core::model::{MarkKey, SimpleQuestion, Token, seed_categories, seed_lessons};
use feedback_core::time::fixed_now;
use services::{AppServices, Clock, hash_token};
use storage::repository::{CatalogRepository, Storage};

fn pair(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

#[tokio::test]
async fn feedback_flow_submit_resubmit_export() {
    let storage = Storage::sqlite("sqlite:file:memdb_feedback_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let services = AppServices::from_storage(&storage, Clock::fixed(fixed_now()))
        .await
        .expect("bootstrap");
    assert!(services.seeded());

    let feedback = services.feedback();
    let token = Token::parse("flowToken1").unwrap();

    feedback
        .submit(
            &token,
            vec![
                pair("mark.like.cython", "3"),
                pair("question.best", "Cython"),
                pair("question.secret", "psst"),
            ],
        )
        .await
        .expect("first submit");
    feedback
        .submit(
            &token,
            vec![
                pair("mark.like.cython", "9"),
                pair("question.best", "Cython"),
                pair("question.secret", "psst"),
            ],
        )
        .await
        .expect("second submit");

    let sheet = feedback.load(&token).await.expect("load");
    assert_eq!(sheet.mark(&MarkKey::new("like", "cython")), Some("9"));
    assert_eq!(sheet.answer(SimpleQuestion::Secret), Some("psst"));

    let rows = services.export().rows().await.expect("export");
    let cython: Vec<_> = rows
        .iter()
        .filter(|r| r.lesson == "cython" && r.category == "like")
        .collect();
    assert_eq!(cython.len(), 1);
    assert_eq!(cython[0].answer, "9");
    assert!(rows.iter().all(|r| r.user_hash == hash_token(&token)));
    assert!(rows.iter().all(|r| r.lesson != "secret"));

    let csv = String::from_utf8(services.export().csv().await.expect("csv")).unwrap();
    assert!(!csv.contains("flowToken1"));
    assert!(!csv.contains("psst"));
}

#[tokio::test]
async fn bootstrap_fresh_file_store_then_noop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("fresh.sqlite3").display()
    );

    let first = AppServices::new_sqlite(&url, Clock::default_clock())
        .await
        .expect("first start");
    assert!(first.seeded());
    let layout = first.feedback().layout().clone();
    assert_eq!(layout.categories(), seed_categories().as_slice());
    assert_eq!(layout.lessons(), seed_lessons().as_slice());
    let orders: HashSet<_> = layout.lessons().iter().map(|l| l.order()).collect();
    assert_eq!(orders.len(), layout.lessons().len());
    drop(first);

    let second = AppServices::new_sqlite(&url, Clock::default_clock())
        .await
        .expect("second start");
    assert!(!second.seeded());

    let storage = Storage::sqlite(&url).await.expect("reopen");
    assert_eq!(storage.catalog.list_categories().await.unwrap().len(), 3);
    assert_eq!(storage.catalog.list_lessons().await.unwrap().len(), 13);
}
