use dioxus::prelude::*;
use quiz_core::model::{QuestionId, QuizId};
use storage::{CatalogDocument, InMemoryCatalog, Storage};

use super::quiz_take::QuizTakeIntent;
use super::test_harness::{ViewHarness, ViewKind, setup_view_harness};

fn sample_storage() -> Storage {
    let doc = CatalogDocument::sample().expect("sample catalog");
    Storage::with_catalog(InMemoryCatalog::from_document(doc))
}

async fn settle(harness: &mut ViewHarness) {
    for _ in 0..3 {
        harness.drive_async().await;
    }
}

fn dispatch(harness: &ViewHarness, intent: QuizTakeIntent) {
    let handles = harness.take_handles.clone().expect("take handles");
    harness
        .dom
        .in_scope(ScopeId::ROOT, || handles.dispatch().call(intent));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_list_smoke_renders_status_and_score() {
    let storage = sample_storage();
    storage
        .records
        .set("quiz:1:result", r#"{"correctCount":2,"total":3}"#)
        .await
        .expect("seed result");
    storage
        .records
        .set("quiz:2:state", r#"{"page":1,"answers":{}}"#)
        .await
        .expect("seed state");

    let mut harness = setup_view_harness(ViewKind::QuizList, storage);
    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();

    for expected in [
        "Fractions warm-up",
        "Unit 1: Cells",
        "Midterm review (closed)",
        "Submitted",
        "Score: 7/10",
        "Retake",
        "In Progress",
        "Take quiz",
        "Closed",
        "disabled",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_list_smoke_retake_clears_records_then_opens_quiz() {
    let storage = sample_storage();
    storage
        .records
        .set("quiz:1:result", r#"{"correctCount":2,"total":3}"#)
        .await
        .expect("seed result");
    storage
        .records
        .set("quiz:1:state", r#"{"page":2,"answers":{"103":"a"}}"#)
        .await
        .expect("seed state");

    let mut harness = setup_view_harness(ViewKind::QuizList, storage);
    harness.rebuild();
    settle(&mut harness).await;
    assert!(harness.render().contains("Retake"));

    let handles = harness.list_handles.clone().expect("list handles");
    harness
        .dom
        .in_scope(ScopeId::ROOT, || handles.take(QuizId::new(1)).call(()));
    settle(&mut harness).await;
    settle(&mut harness).await;

    for key in ["quiz:1:result", "quiz:1:state"] {
        let value = harness.storage.records.get(key).await.expect("read key");
        assert_eq!(value, None, "{key} survived the retake");
    }
    let html = harness.render();
    assert!(html.contains("Question 1 of 3"), "missing fresh attempt in {html}");
    assert!(!html.contains("quiz-option--selected"), "stale selection in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_take_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::QuizTake(1), sample_storage());
    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();

    assert!(html.contains("Question 1 of 3"), "missing progress in {html}");
    assert!(html.contains("What is 1/2 + 1/4?"), "missing question in {html}");
    assert!(html.contains("Next"), "missing next in {html}");
    assert!(!html.contains("quiz-option--selected"), "unexpected selection in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_take_smoke_resumes_saved_page() {
    let storage = sample_storage();
    storage
        .records
        .set("quiz:1:state", r#"{"page":1,"answers":{"102":"b"}}"#)
        .await
        .expect("seed state");

    let mut harness = setup_view_harness(ViewKind::QuizTake(1), storage);
    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();

    assert!(html.contains("Question 2 of 3"), "missing progress in {html}");
    assert!(html.contains("Which fraction equals 0.2?"), "missing question in {html}");
    assert!(html.contains("quiz-option--selected"), "missing selection in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_take_smoke_rejects_closed_quiz() {
    let mut harness = setup_view_harness(ViewKind::QuizTake(3), sample_storage());
    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();

    assert!(html.contains("This quiz is closed."), "missing error in {html}");
    assert!(html.contains("Back to quizzes"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_take_smoke_submit_shows_score() {
    let mut harness = setup_view_harness(ViewKind::QuizTake(1), sample_storage());
    harness.rebuild();
    settle(&mut harness).await;

    let steps = [
        QuizTakeIntent::Select {
            question_id: QuestionId::new(101),
            key: "a".into(),
        },
        QuizTakeIntent::Next,
        QuizTakeIntent::Select {
            question_id: QuestionId::new(102),
            key: "b".into(),
        },
        QuizTakeIntent::Next,
        QuizTakeIntent::Submit,
    ];
    for step in steps {
        dispatch(&harness, step);
        settle(&mut harness).await;
    }

    let html = harness.render();
    assert!(html.contains("Score: 7/10"), "missing score in {html}");
    assert!(!html.contains("Submit"), "submit still offered in {html}");

    let result = harness
        .storage
        .records
        .get("quiz:1:result")
        .await
        .expect("read result");
    assert_eq!(result.as_deref(), Some(r#"{"correctCount":2,"total":3}"#));
    let state = harness
        .storage
        .records
        .get("quiz:1:state")
        .await
        .expect("read state");
    assert_eq!(state, None);
}
