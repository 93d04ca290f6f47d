use cardboardapp::model::CardStatus;
use cardboardapp::store::backend::{Collection, DocumentBackend, Query};
use cardboardapp::store::fs_backend::FsBackend;
use cardboardapp::store::memory::FileStore;
use cardboardapp::store::DataStore;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

fn doc(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_documents_land_at_collection_paths() {
    let (dir, backend) = setup();
    backend
        .set(&Collection::Spaces, "s1", &doc(json!({"name": "Math"})))
        .unwrap();
    backend
        .set(&Collection::Topics, "t1", &doc(json!({"spaceId": "s1"})))
        .unwrap();
    backend
        .set(
            &Collection::flashcards("t1"),
            "c1",
            &doc(json!({"question": "Q"})),
        )
        .unwrap();

    assert!(dir.path().join("spaces/s1.json").is_file());
    assert!(dir.path().join("topics/t1.json").is_file());
    assert!(dir.path().join("topics/t1/flashcards/c1.json").is_file());

    // The flashcards directory next to t1.json is not a topic.
    let topics = backend.list(&Collection::Topics, &Query::all()).unwrap();
    assert_eq!(topics.len(), 1);
}

#[test]
fn test_no_tmp_files_left_behind() {
    let (dir, backend) = setup();
    for i in 0..5 {
        backend
            .set(&Collection::Spaces, &format!("s{}", i), &doc(json!({"order": i})))
            .unwrap();
    }

    for entry in fs::read_dir(dir.path().join("spaces")).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_update_merges_and_missing_update_fails() {
    let (_dir, backend) = setup();
    backend
        .set(&Collection::Spaces, "s1", &doc(json!({"name": "A", "order": 1})))
        .unwrap();
    backend
        .update(&Collection::Spaces, "s1", &doc(json!({"order": 3})))
        .unwrap();

    let stored = backend.get(&Collection::Spaces, "s1").unwrap().unwrap();
    assert_eq!(stored["name"], json!("A"));
    assert_eq!(stored["order"], json!(3));

    let err = backend
        .update(&Collection::Spaces, "nope", &doc(json!({"order": 3})))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_delete_is_idempotent() {
    let (_dir, backend) = setup();
    backend
        .set(&Collection::Spaces, "s1", &doc(json!({})))
        .unwrap();
    backend.delete(&Collection::Spaces, "s1").unwrap();
    backend.delete(&Collection::Spaces, "s1").unwrap();
    assert!(backend.get(&Collection::Spaces, "s1").unwrap().is_none());
}

#[test]
fn test_last_card_delete_removes_topic_card_dir() {
    let (dir, backend) = setup();
    let cards = Collection::Flashcards {
        topic_id: "t1".into(),
    };
    backend.set(&cards, "c1", &doc(json!({}))).unwrap();
    backend.set(&cards, "c2", &doc(json!({}))).unwrap();

    backend.delete(&cards, "c1").unwrap();
    assert!(dir.path().join("topics/t1/flashcards").is_dir());

    backend.delete(&cards, "c2").unwrap();
    assert!(!dir.path().join("topics/t1").exists());
    assert!(dir.path().join("topics").is_dir());
    assert!(backend.list(&cards, &Query::default()).unwrap().is_empty());
}

#[test]
fn test_unsafe_ids_rejected() {
    let (_dir, backend) = setup();
    for id in ["", "..", "../escape", "a/b", ".hidden"] {
        assert!(
            backend.set(&Collection::Spaces, id, &doc(json!({}))).is_err(),
            "id {:?} should be rejected",
            id
        );
    }
}

#[test]
fn test_query_filters_and_orders() {
    let (_dir, backend) = setup();
    for (id, space, order) in [("a", "s1", 2), ("b", "s2", 0), ("c", "s1", 1)] {
        backend
            .set(
                &Collection::Topics,
                id,
                &doc(json!({"spaceId": space, "rank": order})),
            )
            .unwrap();
    }

    let found = backend
        .list(
            &Collection::Topics,
            &Query::where_eq("spaceId", "s1").order_by("rank"),
        )
        .unwrap();
    let ids: Vec<&str> = found.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);
}

#[test]
fn test_legacy_card_files_load_with_defaults() {
    let dir = TempDir::new().unwrap();
    let cards_dir = dir.path().join("topics/t1/flashcards");
    fs::create_dir_all(&cards_dir).unwrap();
    fs::write(
        cards_dir.join("old.json"),
        r#"{"question": "Old?", "answer": "Yes"}"#,
    )
    .unwrap();

    let store = FileStore::open(dir.path().to_path_buf());
    let card = store.get_flashcard("t1", "old").unwrap();
    assert_eq!(card.id, "old");
    assert_eq!(card.topic_id, "t1");
    assert_eq!(card.status, CardStatus::Unset);
    assert!(card.status_missing);
    assert_eq!(card.text_color, "#FFFFFF");
    assert_eq!(card.id_order, 0);
}
