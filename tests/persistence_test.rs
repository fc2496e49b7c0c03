//! Integration tests for the current-state slot and named sessions,
//! against both the in-memory and the file-backed store.

use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use dsviz::application::services::{PersistenceService, CURRENT_STATE_KEY};
use dsviz::application::ApplicationError;
use dsviz::domain::{Element, Structures};
use dsviz::infrastructure::store::{JsonFileStore, MemoryStore};
use dsviz::infrastructure::traits::KeyValueStore;
use dsviz::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn populated() -> Structures {
    let mut s = Structures::new();
    s.array.push(Element::from(1.0));
    s.array.push(Element::from("two"));
    s.stack.push(Element::from("a"));
    s.stack.push(Element::from("b"));
    s.queue.enqueue(Element::from(7.0));
    s.linked_list.add(Element::from("x"));
    s.linked_list.add(Element::from("y"));
    for v in [50.0, 30.0, 70.0, 20.0, 40.0, 60.0, 80.0, 35.0] {
        s.binary_tree.insert(v);
    }
    s
}

#[rstest]
fn given_memory_store_when_saving_current_then_reload_identical(populated: Structures) {
    let service = PersistenceService::new(Arc::new(MemoryStore::new()));

    service.save_current(&populated).unwrap();
    let loaded = service.try_load_current().unwrap().unwrap();

    assert_eq!(loaded, populated);
    assert!(loaded.binary_tree.same_shape(&populated.binary_tree));
}

#[rstest]
fn given_file_store_when_saving_current_then_json_file_written(populated: Structures) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let service = PersistenceService::new(store.clone());

    service.save_current(&populated).unwrap();

    assert!(dir.path().join("ds_current_state.json").exists());
    let raw = store.get(CURRENT_STATE_KEY).unwrap().unwrap();
    assert_eq!(raw["stack"], serde_json::json!(["a", "b"]));
    assert_eq!(raw["binaryTree"]["value"], serde_json::json!(50.0));

    let reopened = PersistenceService::new(Arc::new(JsonFileStore::new(dir.path())));
    assert_eq!(reopened.load_current(), populated);
}

#[rstest]
fn given_nothing_saved_when_loading_current_then_empty_structures() {
    let service = PersistenceService::new(Arc::new(MemoryStore::new()));

    assert!(service.try_load_current().unwrap().is_none());
    assert!(service.load_current().is_empty());
}

#[rstest]
fn given_corrupt_current_state_when_loading_then_falls_back_to_empty() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(CURRENT_STATE_KEY, &serde_json::json!({ "stack": 42 }))
        .unwrap();
    let service = PersistenceService::new(store);

    assert!(service.try_load_current().is_err());
    assert!(service.load_current().is_empty());
}

#[rstest]
fn given_sessions_when_listing_then_sorted_by_name(populated: Structures) {
    let service = PersistenceService::new(Arc::new(MemoryStore::new()));

    service.save_session("zeta", &populated).unwrap();
    service.save_session("alpha", &Structures::new()).unwrap();
    service.save_session("mid", &populated).unwrap();

    let names: Vec<String> = service
        .list_sessions()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[rstest]
fn given_saved_session_when_loading_then_structures_restored(populated: Structures) {
    let dir = TempDir::new().unwrap();
    let service = PersistenceService::new(Arc::new(JsonFileStore::new(dir.path())));

    service.save_session("lesson 1", &populated).unwrap();
    let restored = service.load_session("lesson 1").unwrap();

    assert_eq!(restored, populated);
}

#[rstest]
fn given_existing_name_when_saving_session_then_overwritten(populated: Structures) {
    let service = PersistenceService::new(Arc::new(MemoryStore::new()));

    service.save_session("s", &populated).unwrap();
    service.save_session("s", &Structures::new()).unwrap();

    assert_eq!(service.list_sessions().unwrap().len(), 1);
    assert!(service.load_session("s").unwrap().is_empty());
}

#[rstest]
fn given_unknown_session_when_loading_then_not_found() {
    let service = PersistenceService::new(Arc::new(MemoryStore::new()));

    let err = service.load_session("missing").unwrap_err();

    assert!(matches!(err, ApplicationError::SessionNotFound(ref n) if n == "missing"));
}

#[rstest]
fn given_session_when_deleting_then_gone_and_second_delete_reports_absent(populated: Structures) {
    let service = PersistenceService::new(Arc::new(MemoryStore::new()));
    service.save_session("tmp", &populated).unwrap();

    assert!(service.delete_session("tmp").unwrap());
    assert!(!service.delete_session("tmp").unwrap());
    assert!(service.list_sessions().unwrap().is_empty());
}

#[rstest]
fn given_tree_deeper_than_json_nesting_limit_when_reloading_then_shape_preserved(
    populated: Structures,
) {
    let dir = TempDir::new().unwrap();
    let mut deep = populated;
    deep.binary_tree = Default::default();
    for v in 1..=500 {
        deep.binary_tree.insert(f64::from(v));
    }
    assert_eq!(deep.binary_tree.depth(), 500);
    let service = PersistenceService::new(Arc::new(JsonFileStore::new(dir.path())));

    service.save_current(&deep).unwrap();
    service.save_session("chain", &deep).unwrap();

    let reopened = PersistenceService::new(Arc::new(JsonFileStore::new(dir.path())));
    let current = reopened.try_load_current().unwrap().unwrap();
    assert!(current.binary_tree.same_shape(&deep.binary_tree));
    assert_eq!(current.stack, deep.stack);
    assert_eq!(reopened.load_current(), deep);

    let session = reopened.load_session("chain").unwrap();
    assert!(session.binary_tree.same_shape(&deep.binary_tree));
    assert_eq!(session.binary_tree.depth(), 500);

    // the sessions map stays writable with the deep session in it
    reopened.save_session("after", &Structures::new()).unwrap();
    let names: Vec<String> = reopened
        .list_sessions()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["after", "chain"]);
}

#[rstest]
#[case("")]
#[case("   ")]
fn given_blank_name_when_saving_session_then_rejected(#[case] name: &str) {
    let service = PersistenceService::new(Arc::new(MemoryStore::new()));

    let err = service.save_session(name, &Structures::new()).unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(_)));
}
