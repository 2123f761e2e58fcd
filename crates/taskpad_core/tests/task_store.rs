use taskpad_core::kv::{open_store, open_store_in_memory, KvStore};
use taskpad_core::{filter, FilterMode, SqliteKvStore, StoreError, TaskStore, TASKS_KEY};
use uuid::Uuid;

#[test]
fn create_appends_a_pending_task() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    let task = store.create("Buy milk").unwrap().unwrap();
    assert_eq!(store.len(), 1);
    assert!(!task.id.is_nil());
    assert_eq!(task.text, "Buy milk");
    assert!(!task.completed);
    assert_eq!(store.all()[0], task);
}

#[test]
fn create_trims_surrounding_whitespace() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    let task = store.create("  water the plants \n").unwrap().unwrap();
    assert_eq!(task.text, "water the plants");
}

#[test]
fn create_with_empty_or_whitespace_text_is_a_no_op() {
    let conn = open_store_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    assert!(store.create("").unwrap().is_none());
    assert!(store.create("   ").unwrap().is_none());
    assert!(store.create("\t\n").unwrap().is_none());
    assert_eq!(store.len(), 0);
    // Nothing was persisted either.
    assert!(kv.get(TASKS_KEY).unwrap().is_none());
}

#[test]
fn toggle_flips_and_double_toggle_restores() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    let task = store.create("call the dentist").unwrap().unwrap();
    assert_eq!(store.toggle(task.id).unwrap(), Some(true));
    assert!(store.all()[0].completed);

    assert_eq!(store.toggle(task.id).unwrap(), Some(false));
    assert!(!store.all()[0].completed);
}

#[test]
fn toggle_unknown_id_is_a_no_op() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    store.create("stay put").unwrap();
    assert_eq!(store.toggle(Uuid::new_v4()).unwrap(), None);
    assert!(!store.all()[0].completed);
}

#[test]
fn edit_replaces_text_and_trims() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    let task = store.create("draft").unwrap().unwrap();
    assert!(store.edit(task.id, "  final wording ").unwrap());
    assert_eq!(store.all()[0].text, "final wording");
    assert_eq!(store.all()[0].id, task.id);
}

#[test]
fn edit_with_empty_text_keeps_prior_value() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    let task = store.create("keep me").unwrap().unwrap();
    assert!(!store.edit(task.id, "   ").unwrap());
    assert_eq!(store.all()[0].text, "keep me");
}

#[test]
fn edit_unknown_id_is_a_no_op() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    store.create("only task").unwrap();
    assert!(!store.edit(Uuid::new_v4(), "new text").unwrap());
    assert_eq!(store.all()[0].text, "only task");
}

#[test]
fn delete_removes_then_repeat_is_a_no_op() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    let task = store.create("short lived").unwrap().unwrap();
    assert!(store.delete(task.id).unwrap());
    assert!(store.is_empty());

    assert!(!store.delete(task.id).unwrap());
    assert!(store.is_empty());
}

#[test]
fn every_mutation_survives_a_reload() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    let first = store.create("first").unwrap().unwrap();
    let second = store.create("second").unwrap().unwrap();
    let third = store.create("third").unwrap().unwrap();
    store.toggle(second.id).unwrap();
    store.edit(third.id, "third, revised").unwrap();
    store.delete(first.id).unwrap();

    let reloaded = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();
    assert_eq!(reloaded.all(), store.all());
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.all()[0].id, second.id);
    assert!(reloaded.all()[0].completed);
    assert_eq!(reloaded.all()[1].text, "third, revised");
}

#[test]
fn reload_preserves_insertion_order_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskpad.db");

    let texts = ["one", "two", "three", "four"];
    {
        let conn = open_store(&path).unwrap();
        let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();
        for text in texts {
            store.create(text).unwrap();
        }
    }

    let conn = open_store(&path).unwrap();
    let store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();
    let loaded: Vec<&str> = store.all().iter().map(|task| task.text.as_str()).collect();
    assert_eq!(loaded, texts);
}

#[test]
fn corrupt_payload_recovers_empty_and_clears_the_key() {
    let conn = open_store_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    kv.set(TASKS_KEY, "{ not a task list").unwrap();

    let store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();
    assert!(store.is_empty());
    assert!(kv.get(TASKS_KEY).unwrap().is_none());
}

#[test]
fn payload_with_invalid_record_is_treated_as_corrupt() {
    let conn = open_store_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    kv.set(
        TASKS_KEY,
        r#"[{"id":"11111111-2222-4333-8444-555555555555","text":"   ","completed":false,"created_at":0}]"#,
    )
    .unwrap();

    let store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();
    assert!(store.is_empty());
    assert!(kv.get(TASKS_KEY).unwrap().is_none());
}

#[test]
fn payload_with_duplicate_ids_is_treated_as_corrupt() {
    let conn = open_store_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    kv.set(
        TASKS_KEY,
        r#"[
            {"id":"11111111-2222-4333-8444-555555555555","text":"a","completed":false,"created_at":1},
            {"id":"11111111-2222-4333-8444-555555555555","text":"b","completed":true,"created_at":2}
        ]"#,
    )
    .unwrap();

    let store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();
    assert!(store.is_empty());
}

#[test]
fn duplicate_policy_rejects_case_insensitive_create() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap())
        .unwrap()
        .with_unique_text(true);

    store.create("Buy milk").unwrap();
    let err = store.create("buy milk").unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { text } if text == "buy milk"));
    assert_eq!(store.len(), 1);
}

#[test]
fn duplicate_policy_rejects_edit_into_existing_text() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap())
        .unwrap()
        .with_unique_text(true);

    store.create("walk the dog").unwrap();
    let task = store.create("feed the cat").unwrap().unwrap();

    let err = store.edit(task.id, "Walk The Dog").unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { .. }));
    assert_eq!(store.all()[1].text, "feed the cat");
}

#[test]
fn duplicate_policy_excludes_the_task_itself_on_edit() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap())
        .unwrap()
        .with_unique_text(true);

    let task = store.create("same text").unwrap().unwrap();
    assert!(store.edit(task.id, "Same Text").unwrap());
    assert_eq!(store.all()[0].text, "Same Text");
}

#[test]
fn duplicates_are_allowed_without_the_policy() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    store.create("twice").unwrap();
    store.create("twice").unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn buy_milk_scenario_matches_projection_expectations() {
    let conn = open_store_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvStore::try_new(&conn).unwrap()).unwrap();

    let task = store.create("Buy milk").unwrap().unwrap();
    assert_eq!(store.len(), 1);
    assert!(!store.all()[0].completed);

    store.toggle(task.id).unwrap();
    assert!(store.all()[0].completed);

    let completed = filter::apply(store.all(), FilterMode::Completed);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, task.id);
    assert!(filter::apply(store.all(), FilterMode::Pending).is_empty());
}
