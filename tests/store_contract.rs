//! Record store behavior shared by the relational and key-value variants.

mod common;

use rstest::rstest;

use common::{store_for, unknown_id, Fixture};
use todo_service::{AppError, TodoPatch};

#[rstest]
#[case(Fixture::Relational, "buy milk")]
#[case(Fixture::Relational, "a")]
#[case(Fixture::SqliteKv, "buy milk")]
#[case(Fixture::SqliteKv, "장보기")]
#[case(Fixture::MemoryKv, "buy milk")]
#[tokio::test]
async fn create_then_get_returns_title_not_completed(#[case] fixture: Fixture, #[case] title: &str) {
    let store = store_for(fixture).await;
    let created = store.create(title).await.unwrap();
    assert_eq!(created.title, title);
    assert!(!created.completed);

    let fetched = store.get(&created.id).await.unwrap().expect("todo present");
    assert_eq!(fetched, created);
}

#[rstest]
#[case(Fixture::Relational)]
#[case(Fixture::SqliteKv)]
#[case(Fixture::MemoryKv)]
#[tokio::test]
async fn longest_title_round_trips(#[case] fixture: Fixture) {
    let store = store_for(fixture).await;
    let title = "x".repeat(100);
    let created = store.create(&title).await.unwrap();
    assert_eq!(store.get(&created.id).await.unwrap().unwrap().title, title);
}

#[rstest]
#[case(Fixture::Relational)]
#[case(Fixture::SqliteKv)]
#[case(Fixture::MemoryKv)]
#[tokio::test]
async fn update_of_unknown_id_is_silent_noop(#[case] fixture: Fixture) {
    let store = store_for(fixture).await;
    let id = unknown_id(store.as_ref());
    let patch = TodoPatch {
        title: Some("ghost".into()),
        completed: Some(true),
    };
    store.update(&id, patch).await.unwrap();
    assert!(store.get(&id).await.unwrap().is_none());
    assert!(store.list().await.unwrap().is_empty());
}

#[rstest]
#[case(Fixture::Relational)]
#[case(Fixture::SqliteKv)]
#[case(Fixture::MemoryKv)]
#[tokio::test]
async fn list_reflects_create_and_delete(#[case] fixture: Fixture) {
    let store = store_for(fixture).await;
    let keep = store.create("keep").await.unwrap();
    let drop = store.create("drop").await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&keep));
    assert!(listed.contains(&drop));

    store.delete(&drop.id).await.unwrap();
    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![keep]);
    assert!(store.get(&drop.id).await.unwrap().is_none());
}

#[rstest]
#[case(Fixture::Relational)]
#[case(Fixture::SqliteKv)]
#[case(Fixture::MemoryKv)]
#[tokio::test]
async fn delete_of_absent_id_is_noop(#[case] fixture: Fixture) {
    let store = store_for(fixture).await;
    let todo = store.create("once").await.unwrap();
    store.delete(&todo.id).await.unwrap();
    store.delete(&todo.id).await.unwrap();
    store.delete(&unknown_id(store.as_ref())).await.unwrap();
}

#[rstest]
#[case(Fixture::Relational)]
#[case(Fixture::SqliteKv)]
#[case(Fixture::MemoryKv)]
#[tokio::test]
async fn full_update_overwrites_title_and_flag(#[case] fixture: Fixture) {
    let store = store_for(fixture).await;
    let todo = store.create("buy milk").await.unwrap();
    store
        .update(
            &todo.id,
            TodoPatch {
                title: Some("buy oat milk".into()),
                completed: Some(true),
            },
        )
        .await
        .unwrap();
    let after = store.get(&todo.id).await.unwrap().unwrap();
    assert_eq!(after.id, todo.id);
    assert_eq!(after.title, "buy oat milk");
    assert!(after.completed);
}

#[rstest]
#[case(Fixture::SqliteKv)]
#[case(Fixture::MemoryKv)]
#[tokio::test]
async fn kv_partial_patch_keeps_other_fields(#[case] fixture: Fixture) {
    let store = store_for(fixture).await;
    let todo = store.create("buy milk").await.unwrap();
    store
        .update(
            &todo.id,
            TodoPatch {
                title: None,
                completed: Some(true),
            },
        )
        .await
        .unwrap();
    let after = store.get(&todo.id).await.unwrap().unwrap();
    assert_eq!(after.title, "buy milk");
    assert!(after.completed);
}

#[tokio::test]
async fn relational_update_rejects_partial_patch() {
    let store = store_for(Fixture::Relational).await;
    let todo = store.create("buy milk").await.unwrap();
    let err = store
        .update(
            &todo.id,
            TodoPatch {
                title: None,
                completed: Some(true),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
    assert!(!store.get(&todo.id).await.unwrap().unwrap().completed);
}

#[tokio::test]
async fn relational_ids_increase_and_are_never_reused() {
    let store = store_for(Fixture::Relational).await;
    let mut last = 0i64;
    for i in 0..5 {
        let todo = store.create(&format!("todo {i}")).await.unwrap();
        let todo_service::TodoId::Int(n) = todo.id else {
            panic!("relational ids are integers");
        };
        assert!(n > last, "id {n} not greater than {last}");
        last = n;
        if i % 2 == 0 {
            store.delete(&todo.id).await.unwrap();
        }
    }
    let next = store.create("after deletes").await.unwrap();
    assert_eq!(next.id, todo_service::TodoId::Int(last + 1));
}

#[rstest]
#[case(Fixture::SqliteKv)]
#[case(Fixture::MemoryKv)]
#[tokio::test]
async fn kv_ids_are_unique_uuids(#[case] fixture: Fixture) {
    let store = store_for(fixture).await;
    let mut seen = std::collections::HashSet::new();
    for i in 0..50 {
        let todo = store.create(&format!("todo {i}")).await.unwrap();
        assert!(matches!(todo.id, todo_service::TodoId::Uuid(_)));
        assert!(seen.insert(todo.id));
    }
    assert_eq!(store.list().await.unwrap().len(), 50);
}

#[rstest]
#[case(Fixture::Relational, "1", true)]
#[case(Fixture::Relational, "abc", false)]
#[case(Fixture::SqliteKv, "1", false)]
#[case(Fixture::MemoryKv, "67e55044-10b1-426f-9247-bb680e5fe0c8", true)]
#[case(Fixture::Relational, " 1", false)]
#[case(Fixture::Relational, "+1", false)]
#[case(Fixture::Relational, "01", false)]
#[case(Fixture::MemoryKv, " 67e55044-10b1-426f-9247-bb680e5fe0c8", false)]
#[case(Fixture::MemoryKv, "67E55044-10B1-426F-9247-BB680E5FE0C8", false)]
#[case(Fixture::SqliteKv, "67e5504410b1426f9247bb680e5fe0c8", false)]
#[tokio::test]
async fn parse_id_follows_identity_scheme(#[case] fixture: Fixture, #[case] raw: &str, #[case] ok: bool) {
    let store = store_for(fixture).await;
    assert_eq!(store.parse_id(raw).is_some(), ok);
}

#[rstest]
#[case(Fixture::Relational)]
#[case(Fixture::SqliteKv)]
#[case(Fixture::MemoryKv)]
#[tokio::test]
async fn ping_succeeds_on_open_backend(#[case] fixture: Fixture) {
    store_for(fixture).await.ping().await.unwrap();
}
