//! Backend selection from settings.

use rstest::rstest;

use todo_service::{open_store, Backend, KvEngine, Settings, StoreKind, TodoStore};

#[rstest]
#[case(StoreKind::Relational, KvEngine::Sqlite, Backend::Relational)]
#[case(StoreKind::KeyValue, KvEngine::Sqlite, Backend::KeyValue)]
#[case(StoreKind::KeyValue, KvEngine::Memory, Backend::KeyValue)]
#[tokio::test]
async fn settings_pick_the_backend(#[case] kind: StoreKind, #[case] engine: KvEngine, #[case] expected: Backend) {
    let settings = Settings {
        database_url: "sqlite::memory:".into(),
        store: kind,
        kv_engine: engine,
        ..Settings::default()
    };
    let store = open_store(&settings).await.unwrap();
    assert_eq!(store.backend(), expected);

    let todo = store.create("buy milk").await.unwrap();
    assert_eq!(store.list().await.unwrap(), vec![todo]);
    store.ping().await.unwrap();
}

#[tokio::test]
async fn file_backed_relational_store_persists_across_reopen() {
    let path = std::env::temp_dir().join(format!("todo-service-{}.db", uuid::Uuid::new_v4()));
    let settings = Settings {
        database_url: format!("sqlite://{}?mode=rwc", path.display()),
        ..Settings::default()
    };

    let first = open_store(&settings).await.unwrap();
    let created = first.create("persisted").await.unwrap();
    drop(first);

    let second = open_store(&settings).await.unwrap();
    assert_eq!(second.get(&created.id).await.unwrap(), Some(created));

    let _ = std::fs::remove_file(&path);
}
