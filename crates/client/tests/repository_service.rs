//! End-to-end tests of the repository services over the in-memory
//! backend.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use opsboard_client::repository::{
    InMemoryRepository, InMemoryRepositoryInitializer, Repository, RepositoryServiceEvent,
    SharedClientHandle, SharedClientService, StoredRepositoryItem,
};
use opsboard_client::services::{
    UserRepositoryItem, UserRepositoryService, WorkspaceRepositoryItem,
    WorkspaceRepositoryService,
};
use opsboard_domain::{User, Workspace};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("opsboard_client=debug")
        .with_test_writer()
        .try_init();
}

async fn ready_shared_client() -> Arc<SharedClientService<()>> {
    let shared_client = Arc::new(SharedClientService::new());
    shared_client
        .start(async { Ok::<_, Infallible>(()) })
        .await
        .unwrap();
    shared_client
}

struct WorkspaceFixture {
    service: WorkspaceRepositoryService<()>,
    backend: Arc<InMemoryRepository>,
}

async fn workspace_fixture() -> WorkspaceFixture {
    init_tracing();
    let backend = Arc::new(InMemoryRepository::new());
    let service = WorkspaceRepositoryService::new(
        ready_shared_client().await,
        Arc::new(InMemoryRepositoryInitializer::new(Arc::clone(&backend))),
    );
    service.initialize().await.unwrap();
    WorkspaceFixture { service, backend }
}

async fn user_fixture() -> UserRepositoryService<()> {
    init_tracing();
    let backend = Arc::new(InMemoryRepository::new());
    let service = UserRepositoryService::new(
        ready_shared_client().await,
        Arc::new(InMemoryRepositoryInitializer::new(backend)),
    );
    service.initialize().await.unwrap();
    service
}

fn workspace_item(id: &str, name: &str) -> WorkspaceRepositoryItem {
    WorkspaceRepositoryItem::new(id, Workspace::new(id, name).unwrap())
}

fn user_item(id: &str, workspace_id: &str, email: &str) -> UserRepositoryItem {
    UserRepositoryItem::new(id, User::new(id, workspace_id, email, "Test User").unwrap())
}

#[tokio::test]
async fn saved_workspace_is_retrievable_by_id() {
    let fixture = workspace_fixture().await;
    fixture
        .service
        .save_workspace(&workspace_item("w1", "Acme"))
        .await
        .unwrap();

    let found = fixture
        .service
        .get_workspace_by_id("w1")
        .await
        .unwrap()
        .expect("workspace should exist");
    assert_eq!(found.target().name, "Acme");
}

#[tokio::test]
async fn save_is_an_upsert_by_id() {
    let fixture = workspace_fixture().await;
    fixture
        .service
        .save_workspace(&workspace_item("w1", "Acme"))
        .await
        .unwrap();
    fixture
        .service
        .save_workspace(&workspace_item("w1", "Acme Renamed"))
        .await
        .unwrap();

    let all = fixture.service.get_all_workspaces().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].target().name, "Acme Renamed");
}

#[tokio::test]
async fn save_returns_exactly_what_was_persisted() {
    let fixture = workspace_fixture().await;
    let item = workspace_item("w1", "Acme");
    let saved = fixture.service.save_workspace(&item).await.unwrap();
    assert_eq!(saved, item);
}

#[tokio::test]
async fn get_some_omits_unknown_ids() {
    let fixture = workspace_fixture().await;
    fixture
        .service
        .save_workspace(&workspace_item("w1", "Acme"))
        .await
        .unwrap();

    let found = fixture
        .service
        .get_some_workspaces(vec!["w1".to_string(), "missing".to_string()])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), "w1");
}

#[tokio::test]
async fn missing_workspace_is_absent_not_an_error() {
    let fixture = workspace_fixture().await;
    assert!(fixture
        .service
        .get_workspace_by_id("nope")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn email_lookup_is_case_insensitive() {
    let service = user_fixture().await;
    service
        .save_user(&user_item("u1", "w1", "Foo@Example.com"))
        .await
        .unwrap();

    let found = service
        .get_all_users_by_email("foo@example.com")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), "u1");

    // The query side folds case too.
    let found = service
        .get_all_users_by_email("FOO@EXAMPLE.COM")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn deleting_a_workspaces_users_spares_other_workspaces() {
    let service = user_fixture().await;
    for id in ["u1", "u2", "u3"] {
        service
            .save_user(&user_item(id, "w1", &format!("{id}@example.com")))
            .await
            .unwrap();
    }
    service
        .save_user(&user_item("u4", "w2", "u4@example.com"))
        .await
        .unwrap();

    service.delete_users_by_workspace_id("w1").await.unwrap();

    let remaining = service.get_all_users().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), "u4");
}

#[tokio::test]
async fn delete_by_ids_is_idempotent() {
    let fixture = workspace_fixture().await;
    fixture
        .service
        .save_workspace(&workspace_item("w1", "Acme"))
        .await
        .unwrap();

    let ids = vec!["w1".to_string()];
    fixture
        .service
        .delete_some_workspaces(ids.clone())
        .await
        .unwrap();
    fixture.service.delete_some_workspaces(ids).await.unwrap();
    assert!(fixture.service.get_all_workspaces().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_stored_record_fails_get_all_with_its_id() {
    let fixture = workspace_fixture().await;
    fixture
        .service
        .save_workspace(&workspace_item("w1", "Acme"))
        .await
        .unwrap();
    // Slip a record with an unparseable payload straight into the
    // backend, bypassing the codec.
    fixture
        .backend
        .update_or_create(StoredRepositoryItem::new("w-broken", "not json at all"))
        .await
        .unwrap();

    let error = fixture.service.get_all_workspaces().await.unwrap_err();
    assert!(error.is_decode());
    assert!(error.to_string().contains("w-broken"));
}

#[tokio::test]
async fn operations_issued_during_startup_complete_once_ready() {
    init_tracing();
    let backend = Arc::new(InMemoryRepository::new());
    let shared_client = Arc::new(SharedClientService::<()>::new());
    let service = Arc::new(WorkspaceRepositoryService::new(
        Arc::clone(&shared_client) as Arc<dyn SharedClientHandle<()>>,
        Arc::new(InMemoryRepositoryInitializer::new(backend)),
    ));

    let initializing = Arc::clone(&service);
    let init_task = tokio::spawn(async move { initializing.initialize().await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Issued while the shared client is still pending; must neither be
    // lost nor fail.
    let caller = Arc::clone(&service);
    let op_task = tokio::spawn(async move {
        caller
            .save_workspace(&workspace_item("w1", "Acme"))
            .await?;
        caller.get_workspace_by_id("w1").await
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    shared_client
        .start(async { Ok::<_, Infallible>(()) })
        .await
        .unwrap();

    init_task.await.unwrap().unwrap();
    let found = op_task.await.unwrap().unwrap().expect("workspace saved");
    assert_eq!(found.target().name, "Acme");
}

#[tokio::test]
async fn initialized_event_fires_for_subscribers() {
    init_tracing();
    let backend = Arc::new(InMemoryRepository::new());
    let service = WorkspaceRepositoryService::new(
        ready_shared_client().await,
        Arc::new(InMemoryRepositoryInitializer::new(backend)),
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let _subscription = service.on(RepositoryServiceEvent::Initialized, move |event| {
        let _ = tx.send(event);
    });

    service.initialize().await.unwrap();
    assert_eq!(rx.try_recv().unwrap(), RepositoryServiceEvent::Initialized);
}
