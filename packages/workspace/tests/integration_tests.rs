//! Integration tests for the workspace: bootstrap, switching and persistence
//! against a real data directory.

use std::path::Path;

use conceptmap_editor::{DocumentStorage, DocumentStore, Position};
use conceptmap_workspace::{
    fetch_document, reset_app_data, Config, DirectoryStorage, LastDocument, Workspace,
    WorkspaceError,
};
use tempfile::TempDir;

async fn open(dir: &Path) -> Workspace {
    Workspace::open_dir(dir, &Config::default())
        .await
        .expect("Failed to open workspace")
}

/// Store a document named `name` directly in the data directory
async fn seed(dir: &Path, name: &str) -> String {
    let mut store = DocumentStore::new();
    store.new_document(Some(name));
    let document = store.export().unwrap();
    DirectoryStorage::new(dir).put(&document).await.unwrap();
    document.id
}

#[tokio::test]
async fn test_open_empty_creates_and_persists_document() {
    let dir = TempDir::new().unwrap();
    let workspace = open(dir.path()).await;

    let id = workspace.current_id();
    assert!(!id.is_empty());
    assert!(workspace.store().read(|s| s.is_ready()));

    let stored = fetch_document(workspace.storage().as_ref(), &id).await.unwrap();
    assert_eq!(stored.nodes.len(), 1);
    assert_eq!(LastDocument::new(dir.path()).read().await, Some(id));

    workspace.close(false).await;
}

#[tokio::test]
async fn test_reopen_restores_last_document() {
    let dir = TempDir::new().unwrap();
    let first = seed(dir.path(), "First").await;
    let second = seed(dir.path(), "Second").await;
    LastDocument::new(dir.path()).write(&first).await.unwrap();

    let workspace = open(dir.path()).await;
    assert_eq!(workspace.current_id(), first);
    assert_eq!(workspace.documents().len(), 2);
    workspace.close(false).await;

    LastDocument::new(dir.path()).write("deleted-long-ago").await.unwrap();
    let workspace = open(dir.path()).await;
    // Falls back to the most recently updated document
    let expected = DirectoryStorage::new(dir.path()).list().await.unwrap()[0].id.clone();
    assert_eq!(workspace.current_id(), expected);
    assert!([first, second].contains(&expected));
    workspace.close(false).await;
}

#[tokio::test]
async fn test_switch_document() {
    let dir = TempDir::new().unwrap();
    let original = seed(dir.path(), "Original").await;
    let mut workspace = open(dir.path()).await;
    assert_eq!(workspace.current_id(), original);

    assert!(!workspace.switch_document("   ").await.unwrap());
    assert!(!workspace.switch_document("missing").await.unwrap());
    assert_eq!(workspace.current_id(), original);

    let target = seed(dir.path(), "Target").await;
    assert!(workspace.switch_document(&target).await.unwrap());
    assert_eq!(workspace.current_id(), target);
    assert_eq!(LastDocument::new(dir.path()).read().await, Some(target));
    assert!(!workspace.store().read(|s| s.history().can_undo()));

    workspace.close(false).await;
}

#[tokio::test]
async fn test_switch_flushes_pending_edits() {
    let dir = TempDir::new().unwrap();
    let mut workspace = open(dir.path()).await;
    let first = workspace.current_id();
    let second = workspace.new_document(Some("Second")).await.unwrap().id;

    assert!(workspace.switch_document(&first).await.unwrap());
    workspace.store().update(|s| s.add_node_at(Position::new(50.0, 50.0)));

    assert!(workspace.switch_document(&second).await.unwrap());

    let saved = fetch_document(workspace.storage().as_ref(), &first).await.unwrap();
    assert_eq!(saved.nodes.len(), 2);

    workspace.close(false).await;
}

#[tokio::test]
async fn test_new_document_is_listed_and_current() {
    let dir = TempDir::new().unwrap();
    let mut workspace = open(dir.path()).await;

    let metadata = workspace.new_document(Some("Ecology")).await.unwrap();

    assert_eq!(workspace.current_id(), metadata.id);
    assert_eq!(metadata.name, "Ecology");
    let documents = workspace.documents();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].id, metadata.id);
    assert!(workspace.storage().get(&metadata.id).await.unwrap().is_some());

    workspace.close(false).await;
}

#[tokio::test]
async fn test_import_document() {
    let dir = TempDir::new().unwrap();
    let mut workspace = open(dir.path()).await;

    let mut source = DocumentStore::new();
    source.new_document(Some("Imported"));
    let root = source.nodes()[0].id.clone();
    source.add_child_node(&root);
    let document = source.export().unwrap();

    let metadata = workspace.import_document(document.clone()).await.unwrap();

    assert_eq!(metadata.name, "Imported");
    assert_eq!(workspace.current_id(), document.id);
    assert_eq!(workspace.store().read(|s| s.nodes().len()), 2);

    let mut broken = document;
    broken.id = String::new();
    assert!(matches!(
        workspace.import_document(broken).await,
        Err(WorkspaceError::InvalidDocument(_))
    ));

    workspace.close(false).await;
}

#[tokio::test]
async fn test_delete_current_moves_on() {
    let dir = TempDir::new().unwrap();
    let mut workspace = open(dir.path()).await;
    let first = workspace.current_id();
    let second = workspace.new_document(None).await.unwrap().id;

    assert!(workspace.delete_document(&second).await.unwrap());
    assert_eq!(workspace.current_id(), first);
    assert!(!workspace.delete_document(&second).await.unwrap());

    // Deleting the only document starts a fresh one
    assert!(workspace.delete_document(&first).await.unwrap());
    let current = workspace.current_id();
    assert_ne!(current, first);
    assert_eq!(workspace.documents().len(), 1);
    assert_eq!(workspace.documents()[0].id, current);

    workspace.close(false).await;
}

#[tokio::test]
async fn test_close_with_flush_persists_edits() {
    let dir = TempDir::new().unwrap();
    let workspace = open(dir.path()).await;
    let id = workspace.current_id();
    let root = workspace.store().read(|s| s.nodes()[0].id.clone());

    workspace.store().update(|s| s.update_node_label(&root, "Photosynthesis"));
    workspace.close(true).await;

    let saved = fetch_document(&DirectoryStorage::new(dir.path()), &id).await.unwrap();
    assert_eq!(saved.nodes[0].data.label, "Photosynthesis");
}

#[tokio::test]
async fn test_reset_removes_all_data() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), "One").await;
    seed(dir.path(), "Two").await;
    let last_doc = LastDocument::new(dir.path());
    last_doc.write("anything").await.unwrap();

    let storage = DirectoryStorage::new(dir.path());
    let deleted = reset_app_data(&storage, &last_doc).await.unwrap();

    assert_eq!(deleted, 2);
    assert!(storage.list().await.unwrap().is_empty());
    assert_eq!(last_doc.read().await, None);
}

#[tokio::test]
async fn test_fetch_missing_is_not_found() {
    let dir = TempDir::new().unwrap();
    let storage = DirectoryStorage::new(dir.path());

    assert!(matches!(
        fetch_document(&storage, "nope").await,
        Err(WorkspaceError::NotFound(_))
    ));
}
