use convertdocs::services::lifecycle::{LifecycleTracker, remove_batch};
use convertdocs::services::reaper::sweep;
use convertdocs::services::storage::UploadStore;
use std::collections::HashSet;
use std::time::Duration;

#[tokio::test]
async fn test_concurrent_uploads_get_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..100 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .store(format!("payload {i}").as_bytes(), "upload.pdf")
                .await
                .unwrap()
        }));
    }

    let mut ids = HashSet::new();
    let mut paths = HashSet::new();
    for handle in handles {
        let stored = handle.await.unwrap();
        assert!(stored.path.exists());
        ids.insert(stored.id);
        paths.insert(stored.path);
    }

    assert_eq!(ids.len(), 100);
    assert_eq!(paths.len(), 100);
}

#[tokio::test]
async fn test_scheduled_file_survives_until_delay_elapses() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path()).await.unwrap();

    let stored = store.store(b"ten bytes!", "invoice.pdf").await.unwrap();
    assert_eq!(stored.extension, ".pdf");

    let tracker = LifecycleTracker::new(Duration::from_secs(1));
    tracker.schedule_removal(vec![stored.path.clone()]);

    // Still readable well inside the delay window.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        tokio::fs::read(&stored.path).await.unwrap(),
        b"ten bytes!"
    );

    // Gone once the delay has passed.
    tokio::time::sleep(Duration::from_millis(1700)).await;
    assert!(!stored.path.exists());
}

#[tokio::test]
async fn test_scheduled_delete_and_reaper_race_is_harmless() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path()).await.unwrap();
    let stored = store.store(b"contended", "page.pdf").await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    // Both deleters go after the same path; whoever loses sees NotFound
    // and treats it as success.
    let batch = vec![stored.path.clone()];
    let (_, swept) = tokio::join!(remove_batch(&batch), sweep(dir.path(), Duration::ZERO));
    swept.unwrap();

    assert!(!stored.path.exists());

    // And a straggler firing afterwards is still a no-op.
    remove_batch(&batch).await;
}

#[tokio::test]
async fn test_reaper_removes_files_nobody_scheduled() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path()).await.unwrap();

    // A request that crashed after writing its upload never schedules
    // deletion; the sweep is the only thing that will reclaim it.
    let orphan = store.store(b"orphaned upload", "crash.docx").await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;

    let removed = sweep(store.root(), Duration::ZERO).await.unwrap();
    assert_eq!(removed, 1);
    assert!(!orphan.path.exists());
}

#[tokio::test]
async fn test_sweep_handles_mixed_directory_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path()).await.unwrap();

    let stale = store.store(b"stale", "old.pdf").await.unwrap();
    tokio::fs::create_dir(dir.path().join("not-a-file"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let fresh = store.store(b"fresh", "new.pdf").await.unwrap();

    // Only the entry past the threshold goes; the directory and the
    // fresh upload stay.
    let removed = sweep(store.root(), Duration::from_millis(60)).await.unwrap();
    assert_eq!(removed, 1);
    assert!(!stale.path.exists());
    assert!(fresh.path.exists());
    assert!(dir.path().join("not-a-file").exists());
}

#[tokio::test]
async fn test_batch_deletion_covers_multi_file_requests() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path()).await.unwrap();

    let a = store.store(b"first", "a.pdf").await.unwrap();
    let b = store.store(b"second", "b.pdf").await.unwrap();
    let output = store.allocate("_merged.pdf");
    tokio::fs::write(&output.path, b"merged result")
        .await
        .unwrap();

    let tracker = LifecycleTracker::new(Duration::from_millis(100));
    tracker.schedule_removal(vec![a.path.clone(), b.path.clone(), output.path.clone()]);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!a.path.exists());
    assert!(!b.path.exists());
    assert!(!output.path.exists());
}
