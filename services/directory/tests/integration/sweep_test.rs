use chrono::{TimeDelta, Utc};

use workforce_directory::domain::types::BlobRef;
use workforce_directory::usecase::sweep::SweepOrphanBlobsUseCase;

use crate::helpers::{FakeBlobStore, InMemoryDirectory};

fn sweep_uc(
    store: &InMemoryDirectory,
    blobs: &FakeBlobStore,
) -> SweepOrphanBlobsUseCase<InMemoryDirectory, InMemoryDirectory, FakeBlobStore> {
    SweepOrphanBlobsUseCase {
        employees: store.clone(),
        documents: store.clone(),
        blobs: blobs.clone(),
    }
}

/// Referenced picture and document, one old orphan of each kind, one fresh
/// orphan, and an unrelated object outside the managed prefixes.
fn seeded() -> (InMemoryDirectory, FakeBlobStore) {
    let store = InMemoryDirectory::new();
    let blobs = FakeBlobStore::new();
    let old = Utc::now() - TimeDelta::days(3);

    let bob = store.seed_member("bob");
    let employee = store.seed_employee_with_picture(&bob, Some("pictures/bob.png"));
    store.seed_document(&employee, "documents/kept.pdf");

    blobs.insert("pictures/bob.png", old);
    blobs.insert("documents/kept.pdf", old);
    blobs.insert("pictures/orphan.jpg", old);
    blobs.insert("documents/orphan.pdf", old);
    blobs.insert("documents/fresh.pdf", Utc::now());
    blobs.insert("exports/report.csv", old);
    (store, blobs)
}

#[tokio::test]
async fn should_delete_only_old_unreferenced_blobs() {
    let (store, blobs) = seeded();

    let report = sweep_uc(&store, &blobs)
        .execute(TimeDelta::days(1), false)
        .await
        .unwrap();

    assert_eq!(report.scanned, 5);
    let mut orphaned = report.orphaned.clone();
    orphaned.sort();
    assert_eq!(
        orphaned,
        vec![
            BlobRef("documents/orphan.pdf".into()),
            BlobRef("pictures/orphan.jpg".into()),
        ]
    );
    assert_eq!(report.deleted, 2);
    assert_eq!(report.failed, 0);
    for kept in [
        "pictures/bob.png",
        "documents/kept.pdf",
        "documents/fresh.pdf",
        "exports/report.csv",
    ] {
        assert!(blobs.contains(&BlobRef(kept.into())), "{kept} should remain");
    }
}

#[tokio::test]
async fn should_only_report_on_dry_run() {
    let (store, blobs) = seeded();

    let report = sweep_uc(&store, &blobs)
        .execute(TimeDelta::days(1), true)
        .await
        .unwrap();

    assert_eq!(report.orphaned.len(), 2);
    assert_eq!(report.deleted, 0);
    assert!(blobs.lock().deletes.is_empty());
}

#[tokio::test]
async fn should_count_failed_deletes() {
    let (store, blobs) = seeded();
    blobs.lock().fail_delete = true;

    let report = sweep_uc(&store, &blobs)
        .execute(TimeDelta::days(1), false)
        .await
        .unwrap();

    assert_eq!(report.deleted, 0);
    assert_eq!(report.failed, 2);
}
