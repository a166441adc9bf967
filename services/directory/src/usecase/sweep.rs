use std::collections::HashSet;

use chrono::{TimeDelta, Utc};

use crate::domain::repository::{BlobStore, DocumentRepository, EmployeeRepository};
use crate::domain::types::{BlobRef, DOCUMENT_PREFIX, PICTURE_PREFIX};
use crate::error::DirectoryError;
use crate::usecase::delete_blob_best_effort;

// ── SweepOrphanBlobs ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Objects found under the picture and document prefixes.
    pub scanned: usize,
    /// Unreferenced objects older than the grace period.
    pub orphaned: Vec<BlobRef>,
    pub deleted: usize,
    pub failed: usize,
}

pub struct SweepOrphanBlobsUseCase<E: EmployeeRepository, D: DocumentRepository, B: BlobStore> {
    pub employees: E,
    pub documents: D,
    pub blobs: B,
}

impl<E: EmployeeRepository, D: DocumentRepository, B: BlobStore> SweepOrphanBlobsUseCase<E, D, B> {
    /// Delete stored objects no row references. Objects younger than `grace`
    /// are skipped since their row may not be committed yet.
    pub async fn execute(
        &self,
        grace: TimeDelta,
        dry_run: bool,
    ) -> Result<SweepReport, DirectoryError> {
        let started = Utc::now();

        // Listing before reading refs: a row committed in between is still seen.
        let mut stored = Vec::new();
        for prefix in [PICTURE_PREFIX, DOCUMENT_PREFIX] {
            stored.extend(self.blobs.list(&format!("{prefix}/")).await?);
        }

        let mut referenced: HashSet<BlobRef> =
            self.employees.list_picture_refs().await?.into_iter().collect();
        referenced.extend(self.documents.list_blob_refs().await?);

        let mut report = SweepReport {
            scanned: stored.len(),
            ..Default::default()
        };
        report.orphaned = stored
            .into_iter()
            .filter(|blob| !referenced.contains(&blob.key))
            .filter(|blob| started - blob.last_modified >= grace)
            .map(|blob| blob.key)
            .collect();

        if dry_run {
            for key in &report.orphaned {
                tracing::info!(blob_ref = %key, "orphan blob (dry run)");
            }
        } else {
            for key in &report.orphaned {
                if delete_blob_best_effort(&self.blobs, key).await {
                    report.deleted += 1;
                } else {
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            orphaned = report.orphaned.len(),
            deleted = report.deleted,
            failed = report.failed,
            dry_run,
            "orphan sweep finished"
        );
        Ok(report)
    }
}
