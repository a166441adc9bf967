use std::time::Duration;

use chrono::Utc;

use workforce_domain::id::{DocumentId, EmployeeId};

use crate::domain::repository::{BlobStore, DocumentRepository, EmployeeRepository};
use crate::domain::types::{BlobRef, DOCUMENT_PREFIX, Document, NewDocument, Upload, User};
use crate::error::DirectoryError;
use crate::usecase::{delete_blob_best_effort, managed_employee};

/// `file_type` recorded for uploads without a usable extension.
const UNKNOWN_FILE_TYPE: &str = "unknown";

// ── UploadDocument ───────────────────────────────────────────────────────────

pub struct UploadDocumentUseCase<D: DocumentRepository, E: EmployeeRepository, B: BlobStore> {
    pub documents: D,
    pub employees: E,
    pub blobs: B,
}

impl<D: DocumentRepository, E: EmployeeRepository, B: BlobStore> UploadDocumentUseCase<D, E, B> {
    /// Same ordering as picture uploads: blob first, then the row; the blob is
    /// removed again if the row cannot be written.
    pub async fn execute(
        &self,
        actor: &User,
        employee_id: EmployeeId,
        upload: Upload,
    ) -> Result<Document, DirectoryError> {
        let employee = managed_employee(&self.employees, actor, employee_id).await?;

        let extension = upload.extension();
        let content_type = upload.content_type();
        let key = BlobRef::generate(DOCUMENT_PREFIX, extension.as_deref());
        let blob_ref = self.blobs.put(&key, upload.bytes, &content_type).await?;

        let created = self
            .documents
            .create(&NewDocument {
                employee_id: employee.id,
                filename: upload.filename,
                file_type: extension.unwrap_or_else(|| UNKNOWN_FILE_TYPE.to_owned()),
                upload_date: Utc::now(),
                blob_ref: blob_ref.clone(),
            })
            .await;
        if created.is_err() {
            delete_blob_best_effort(&self.blobs, &blob_ref).await;
        }
        created
    }
}

// ── ListDocuments ────────────────────────────────────────────────────────────

pub struct ListDocumentsUseCase<D: DocumentRepository, E: EmployeeRepository> {
    pub documents: D,
    pub employees: E,
}

impl<D: DocumentRepository, E: EmployeeRepository> ListDocumentsUseCase<D, E> {
    pub async fn execute(
        &self,
        actor: &User,
        employee_id: EmployeeId,
    ) -> Result<Vec<Document>, DirectoryError> {
        let employee = managed_employee(&self.employees, actor, employee_id).await?;
        self.documents.list_by_employee(employee.id).await
    }
}

// ── DocumentUrl ──────────────────────────────────────────────────────────────

pub struct DocumentUrlUseCase<D: DocumentRepository, E: EmployeeRepository, B: BlobStore> {
    pub documents: D,
    pub employees: E,
    pub blobs: B,
    pub ttl: Duration,
}

impl<D: DocumentRepository, E: EmployeeRepository, B: BlobStore> DocumentUrlUseCase<D, E, B> {
    pub async fn execute(&self, actor: &User, id: DocumentId) -> Result<String, DirectoryError> {
        let document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::DocumentNotFound)?;
        managed_employee(&self.employees, actor, document.employee_id).await?;
        self.blobs.presigned_url(&document.blob_ref, self.ttl).await
    }
}

// ── DeleteDocument ───────────────────────────────────────────────────────────

pub struct DeleteDocumentUseCase<D: DocumentRepository, E: EmployeeRepository, B: BlobStore> {
    pub documents: D,
    pub employees: E,
    pub blobs: B,
}

impl<D: DocumentRepository, E: EmployeeRepository, B: BlobStore> DeleteDocumentUseCase<D, E, B> {
    /// The row is deleted first; a failed blob delete is logged and left for the sweep.
    pub async fn execute(&self, actor: &User, id: DocumentId) -> Result<(), DirectoryError> {
        let document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::DocumentNotFound)?;
        managed_employee(&self.employees, actor, document.employee_id).await?;
        if !self.documents.delete(id).await? {
            return Err(DirectoryError::DocumentNotFound);
        }
        delete_blob_best_effort(&self.blobs, &document.blob_ref).await;
        Ok(())
    }
}
