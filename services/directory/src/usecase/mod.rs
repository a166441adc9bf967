pub mod document;
pub mod employee;
pub mod message;
pub mod registration;
pub mod sweep;
pub mod ticket;
pub mod training;

use workforce_domain::id::EmployeeId;

use crate::domain::policy::{Action, authorize};
use crate::domain::repository::{BlobStore, EmployeeRepository};
use crate::domain::types::{BlobRef, Employee, User};
use crate::error::DirectoryError;

/// Load an employee and check that `actor` may manage its records.
pub(crate) async fn managed_employee<E: EmployeeRepository>(
    employees: &E,
    actor: &User,
    id: EmployeeId,
) -> Result<Employee, DirectoryError> {
    let employee = employees
        .find_by_id(id)
        .await?
        .ok_or(DirectoryError::EmployeeNotFound)?;
    authorize(
        actor,
        Action::ManageEmployeeRecords {
            owner: employee.user_id,
        },
    )?;
    Ok(employee)
}

/// Delete a blob whose row is already gone. Failures are logged, never returned.
pub(crate) async fn delete_blob_best_effort<B: BlobStore>(blobs: &B, key: &BlobRef) -> bool {
    match blobs.delete(key).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(blob_ref = %key, error = ?e, "blob cleanup failed");
            false
        }
    }
}
